// ── Process-wide caches ──
//
// Both caches are owned by the `Controller` and shared by its clones.
// Writes are idempotent (re-deriving a value is harmless), so `DashMap`'s
// per-shard locking is all the coordination needed.

mod package_cache;
mod status_cache;

pub use package_cache::PackageCache;
pub use status_cache::StatusCache;
