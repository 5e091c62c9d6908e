// ── Package resolution ──
//
// The package implementing a logical streaming app differs per platform
// (Fire TV ships its own YouTube and Apple TV builds), so it is discovered
// from the installed package list and remembered.

use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::error::CoreError;
use crate::executor::{CommandExecutor, ExecOptions};
use crate::model::{Device, StreamingApp};
use crate::store::PackageCache;

const LIST_TIMEOUT: Duration = Duration::from_secs(5);

/// Name fragments that mark an installed package as a media app.
pub const STREAMING_KEYWORDS: &[&str] = &[
    "youtube",
    "netflix",
    "prime",
    "amazonvideo",
    "hulu",
    "disney",
    "hbo",
    "peacock",
    "paramount",
    "apple.tv",
    "appletv",
    "plex",
    "kodi",
    "spotify",
    "pandora",
    "tidal",
    "twitch",
    "crunchyroll",
];

/// Whether a package name looks like a streaming app.
pub fn is_streaming_package(package: &str) -> bool {
    let lower = package.to_ascii_lowercase();
    STREAMING_KEYWORDS.iter().any(|k| lower.contains(k))
}

/// Outcome of looking an app up in the installed package list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(String),
    /// The list was read and no package matched.
    NotInstalled,
    /// The package list could not be read.
    Unlisted,
}

impl Lookup {
    pub fn into_package(self) -> Option<String> {
        match self {
            Self::Found(pkg) => Some(pkg),
            Self::NotInstalled | Self::Unlisted => None,
        }
    }
}

/// Finds and caches the installed package for each streaming app.
#[derive(Debug, Clone)]
pub struct PackageResolver {
    executor: CommandExecutor,
    cache: Arc<PackageCache>,
}

impl PackageResolver {
    pub fn new(executor: CommandExecutor, cache: Arc<PackageCache>) -> Self {
        Self { executor, cache }
    }

    /// Resolve a logical app name. Names outside the known set return
    /// `None` without touching the device.
    pub async fn resolve(&self, device: &Device, app: &str) -> Result<Option<String>, CoreError> {
        match StreamingApp::from_str(app) {
            Ok(app) => self.resolve_app(device, app).await,
            Err(_) => Ok(None),
        }
    }

    pub async fn resolve_app(
        &self,
        device: &Device,
        app: StreamingApp,
    ) -> Result<Option<String>, CoreError> {
        Ok(self.lookup(device, app).await?.into_package())
    }

    /// Like [`resolve_app`](Self::resolve_app), but tells a missing app
    /// apart from an unreadable package list.
    pub async fn lookup(&self, device: &Device, app: StreamingApp) -> Result<Lookup, CoreError> {
        if let Some(pkg) = self.cache.get(&device.id, app) {
            return Ok(Lookup::Found(pkg));
        }

        let Some(installed) = self.installed(device).await? else {
            return Ok(Lookup::Unlisted);
        };

        let found = app.fragments().iter().find_map(|fragment| {
            installed
                .iter()
                .find(|pkg| pkg.to_ascii_lowercase().contains(fragment))
        });

        Ok(match found {
            Some(pkg) => {
                debug!(device = %device.id, %app, package = %pkg, "resolved package");
                self.cache.insert(device.id.clone(), app, pkg.clone());
                Lookup::Found(pkg.clone())
            }
            None => Lookup::NotInstalled,
        })
    }

    /// Every installed package, or `None` when the list could not be read.
    pub async fn installed(&self, device: &Device) -> Result<Option<Vec<String>>, CoreError> {
        let output = self
            .executor
            .shell(device, LIST_COMMAND, ExecOptions::timeout(LIST_TIMEOUT))
            .await?;
        if !output.success() {
            debug!(device = %device.id, stderr = %output.stderr, "package listing failed");
            return Ok(None);
        }
        Ok(Some(parse_package_list(&output.stdout_text())))
    }
}

/// Shell command listing installed packages.
pub const LIST_COMMAND: &str = "pm list packages";

/// Parse `pm list packages` output (`package:<name>` per line).
pub fn parse_package_list(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter_map(|line| line.trim().strip_prefix("package:"))
        .map(|pkg| pkg.trim().to_owned())
        .filter(|pkg| !pkg.is_empty())
        .collect()
}

/// Keep only streaming apps, sorted.
pub fn streaming_packages(packages: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut found: Vec<String> = packages
        .into_iter()
        .filter(|p| is_streaming_package(p))
        .collect();
    found.sort();
    found
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_filter() {
        assert!(is_streaming_package("com.netflix.ninja"));
        assert!(is_streaming_package("com.amazon.amazonvideo.livingroom"));
        assert!(is_streaming_package("com.apple.atve.amazon.appletv"));
        assert!(is_streaming_package("tv.twitch.android.app"));
        assert!(!is_streaming_package("com.android.settings"));
    }

    #[test]
    fn package_list_parsing() {
        let stdout = "package:com.netflix.ninja\npackage:com.android.settings\r\n\nWARNING: linker\npackage:com.google.android.youtube.tv\n";
        let all = parse_package_list(stdout);
        assert_eq!(
            all,
            vec![
                "com.netflix.ninja",
                "com.android.settings",
                "com.google.android.youtube.tv",
            ]
        );
        assert_eq!(
            streaming_packages(all),
            vec!["com.google.android.youtube.tv", "com.netflix.ninja"]
        );
    }
}
