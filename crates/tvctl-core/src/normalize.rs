// ── Deep-link URL normalization ──
//
// Web-facing content URLs are rewritten into the form each streaming app's
// intent filter accepts. Rules are tried in order and the first match wins;
// anything unmatched passes through untouched.

use std::sync::OnceLock;

use regex::Regex;
use url::Url;

use crate::verify::VerifyMode;

/// Canonical hyphenated UUID, terminated by a path/query boundary.
const UUID: &str = r"(?P<id>[0-9a-fA-F]{8}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{4}-[0-9a-fA-F]{12})(?:[/?#]|$)";

struct Rule {
    regex: Regex,
    /// Replacement with `$id` expanded from the match.
    template: &'static str,
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        let raw: [(String, &'static str); 5] = [
            (
                r"^(?:netflix://|https?://(?:www\.)?netflix\.com/)(?:title|watch)/(?P<id>\d+)"
                    .to_owned(),
                "http://www.netflix.com/watch/$id",
            ),
            (
                format!(r"^https?://(?:www\.)?hbomax\.com/movies?/(?:urn:hbo:movie:|[^/]+/){UUID}"),
                "https://play.max.com/movie/$id",
            ),
            (
                format!(r"^https?://(?:www\.)?hbomax\.com/series/(?:urn:hbo:series:|[^/]+/){UUID}"),
                "https://play.max.com/show/$id",
            ),
            (
                format!(r"^urn:hbo:movie:{UUID}"),
                "https://play.max.com/movie/$id",
            ),
            (
                format!(r"^urn:hbo:series:{UUID}"),
                "https://play.max.com/show/$id",
            ),
        ];
        let apple = (
            r"^https?://tv\.apple\.com/(?:[a-z]{2}/)?show/(?:[^/?#]+/)?(?P<id>umc\.cmc\.[A-Za-z0-9.]+)"
                .to_owned(),
            "https://tv.apple.com/show/$id",
        );

        raw.into_iter()
            .chain(std::iter::once(apple))
            .filter_map(|(pattern, template)| {
                Regex::new(&pattern).ok().map(|regex| Rule { regex, template })
            })
            .collect()
    })
}

/// Map a content URL to the deep-link form its app accepts.
///
/// Pure and idempotent: `normalize(&normalize(u)) == normalize(u)`.
///
/// ```
/// use tvctl_core::normalize;
///
/// assert_eq!(
///     normalize("https://www.netflix.com/title/80057281"),
///     "http://www.netflix.com/watch/80057281"
/// );
/// ```
pub fn normalize(url: &str) -> String {
    let url = url.trim();
    if is_canonical_max(url) {
        return url.to_owned();
    }
    for rule in rules() {
        if let Some(caps) = rule.regex.captures(url) {
            let mut out = String::new();
            caps.expand(rule.template, &mut out);
            return out;
        }
    }
    url.to_owned()
}

/// Streaming service a (normalized) deep link targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ContentService {
    Netflix,
    Max,
    AppleTv,
    #[strum(to_string = "youtube")]
    YouTube,
    Other,
}

impl ContentService {
    pub fn detect(url: &str) -> Self {
        let host = Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
            .unwrap_or_default();
        let lower = url.to_ascii_lowercase();

        if lower.contains("netflix") {
            Self::Netflix
        } else if host == "play.max.com" || lower.contains("hbomax") {
            Self::Max
        } else if host == "tv.apple.com" {
            Self::AppleTv
        } else if lower.contains("youtube") || lower.contains("youtu.be") {
            Self::YouTube
        } else {
            Self::Other
        }
    }

    /// Services whose deep link lands on a details page.
    pub fn verify_mode(self) -> VerifyMode {
        match self {
            Self::Netflix | Self::Max | Self::AppleTv => VerifyMode::SelectToPlay,
            Self::YouTube | Self::Other => VerifyMode::DirectPlayback,
        }
    }
}

fn is_canonical_max(url: &str) -> bool {
    url.strip_prefix("https://")
        .or_else(|| url.strip_prefix("http://"))
        .is_some_and(|rest| rest.starts_with("play.max.com/"))
}
