//! Pre-release identifier classification
//!
//! Pre-release segments carry the build channel: `rc.1` for release
//! candidates, `nightly-<date>-<commit>` for nightlies and
//! `prealpha-<stamp>` for prealpha builds. See https://semver.org/#spec-item-9

use regex::Regex;
use std::sync::OnceLock;

/// Prefix of nightly pre-release identifiers
pub const NIGHTLY_PREFIX: &str = "nightly-";

/// Prefix of prealpha pre-release identifiers
pub const PREALPHA_PREFIX: &str = "prealpha-";

fn release_candidate_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^rc[.-](\d+)$").expect("valid rc pattern"))
}

/// Channel a pre-release identifier belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreReleaseKind {
    /// `rc.N` or `rc-N`
    ReleaseCandidate(u32),
    /// `nightly-...`
    Nightly,
    /// `prealpha-...`
    Prealpha,
    /// Any other identifier (`beta.2`, a commit hash, ...)
    Other(String),
}

impl PreReleaseKind {
    /// Classify a pre-release segment (the part after the first `-`)
    ///
    /// # Examples
    /// ```ignore
    /// assert_eq!(PreReleaseKind::classify("rc.3"), PreReleaseKind::ReleaseCandidate(3));
    /// assert_eq!(PreReleaseKind::classify("nightly-20231011-abc"), PreReleaseKind::Nightly);
    /// ```
    pub fn classify(prerelease: &str) -> Self {
        if let Some(iteration) = release_candidate_pattern()
            .captures(prerelease)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok())
        {
            return PreReleaseKind::ReleaseCandidate(iteration);
        }

        if prerelease.starts_with(NIGHTLY_PREFIX) {
            PreReleaseKind::Nightly
        } else if prerelease.starts_with(PREALPHA_PREFIX) {
            PreReleaseKind::Prealpha
        } else {
            PreReleaseKind::Other(prerelease.to_string())
        }
    }

    /// Whether this identifier is reserved for automated channels
    pub fn is_automated(&self) -> bool {
        matches!(self, PreReleaseKind::Nightly | PreReleaseKind::Prealpha)
    }
}
