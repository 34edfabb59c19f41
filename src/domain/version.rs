use crate::domain::{BuildType, PreReleaseKind};
use crate::error::{NpmPublishError, Result};
use std::fmt;

/// Major version reserved for dry-run builds
pub const DRY_RUN_MAJOR: u64 = 1000;

/// Semantic version core (major.minor.patch)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
}

impl Version {
    /// Create a new version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Version {
            major,
            minor,
            patch,
        }
    }

    /// Next minor version, with the patch reset
    pub fn next_minor(&self) -> Result<Self> {
        let minor = self.minor.checked_add(1).ok_or_else(|| {
            NpmPublishError::version(format!("Cannot increment the minor version of {}", self))
        })?;

        Ok(Version {
            major: self.major,
            minor,
            patch: 0,
        })
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

/// A version string parsed and validated for one build type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedVersion {
    /// Full version without any leading `v`
    pub version: String,
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub prerelease: Option<String>,
}

impl ParsedVersion {
    /// Parse a version string (e.g., "v0.72.0-rc.1") under the rules of `mode`
    ///
    /// - `Release`: stable or pre-release; nightly/prealpha identifiers and the
    ///   dry-run major are rejected
    /// - `Nightly`: pre-release must start with `nightly-`
    /// - `Prealpha`: must be `0.0.0-prealpha-...`
    /// - `DryRun`: major must be 1000 with a pre-release
    pub fn parse(raw: &str, mode: BuildType) -> Result<Self> {
        let trimmed = raw.trim();
        let clean = trimmed.strip_prefix(&['v', 'V'][..]).unwrap_or(trimmed);

        let parsed = semver::Version::parse(clean).map_err(|e| {
            NpmPublishError::version(format!("Invalid version '{}': {}", raw, e))
        })?;

        let prerelease = if parsed.pre.is_empty() {
            None
        } else {
            Some(parsed.pre.as_str().to_string())
        };

        let version = ParsedVersion {
            version: clean.to_string(),
            major: parsed.major,
            minor: parsed.minor,
            patch: parsed.patch,
            prerelease,
        };

        version.validate(mode)?;
        Ok(version)
    }

    /// The major.minor.patch core
    pub fn core(&self) -> Version {
        Version::new(self.major, self.minor, self.patch)
    }

    /// Classification of the pre-release segment, if any
    pub fn prerelease_kind(&self) -> Option<PreReleaseKind> {
        self.prerelease.as_deref().map(PreReleaseKind::classify)
    }

    fn validate(&self, mode: BuildType) -> Result<()> {
        let kind = self.prerelease_kind();

        let valid = match mode {
            BuildType::Release => {
                self.major != DRY_RUN_MAJOR && !kind.as_ref().is_some_and(|k| k.is_automated())
            }
            BuildType::Nightly => kind == Some(PreReleaseKind::Nightly),
            BuildType::Prealpha => {
                self.core() == Version::new(0, 0, 0) && kind == Some(PreReleaseKind::Prealpha)
            }
            BuildType::DryRun => self.major == DRY_RUN_MAJOR && kind.is_some(),
        };

        if valid {
            Ok(())
        } else {
            Err(NpmPublishError::version(format!(
                "Version {} is not valid for {}",
                self.version, mode
            )))
        }
    }
}

impl fmt::Display for ParsedVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.version)
    }
}
