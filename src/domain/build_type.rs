use crate::error::{NpmPublishError, Result};
use std::fmt;
use std::str::FromStr;

/// Kind of build being published; selects the version derivation rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BuildType {
    /// Local or CI verification build, never published
    DryRun,
    /// Tagged release driven by the release pipeline
    Release,
    /// Daily build ahead of the next minor
    Nightly,
    /// Hourly build from the main line
    Prealpha,
}

impl BuildType {
    /// All build types in a stable order
    pub const ALL: [BuildType; 4] = [
        BuildType::DryRun,
        BuildType::Release,
        BuildType::Nightly,
        BuildType::Prealpha,
    ];

    /// Get the build type name as used on the command line
    pub fn name(&self) -> &'static str {
        match self {
            BuildType::DryRun => "dry-run",
            BuildType::Release => "release",
            BuildType::Nightly => "nightly",
            BuildType::Prealpha => "prealpha",
        }
    }

    /// Parse a build type, failing with `UnsupportedBuildType` for unknown names
    pub fn parse(s: &str) -> Result<Self> {
        s.parse()
    }
}

impl FromStr for BuildType {
    type Err = NpmPublishError;

    fn from_str(s: &str) -> Result<Self> {
        BuildType::ALL
            .into_iter()
            .find(|build_type| build_type.name() == s)
            .ok_or_else(|| NpmPublishError::UnsupportedBuildType(s.to_string()))
    }
}

impl fmt::Display for BuildType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
