use serde::{Serialize, Serializer};
use std::fmt;

/// npm distribution tag an install request resolves through
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DistTag {
    /// Default channel for unqualified installs
    Latest,
    /// Pre-release channel
    Next,
    Nightly,
    Prealpha,
    /// Release-branch channel (e.g., "0.72-stable")
    Stable { major: u64, minor: u64 },
}

impl DistTag {
    /// Release-branch tag for a major.minor line
    pub fn stable(major: u64, minor: u64) -> Self {
        DistTag::Stable { major, minor }
    }
}

impl fmt::Display for DistTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DistTag::Latest => write!(f, "latest"),
            DistTag::Next => write!(f, "next"),
            DistTag::Nightly => write!(f, "nightly"),
            DistTag::Prealpha => write!(f, "prealpha"),
            DistTag::Stable { major, minor } => write!(f, "{}.{}-stable", major, minor),
        }
    }
}

impl Serialize for DistTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
