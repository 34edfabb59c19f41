//! Version and distribution tag resolution for npm builds
//!
//! Maps a [BuildType] plus the current time, commit, upstream version and
//! release identifier onto the version to publish and the tag to publish it
//! under. All inputs come through injected capabilities.

use crate::config::ReleaseConfig;
use crate::domain::{BuildType, DistTag, ParsedVersion};
use crate::environment::{Clock, EnvSource};
use crate::error::{NpmPublishError, Result};
use crate::registry::VersionLookup;
use crate::scm::SourceControl;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;

/// Commit id characters kept in pseudo-versions
pub const SHORT_COMMIT_LEN: usize = 9;

/// Version and tag to publish
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NpmInfo {
    pub version: String,
    /// `None` means the build must not be published under a tag
    pub tag: Option<DistTag>,
}

impl fmt::Display for NpmInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tag {
            Some(ref tag) => write!(f, "{} ({})", self.version, tag),
            None => write!(f, "{} (untagged)", self.version),
        }
    }
}

/// Resolves [NpmInfo] for each build type
pub struct Resolver<'a> {
    clock: &'a dyn Clock,
    env: &'a dyn EnvSource,
    scm: &'a dyn SourceControl,
    registry: &'a dyn VersionLookup,
    settings: &'a ReleaseConfig,
}

impl<'a> Resolver<'a> {
    pub fn new(
        clock: &'a dyn Clock,
        env: &'a dyn EnvSource,
        scm: &'a dyn SourceControl,
        registry: &'a dyn VersionLookup,
        settings: &'a ReleaseConfig,
    ) -> Self {
        Resolver {
            clock,
            env,
            scm,
            registry,
            settings,
        }
    }

    /// Resolve the version and tag for `build_type`
    pub fn resolve(&self, build_type: BuildType) -> Result<NpmInfo> {
        let info = match build_type {
            BuildType::DryRun => self.dry_run()?,
            BuildType::Nightly => self.nightly()?,
            BuildType::Prealpha => self.prealpha(),
            BuildType::Release => self.release()?,
        };

        log::info!("resolved {} build: {}", build_type, info);
        Ok(info)
    }

    /// Resolve from a build type name, rejecting unknown names
    pub fn resolve_named(&self, build_type: &str) -> Result<NpmInfo> {
        self.resolve(BuildType::parse(build_type)?)
    }

    fn short_commit(&self) -> Result<String> {
        let commit = self.scm.current_commit()?;
        Ok(commit.chars().take(SHORT_COMMIT_LEN).collect())
    }

    fn dry_run(&self) -> Result<NpmInfo> {
        Ok(NpmInfo {
            version: format!("1000.0.0-{}", self.short_commit()?),
            tag: None,
        })
    }

    fn nightly(&self) -> Result<NpmInfo> {
        let upstream = self.registry.version_by_tag(
            &self.settings.reference_package,
            Some(self.settings.upstream_tag.as_str()),
        )?;
        let main = ParsedVersion::parse(&upstream, BuildType::Release)?;
        let next = main.core().next_minor()?;

        log::debug!(
            "{}@{} is {}, nightly targets {}",
            self.settings.reference_package,
            self.settings.upstream_tag,
            main,
            next
        );

        Ok(NpmInfo {
            version: format!(
                "{}-nightly-{}-{}",
                next,
                nightly_date_identifier(self.clock.now()),
                self.short_commit()?
            ),
            tag: Some(DistTag::Nightly),
        })
    }

    fn prealpha(&self) -> NpmInfo {
        NpmInfo {
            version: format!("0.0.0-prealpha-{}", prealpha_date_identifier(self.clock.now())),
            tag: Some(DistTag::Prealpha),
        }
    }

    fn release(&self) -> Result<NpmInfo> {
        let variable = &self.settings.release_tag_env;
        let release_tag = self
            .env
            .var(variable)
            .filter(|value| !value.trim().is_empty())
            .ok_or_else(|| {
                NpmPublishError::config(format!("{} must exist for release builds", variable))
            })?;

        let parsed = ParsedVersion::parse(&release_tag, BuildType::Release)?;
        let commit = self.scm.current_commit()?;
        let is_latest = self.scm.is_tagged_latest(&commit)?;

        Ok(NpmInfo {
            tag: Some(release_dist_tag(&parsed, is_latest)),
            version: parsed.version,
        })
    }
}

/// Tag for a release: pre-releases go to `next`, the latest line to
/// `latest`, and patches to older lines to their `<major>.<minor>-stable`
pub fn release_dist_tag(version: &ParsedVersion, is_latest: bool) -> DistTag {
    if version.prerelease.is_some() {
        DistTag::Next
    } else if is_latest {
        DistTag::Latest
    } else {
        DistTag::stable(version.major, version.minor)
    }
}

/// `YYYYMMDD` in UTC
pub fn nightly_date_identifier(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d").to_string()
}

/// `YYYYMMDDHH` in UTC; stays below 2^32-1 as an hourly counter
pub fn prealpha_date_identifier(now: DateTime<Utc>) -> String {
    now.format("%Y%m%d%H").to_string()
}
