//! Main publish workflow orchestration logic
//!
//! Kept apart from argument parsing so the workflow can be driven
//! programmatically (and with mock collaborators) without depending on clap.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};

use crate::command::{CommandRunner, ExecOptions};
use crate::domain::BuildType;
use crate::error::NpmPublishError;
use crate::manifest::PackageManifest;
use crate::registry::{PublishOptions, Registry};
use crate::resolver::{NpmInfo, Resolver};
use crate::ui;
use crate::warning::PublishWarning;

/// Arguments for the publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct PublishWorkflowArgs {
    /// Directory containing the package.json to publish
    pub path: PathBuf,

    pub build_type: BuildType,

    /// One-time password forwarded to npm
    pub otp: Option<String>,

    /// Skip confirmation prompts
    pub force: bool,

    /// Preview mode - don't touch package.json or publish
    pub dry_run: bool,
}

/// Result of a publish workflow
#[derive(Debug, Clone, PartialEq)]
pub struct WorkflowResult {
    pub info: NpmInfo,

    /// Whether npm publish ran and succeeded
    pub published: bool,
}

/// Main publish workflow
///
/// 1. Resolve version and tag for the build type
/// 2. Stop for untagged (dry-run) builds and `--dry-run` previews
/// 3. Confirm unless forced
/// 4. Write the version into package.json and run `npm publish --tag <tag>`
///
/// Unlike [Registry::publish], a non-zero npm exit is an error here, and
/// package.json is put back as it was before the error is returned.
pub fn run_publish_workflow<R, F>(
    args: &PublishWorkflowArgs,
    resolver: &Resolver<'_>,
    registry: &Registry<R>,
    confirm: F,
) -> Result<WorkflowResult>
where
    R: CommandRunner,
    F: FnOnce(&NpmInfo) -> Result<bool>,
{
    let info = resolver.resolve(args.build_type)?;
    ui::display_npm_info(&info);

    let not_published = |info: NpmInfo| WorkflowResult {
        info,
        published: false,
    };

    let Some(tag) = info.tag.as_ref().map(ToString::to_string) else {
        ui::display_warning(&PublishWarning::DryRunNotPublished {
            version: info.version.clone(),
        });
        return Ok(not_published(info));
    };

    if args.dry_run {
        ui::display_status(&format!(
            "Dry run: would publish {} with tag '{}'",
            info.version, tag
        ));
        return Ok(not_published(info));
    }

    if !args.force && !confirm(&info)? {
        println!("Publish cancelled by user.");
        return Ok(not_published(info));
    }

    let manifest_path = args.path.join("package.json");
    let original = fs::read_to_string(&manifest_path)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    let manifest = PackageManifest::from_json(&original)
        .with_context(|| format!("Failed to read {}", manifest_path.display()))?;
    manifest.with_version(&info.version).save(&manifest_path)?;
    log::info!(
        "set {} version to {}",
        manifest.name().unwrap_or("package"),
        info.version
    );

    let options = PublishOptions {
        tags: vec![tag.clone()],
        otp: args.otp.clone(),
    };

    let failure = match registry.publish(&args.path, &options, ExecOptions::default()) {
        Ok(ref output) if output.success() => None,
        Ok(output) => Some(NpmPublishError::command(
            format!("Failed to publish {} with tag '{}'", info.version, tag),
            output.stderr,
        )),
        Err(e) => Some(e),
    };

    if let Some(err) = failure {
        fs::write(&manifest_path, &original)
            .with_context(|| format!("Failed to restore {}", manifest_path.display()))?;
        log::info!("restored {} after failed publish", manifest_path.display());
        return Err(err.into());
    }

    ui::display_success(&format!("Published {} with tag '{}'", info.version, tag));
    Ok(WorkflowResult {
        info,
        published: true,
    })
}
