use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use npm_publish::cli::orchestration::{run_publish_workflow, PublishWorkflowArgs};
use npm_publish::command::{ExecOptions, SystemRunner};
use npm_publish::config::{self, Config};
use npm_publish::domain::BuildType;
use npm_publish::environment::{ProcessEnv, SystemClock};
use npm_publish::manifest::{self, PackageManifest};
use npm_publish::registry::Registry;
use npm_publish::scm::Git2Repository;
use npm_publish::ui;
use npm_publish::warning::PublishWarning;
use npm_publish::Resolver;

#[derive(Parser)]
#[command(
    name = "npm-publish",
    version,
    about = "Compute npm versions and dist-tags for release builds and publish them"
)]
struct Args {
    #[arg(short, long, global = true, help = "Custom configuration file path")]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the version and dist-tag a build would publish
    Info {
        /// Build type: dry-run, release, nightly or prealpha
        build_type: String,

        #[arg(long, help = "Print as JSON")]
        json: bool,
    },

    /// Resolve the version, write it to package.json and publish
    Publish {
        /// Package directory
        path: PathBuf,

        #[arg(short, long, help = "Build type: dry-run, release, nightly or prealpha")]
        build_type: String,

        #[arg(long, help = "One-time password for npm")]
        otp: Option<String>,

        #[arg(short, long, help = "Skip confirmation prompts")]
        yes: bool,

        #[arg(long, help = "Preview what would happen without making changes")]
        dry_run: bool,
    },

    /// List files that differ between two package specs
    Diff { spec_a: String, spec_b: String },

    /// Create a package tarball
    Pack { path: PathBuf },

    /// Print the version a package resolves to at a dist-tag
    View {
        package: String,

        #[arg(short, long)]
        tag: Option<String>,
    },

    /// List published versions matching a semver range
    Versions { package: String, spec: String },

    /// Pin dependency versions in a package.json
    ApplyVersions {
        manifest: PathBuf,

        /// Overrides as name=version
        #[arg(required = true)]
        overrides: Vec<String>,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run(Args::parse()) {
        ui::display_error(&format!("{:#}", e));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = config::load_config(args.config.as_deref())?;
    let registry = Registry::new(SystemRunner).with_program(&config.registry.npm);

    match args.command {
        Commands::Info { build_type, json } => {
            let build_type = BuildType::parse(&build_type)?;
            let info = with_resolver(&config, &registry, |resolver| {
                Ok(resolver.resolve(build_type)?)
            })?;

            if json {
                println!("{}", serde_json::to_string_pretty(&info)?);
            } else {
                ui::display_npm_info(&info);
            }
        }

        Commands::Publish {
            path,
            build_type,
            otp,
            yes,
            dry_run,
        } => {
            let workflow = PublishWorkflowArgs {
                path,
                build_type: BuildType::parse(&build_type)?,
                otp,
                force: yes,
                dry_run,
            };
            let display_path = workflow.path.display().to_string();

            with_resolver(&config, &registry, |resolver| {
                run_publish_workflow(&workflow, resolver, &registry, |info| {
                    let tag = info.tag.as_ref().map(ToString::to_string).unwrap_or_default();
                    ui::confirm_publish(&display_path, &info.version, &tag)
                })
            })?;
        }

        Commands::Diff { spec_a, spec_b } => {
            let files = registry.diff_packages(&spec_a, &spec_b, ExecOptions::silent())?;
            print!("{}", files);
        }

        Commands::Pack { path } => {
            registry.pack(&path)?;
            ui::display_success(&format!("Packed {}", path.display()));
        }

        Commands::View { package, tag } => {
            println!(
                "{}",
                registry.get_package_version_str_by_tag(&package, tag.as_deref())?
            );
        }

        Commands::Versions { package, spec } => {
            ui::display_versions(&registry.get_versions_by_spec(&package, &spec)?);
        }

        Commands::ApplyVersions {
            manifest: manifest_path,
            overrides,
        } => {
            let overrides = manifest::parse_overrides(&overrides)?;
            let original = PackageManifest::load(&manifest_path)?;

            for name in manifest::unapplied_overrides(&original, &overrides) {
                ui::display_warning(&PublishWarning::OverrideNotApplied {
                    name,
                    manifest: manifest_path.display().to_string(),
                });
            }

            manifest::apply_package_versions(&original, &overrides).save(&manifest_path)?;
            ui::display_success(&format!("Updated {}", manifest_path.display()));
        }
    }

    Ok(())
}

/// Build a resolver on the real clock, environment and repository
fn with_resolver<T>(
    config: &Config,
    registry: &Registry<SystemRunner>,
    f: impl FnOnce(&Resolver<'_>) -> Result<T>,
) -> Result<T> {
    let scm = Git2Repository::lazy(".");
    let resolver = Resolver::new(&SystemClock, &ProcessEnv, &scm, registry, &config.release);

    f(&resolver)
}
