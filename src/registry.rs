//! npm registry operations built on the npm CLI
//!
//! Every operation runs one npm command synchronously. Apart from
//! [Registry::publish], a non-zero exit is turned into an error carrying the
//! captured standard error.

use crate::command::{CommandOutput, CommandRunner, ExecOptions, Invocation};
use crate::error::{NpmPublishError, Result};
use regex::Regex;
use serde_json::Value;
use std::path::Path;
use std::sync::OnceLock;

/// Default npm executable
pub const DEFAULT_NPM: &str = "npm";

fn not_found_marker() -> &'static Regex {
    static MARKER: OnceLock<Regex> = OnceLock::new();
    MARKER.get_or_init(|| Regex::new(r"npm (ERR!|error) code E404").expect("valid E404 marker"))
}

fn log_line() -> &'static Regex {
    static LINE: OnceLock<Regex> = OnceLock::new();
    LINE.get_or_init(|| {
        Regex::new(r"^\s*npm (ERR!|(verbose|verb|info|silly|notice|http|timing|warn|WARN|error)\b)")
            .expect("valid npm log line pattern")
    })
}

/// Options for `npm publish`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishOptions {
    /// Distribution tags, each passed as its own `--tag`
    pub tags: Vec<String>,
    /// One-time password for accounts with 2FA
    pub otp: Option<String>,
}

/// Looks up the version a package resolves to at a distribution tag
pub trait VersionLookup: Send + Sync {
    /// Version of `package` at `tag`, or at the default tag when `None`
    fn version_by_tag(&self, package: &str, tag: Option<&str>) -> Result<String>;
}

/// npm CLI wrapper
#[derive(Debug)]
pub struct Registry<R: CommandRunner> {
    runner: R,
    npm: String,
}

impl<R: CommandRunner> Registry<R> {
    /// Registry operations using the `npm` found on `PATH`
    pub fn new(runner: R) -> Self {
        Registry {
            runner,
            npm: DEFAULT_NPM.to_string(),
        }
    }

    /// Use a different npm executable
    pub fn with_program(mut self, npm: impl Into<String>) -> Self {
        self.npm = npm.into();
        self
    }

    /// The underlying command runner
    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn npm(&self, options: ExecOptions) -> Invocation {
        Invocation::new(&self.npm, options)
    }

    /// Publish the package at `path`
    ///
    /// Returns the raw command result. The exit code is NOT checked here;
    /// callers decide whether a failed publish is fatal.
    pub fn publish(
        &self,
        path: &Path,
        options: &PublishOptions,
        exec: ExecOptions,
    ) -> Result<CommandOutput> {
        let mut invocation = self.npm(exec.in_dir(path)).arg("publish");

        for tag in &options.tags {
            invocation = invocation.arg("--tag").arg(tag);
        }

        if let Some(ref otp) = options.otp {
            invocation = invocation.arg("--otp").arg(otp);
        }

        log::info!("publishing {}", path.display());
        self.runner.run(&invocation)
    }

    /// Names of the files that differ between two package specs
    pub fn diff_packages(&self, spec_a: &str, spec_b: &str, exec: ExecOptions) -> Result<String> {
        let invocation = self
            .npm(exec)
            .arg("diff")
            .arg(format!("--diff={}", spec_a))
            .arg(format!("--diff={}", spec_b))
            .arg("--diff-name-only");

        let output = self.runner.run(&invocation)?;
        if !output.success() {
            return Err(NpmPublishError::command(
                format!("Failed to diff {} and {}", spec_a, spec_b),
                output.stderr,
            ));
        }

        Ok(output.stdout)
    }

    /// Create a tarball of the package at `path`
    pub fn pack(&self, path: &Path) -> Result<()> {
        let invocation = self.npm(ExecOptions::default().in_dir(path)).arg("pack");

        let output = self.runner.run(&invocation)?;
        if !output.success() {
            return Err(NpmPublishError::command(
                format!("Failed to pack {}", path.display()),
                output.stderr,
            ));
        }

        Ok(())
    }

    /// Version `package` currently resolves to at `tag` (or its default tag)
    pub fn get_package_version_str_by_tag(&self, package: &str, tag: Option<&str>) -> Result<String> {
        let spec = match tag {
            Some(tag) => format!("{}@{}", package, tag),
            None => package.to_string(),
        };

        let invocation = self.npm(ExecOptions::silent()).arg("view").arg(&spec).arg("version");

        let output = self.runner.run(&invocation)?;
        if !output.success() {
            return Err(NpmPublishError::command(
                format!("Failed to get {} version from npm", tag.unwrap_or("latest")),
                output.stderr,
            ));
        }

        Ok(output.stdout.trim().to_string())
    }

    /// All published versions of `package` matching the semver range `spec`
    ///
    /// Fails with [NpmPublishError::NotFound] when nothing matches.
    pub fn get_versions_by_spec(&self, package: &str, spec: &str) -> Result<Vec<String>> {
        let invocation = self
            .npm(ExecOptions::silent())
            .arg("view")
            .arg(format!("{}@{}", package, spec))
            .arg("version")
            .arg("--json");

        let output = self.runner.run(&invocation)?;
        if !output.success() {
            if not_found_marker().is_match(&output.stderr) {
                if let Some(summary) = not_found_summary(&output.stderr) {
                    return Err(NpmPublishError::NotFound(summary));
                }
            }
            return Err(NpmPublishError::command(
                format!("Failed: {}", invocation),
                output.stderr,
            ));
        }

        parse_versions(&output.stdout)
    }
}

impl<R: CommandRunner> VersionLookup for Registry<R> {
    fn version_by_tag(&self, package: &str, tag: Option<&str>) -> Result<String> {
        self.get_package_version_str_by_tag(package, tag)
    }
}

/// Extract the `summary` of the JSON error npm writes among its log lines
fn not_found_summary(stderr: &str) -> Option<String> {
    let payload: String = stderr
        .lines()
        .filter(|line| !log_line().is_match(line))
        .collect();

    let value: Value = serde_json::from_str(&payload).ok()?;
    value
        .pointer("/error/summary")
        .or_else(|| value.get("summary"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

/// A single match prints a bare string; several print an array
fn parse_versions(stdout: &str) -> Result<Vec<String>> {
    let trimmed = stdout.trim();
    if trimmed.is_empty() {
        return Ok(Vec::new());
    }

    match serde_json::from_str::<Value>(trimmed)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| match item {
                Value::String(s) => Ok(s),
                other => Err(NpmPublishError::version(format!(
                    "Unexpected version entry: {}",
                    other
                ))),
            })
            .collect(),
        Value::String(s) => Ok(vec![s]),
        other => Err(NpmPublishError::version(format!(
            "Unexpected npm view output: {}",
            other
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const E404_STDERR: &str = r#"npm ERR! code E404
npm ERR! 404 No match found for version ^0.72.0
{
  "error": {
    "code": "E404",
    "summary": "No match found for version ^0.72.0",
    "detail": "\n 'react-native@^0.72.0' is not in this registry."
  }
}
npm ERR! A complete log of this run can be found in:
npm ERR!     /home/ci/.npm/_logs/debug-0.log"#;

    #[test]
    fn test_not_found_summary_nested() {
        assert_eq!(
            not_found_summary(E404_STDERR).as_deref(),
            Some("No match found for version ^0.72.0")
        );
    }

    #[test]
    fn test_not_found_summary_top_level() {
        let stderr = "npm error code E404\n{\"summary\": \"Not found\"}\n";
        assert_eq!(not_found_summary(stderr).as_deref(), Some("Not found"));
    }

    #[test]
    fn test_not_found_summary_without_payload() {
        assert_eq!(not_found_summary("npm ERR! code E404\n"), None);
    }

    #[test]
    fn test_parse_versions_bare_string() {
        assert_eq!(parse_versions("\"0.72.1\"\n").unwrap(), vec!["0.72.1"]);
    }

    #[test]
    fn test_parse_versions_array() {
        assert_eq!(
            parse_versions("[\"0.72.0\", \"0.72.1\"]").unwrap(),
            vec!["0.72.0", "0.72.1"]
        );
    }

    #[test]
    fn test_parse_versions_empty() {
        assert!(parse_versions("  \n").unwrap().is_empty());
    }

    #[test]
    fn test_parse_versions_rejects_objects() {
        assert!(parse_versions("{\"a\": 1}").is_err());
    }

    #[test]
    fn test_log_line_pattern() {
        assert!(log_line().is_match("npm ERR! code E404"));
        assert!(log_line().is_match("npm error 404 Not Found"));
        assert!(log_line().is_match("npm WARN config"));
        assert!(log_line().is_match("npm ERR! 404"));
        assert!(log_line().is_match("npm verbose cli /usr/bin/node /usr/bin/npm"));
        assert!(log_line().is_match("npm info using npm@10.2.0"));
        assert!(log_line().is_match("npm silly logfile done cleaning log files"));
        assert!(!log_line().is_match("  \"summary\": \"npm ERR! inside\""));
    }
}
