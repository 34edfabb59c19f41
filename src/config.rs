use crate::error::{NpmPublishError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// File name looked up in the current directory
pub const CONFIG_FILE_NAME: &str = "npmpublish.toml";

/// Represents the complete configuration for npm-publish.
///
/// Contains the npm invocation settings and the inputs of version resolution.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Default)]
pub struct Config {
    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub release: ReleaseConfig,
}

fn default_npm() -> String {
    "npm".to_string()
}

/// How npm is invoked.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RegistryConfig {
    /// npm executable name or path
    #[serde(default = "default_npm")]
    pub npm: String,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        RegistryConfig { npm: default_npm() }
    }
}

fn default_reference_package() -> String {
    "react-native".to_string()
}

fn default_upstream_tag() -> String {
    "next".to_string()
}

fn default_release_tag_env() -> String {
    "CIRCLE_TAG".to_string()
}

/// Inputs to version resolution.
///
/// Nightly builds target the minor after the version `reference_package`
/// has at `upstream_tag`; release builds read their version from the
/// `release_tag_env` environment variable.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ReleaseConfig {
    #[serde(default = "default_reference_package")]
    pub reference_package: String,

    #[serde(default = "default_upstream_tag")]
    pub upstream_tag: String,

    #[serde(default = "default_release_tag_env")]
    pub release_tag_env: String,
}

impl Default for ReleaseConfig {
    fn default() -> Self {
        ReleaseConfig {
            reference_package: default_reference_package(),
            upstream_tag: default_upstream_tag(),
            release_tag_env: default_release_tag_env(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `npmpublish.toml` in current directory
/// 3. `~/.config/.npmpublish.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new(CONFIG_FILE_NAME).exists() {
        fs::read_to_string(CONFIG_FILE_NAME)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(format!(".{}", CONFIG_FILE_NAME));
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    parse_config(&config_str)
}

/// Parses configuration from TOML text.
pub fn parse_config(config_str: &str) -> Result<Config> {
    toml::from_str(config_str).map_err(|e| NpmPublishError::config(e.to_string()))
}
