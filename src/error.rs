use thiserror::Error;

/// Unified error type for npm-publish operations
#[derive(Error, Debug)]
pub enum NpmPublishError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Unsupported build type: {0}")]
    UnsupportedBuildType(String),

    #[error("{message}\n{stderr}")]
    Command { message: String, stderr: String },

    /// The registry's own summary, shown verbatim
    #[error("{0}")]
    NotFound(String),

    #[error("Version parsing error: {0}")]
    Version(String),

    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("Git operation failed: {0}")]
    Git(#[from] git2::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience type alias for Results in npm-publish
pub type Result<T> = std::result::Result<T, NpmPublishError>;

impl NpmPublishError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        NpmPublishError::Config(msg.into())
    }

    /// Create a version error with context
    pub fn version(msg: impl Into<String>) -> Self {
        NpmPublishError::Version(msg.into())
    }

    /// Create a manifest error with context
    pub fn manifest(msg: impl Into<String>) -> Self {
        NpmPublishError::Manifest(msg.into())
    }

    /// Create a command error carrying the captured standard error
    pub fn command(message: impl Into<String>, stderr: impl Into<String>) -> Self {
        NpmPublishError::Command {
            message: message.into(),
            stderr: stderr.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = NpmPublishError::config("CIRCLE_TAG must exist for release builds");
        assert_eq!(
            err.to_string(),
            "Configuration error: CIRCLE_TAG must exist for release builds"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: NpmPublishError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_command_error_includes_stderr() {
        let err = NpmPublishError::command("Failed to pack", "npm ERR! missing package.json");
        let msg = err.to_string();
        assert!(msg.starts_with("Failed to pack"));
        assert!(msg.contains("npm ERR! missing package.json"));
    }

    #[test]
    fn test_not_found_is_verbatim() {
        let err = NpmPublishError::NotFound("No match found for version ^0.72.0".to_string());
        assert_eq!(err.to_string(), "No match found for version ^0.72.0");
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (NpmPublishError::config("x"), "Configuration error"),
            (NpmPublishError::version("x"), "Version parsing error"),
            (NpmPublishError::manifest("x"), "Manifest error"),
            (
                NpmPublishError::UnsupportedBuildType("x".to_string()),
                "Unsupported build type",
            ),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }

    #[test]
    fn test_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
        let err: NpmPublishError = json_err.into();
        assert!(err.to_string().starts_with("JSON error"));
    }
}
