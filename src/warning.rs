use std::fmt;

/// Non-fatal conditions reported to the user
#[derive(Debug, Clone, PartialEq)]
pub enum PublishWarning {
    /// A version override names a package the manifest does not depend on
    OverrideNotApplied { name: String, manifest: String },
    /// Dry-run builds resolve a version but are never published
    DryRunNotPublished { version: String },
}

impl fmt::Display for PublishWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PublishWarning::OverrideNotApplied { name, manifest } => {
                write!(
                    f,
                    "'{}' is not a dependency of {}; override ignored",
                    name, manifest
                )
            }
            PublishWarning::DryRunNotPublished { version } => {
                write!(f, "Dry-run build {} is never published", version)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_override_not_applied_display() {
        let warning = PublishWarning::OverrideNotApplied {
            name: "left-pad".to_string(),
            manifest: "package.json".to_string(),
        };
        assert_eq!(
            warning.to_string(),
            "'left-pad' is not a dependency of package.json; override ignored"
        );
    }

    #[test]
    fn test_dry_run_display() {
        let warning = PublishWarning::DryRunNotPublished {
            version: "1000.0.0-abcdef123".to_string(),
        };
        assert!(warning.to_string().contains("1000.0.0-abcdef123"));
    }
}
