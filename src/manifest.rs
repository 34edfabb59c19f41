use crate::error::{NpmPublishError, Result};
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

/// Sections whose entries can be pinned by an override
pub const DEPENDENCY_SECTIONS: [&str; 2] = ["dependencies", "devDependencies"];

/// In-memory `package.json`
///
/// The document is held as one ordered JSON object, so writing it back only
/// changes the values that were patched.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackageManifest {
    fields: Map<String, Value>,
}

impl PackageManifest {
    /// Parse a manifest from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        match serde_json::from_str(text)? {
            Value::Object(fields) => Ok(PackageManifest { fields }),
            _ => Err(NpmPublishError::manifest("package.json must be a JSON object")),
        }
    }

    /// Read a manifest from disk
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
            .map_err(|e| NpmPublishError::manifest(format!("{}: {}", path.display(), e)))
    }

    /// Pretty JSON with a trailing newline, as npm writes it
    pub fn to_json(&self) -> Result<String> {
        let mut text = serde_json::to_string_pretty(&self.fields)?;
        text.push('\n');
        Ok(text)
    }

    /// Write the manifest to disk
    pub fn save(&self, path: &Path) -> Result<()> {
        fs::write(path, self.to_json()?)?;
        Ok(())
    }

    pub fn name(&self) -> Option<&str> {
        self.fields.get("name").and_then(Value::as_str)
    }

    pub fn version(&self) -> Option<&str> {
        self.fields.get("version").and_then(Value::as_str)
    }

    /// Any top-level field
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    /// Entries of a dependency section such as `devDependencies`
    pub fn section(&self, section: &str) -> Option<&Map<String, Value>> {
        self.fields.get(section).and_then(Value::as_object)
    }

    /// Version spec of `name` in `section`
    pub fn dependency(&self, section: &str, name: &str) -> Option<&str> {
        self.section(section)?.get(name).and_then(Value::as_str)
    }

    /// Copy of the manifest with its `version` field set
    ///
    /// An existing `version` keeps its position; a missing one is appended.
    pub fn with_version(&self, version: impl Into<String>) -> Self {
        let mut patched = self.clone();
        patched
            .fields
            .insert("version".to_string(), Value::String(version.into()));
        patched
    }

    fn declares(&self, name: &str) -> bool {
        DEPENDENCY_SECTIONS
            .iter()
            .any(|section| self.section(section).is_some_and(|deps| deps.contains_key(name)))
    }
}

/// Pin dependencies to the versions in `overrides`
///
/// Only names already present in `dependencies` or `devDependencies` are
/// rewritten, in place; other names are ignored, never added. The input is
/// untouched.
pub fn apply_package_versions(
    manifest: &PackageManifest,
    overrides: &BTreeMap<String, String>,
) -> PackageManifest {
    let mut patched = manifest.clone();

    for section in DEPENDENCY_SECTIONS {
        let Some(Value::Object(deps)) = patched.fields.get_mut(section) else {
            continue;
        };
        for (name, version) in overrides {
            if let Some(spec) = deps.get_mut(name) {
                *spec = Value::String(version.clone());
            }
        }
    }

    patched
}

/// Override names that `apply_package_versions` would ignore
pub fn unapplied_overrides(
    manifest: &PackageManifest,
    overrides: &BTreeMap<String, String>,
) -> Vec<String> {
    overrides
        .keys()
        .filter(|name| !manifest.declares(name))
        .cloned()
        .collect()
}

/// Parse `name=version` pairs; the first `=` separates name from spec
pub fn parse_overrides<S: AsRef<str>>(pairs: &[S]) -> Result<BTreeMap<String, String>> {
    pairs
        .iter()
        .map(|pair| {
            let pair = pair.as_ref();
            match pair.split_once('=') {
                Some((name, version)) if !name.is_empty() && !version.is_empty() => {
                    Ok((name.to_string(), version.to_string()))
                }
                _ => Err(NpmPublishError::manifest(format!(
                    "Invalid override '{}': expected name=version",
                    pair
                ))),
            }
        })
        .collect()
}
