//! package.json manifest parsing.
//!
//! Only the direct-dependency name→range map matters for root correlation;
//! every other field is opaque. Ranges are kept for display purposes but
//! never evaluated: the lockfile already pins exact versions, so matching
//! a declared dependency reduces to a name lookup.

use crate::error::{NpmError, Result};
use serde_json::Value;
use std::collections::BTreeMap;

/// Declared direct dependencies from a package.json.
///
/// # Examples
///
/// ```
/// use lockgraph_npm::manifest::parse_manifest;
///
/// let json = r#"{
///   "name": "my-app",
///   "version": "0.1.0",
///   "dependencies": {
///     "express": "^4.18.2"
///   }
/// }"#;
///
/// let manifest = parse_manifest(json).unwrap();
/// assert_eq!(manifest.name.as_deref(), Some("my-app"));
/// assert!(manifest.dependencies.contains_key("express"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NpmManifest {
    pub name: Option<String>,
    pub version: Option<String>,
    /// Declared name → version range. Range strings are never evaluated.
    pub dependencies: BTreeMap<String, String>,
}

impl NpmManifest {
    /// Iterates over declared dependency names.
    pub fn declared_names(&self) -> impl Iterator<Item = &str> {
        self.dependencies.keys().map(String::as_str)
    }
}

/// Parses a package.json document.
///
/// Missing or malformed `dependencies` entries degrade to an empty map;
/// only non-JSON content is an error.
///
/// # Errors
///
/// Returns [`NpmError::JsonParse`] when the content is not valid JSON and
/// [`NpmError::InvalidStructure`] when the top level is not an object.
pub fn parse_manifest(content: &str) -> Result<NpmManifest> {
    let root: Value =
        serde_json::from_str(content).map_err(|e| NpmError::json_parse("package.json", e))?;

    let Some(obj) = root.as_object() else {
        return Err(NpmError::invalid_structure(
            "package.json",
            "top level is not an object",
        ));
    };

    let mut dependencies = BTreeMap::new();
    if let Some(deps) = obj.get("dependencies").and_then(Value::as_object) {
        for (name, range) in deps {
            if name.trim().is_empty() {
                continue;
            }
            // Non-string ranges are malformed sub-records; keep the name,
            // correlation only needs it.
            let range = range.as_str().unwrap_or_default().to_string();
            dependencies.insert(name.clone(), range);
        }
    }

    Ok(NpmManifest {
        name: obj.get("name").and_then(Value::as_str).map(str::to_string),
        version: obj
            .get("version")
            .and_then(Value::as_str)
            .map(str::to_string),
        dependencies,
    })
}
