//! Component identity and metadata.
//!
//! A detected component is identified by its (name, version) pair. The
//! integrity hash recorded alongside it is provenance metadata: two
//! occurrences that agree on name and version are the same component even
//! when their hashes differ.

use crate::error::{CoreError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity of an npm component: the (name, version) pair.
///
/// Used as the key for graph nodes, attribution sets and dedup/merge.
/// Neither field may be empty; use [`ComponentId::new`] to enforce this.
///
/// # Examples
///
/// ```
/// use lockgraph_core::component::ComponentId;
///
/// let id = ComponentId::new("express", "4.18.2").unwrap();
/// assert_eq!(id.to_string(), "express 4.18.2 - npm");
///
/// assert!(ComponentId::new("", "4.18.2").is_err());
/// assert!(ComponentId::new("express", "  ").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ComponentId {
    pub name: String,
    pub version: String,
}

impl ComponentId {
    /// Creates a component identity, rejecting empty or whitespace-only
    /// names and versions so invalid entries never reach a graph.
    pub fn new(name: impl Into<String>, version: impl Into<String>) -> Result<Self> {
        let name = name.into();
        let version = version.into();
        if name.trim().is_empty() {
            return Err(CoreError::InvalidComponent("empty name".into()));
        }
        if version.trim().is_empty() {
            return Err(CoreError::InvalidComponent(format!(
                "empty version for '{name}'"
            )));
        }
        Ok(Self { name, version })
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} - npm", self.name, self.version)
    }
}

/// A component occurrence extracted from a lockfile.
///
/// Carries the non-identity metadata that travels with a detection: the
/// integrity hash as recorded in the lockfile, and whether the entry was
/// marked as a development-only install.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NpmComponent {
    pub id: ComponentId,
    /// Integrity hash (`sha512-...` / `sha1-...`) from the lockfile entry.
    pub hash: Option<String>,
    /// True when the lockfile entry carried `"dev": true`.
    pub dev: bool,
}

impl NpmComponent {
    pub fn new(id: ComponentId, hash: Option<String>, dev: bool) -> Self {
        Self { id, hash, dev }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_component_id_display() {
        let id = ComponentId::new("lodash", "4.17.21").unwrap();
        assert_eq!(id.to_string(), "lodash 4.17.21 - npm");
    }

    #[test]
    fn test_scoped_name_accepted() {
        let id = ComponentId::new("@babel/core", "7.23.0").unwrap();
        assert_eq!(id.name, "@babel/core");
    }

    #[test]
    fn test_empty_name_rejected() {
        assert!(ComponentId::new("", "1.0.0").is_err());
        assert!(ComponentId::new("   ", "1.0.0").is_err());
    }

    #[test]
    fn test_empty_version_rejected() {
        assert!(ComponentId::new("express", "").is_err());
        assert!(ComponentId::new("express", " ").is_err());
    }

    #[test]
    fn test_identity_ignores_hash() {
        let id = ComponentId::new("a", "1.0.0").unwrap();
        let first = NpmComponent::new(id.clone(), Some("sha1-abc".into()), false);
        let second = NpmComponent::new(id, Some("sha1-def".into()), false);
        assert_eq!(first.id, second.id);
        assert_ne!(first, second);
    }
}
