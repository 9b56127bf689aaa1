//! File discovery interfaces and scan configuration.
//!
//! The core never touches the filesystem. A discovery collaborator hands
//! over fully read `(name, contents, location)` tuples, and path
//! relationships are answered through the [`PathPredicate`] seam so tests
//! and embedders can substitute their own path semantics.

use std::path::{Component, Path};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// A file delivered by the discovery collaborator.
///
/// Contents arrive fully read; no step of the pipeline performs blocking
/// I/O on the file itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Bare file name, e.g. `package-lock.json`.
    pub file_name: String,
    /// Full file contents.
    pub contents: String,
    /// Absolute location of the file.
    pub location: std::path::PathBuf,
}

impl SourceFile {
    pub fn new(
        file_name: impl Into<String>,
        contents: impl Into<String>,
        location: impl Into<std::path::PathBuf>,
    ) -> Self {
        Self {
            file_name: file_name.into(),
            contents: contents.into(),
            location: location.into(),
        }
    }

    /// Directory containing this file.
    pub fn directory(&self) -> &Path {
        self.location.parent().unwrap_or_else(|| Path::new(""))
    }
}

/// Path containment predicate used for monorepo grouping and
/// install-directory exclusion.
pub trait PathPredicate: Send + Sync {
    /// Returns true when `path` lies underneath `ancestor`.
    fn is_below(&self, path: &Path, ancestor: &Path) -> bool;

    /// Returns true when the path lies inside a dependency-install
    /// directory (`node_modules` for npm). Lockfiles and manifests found
    /// there belong to already-installed packages, not project roots.
    fn under_install_dir(&self, path: &Path) -> bool {
        path.components()
            .any(|c| matches!(c, Component::Normal(name) if name == "node_modules"))
    }
}

/// Default predicate using lexical path prefix matching.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdPathPredicate;

impl PathPredicate for StdPathPredicate {
    fn is_below(&self, path: &Path, ancestor: &Path) -> bool {
        path != ancestor && path.starts_with(ancestor)
    }
}

/// Per-scan configuration.
///
/// `force_flat_lockfile` is read once per unit and forces the v3 flat-map
/// parser regardless of the lockfile's declared version field. It is an
/// explicit value rather than ambient environment state so parsing stays
/// deterministic and testable in isolation.
#[derive(Debug, Default, Clone, Copy)]
pub struct ScanConfig {
    pub force_flat_lockfile: bool,
}

/// Cooperative, coarse-grained cancellation flag.
///
/// A cancelled scan skips units not yet started and discards partially
/// built state for units in flight without emitting partial results.
///
/// # Examples
///
/// ```
/// use lockgraph_core::discovery::CancelFlag;
///
/// let flag = CancelFlag::new();
/// assert!(!flag.is_cancelled());
/// flag.cancel();
/// assert!(flag.is_cancelled());
/// ```
#[derive(Debug, Default, Clone)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation of the scan.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_source_file_directory() {
        let file = SourceFile::new("package.json", "{}", "/work/app/package.json");
        assert_eq!(file.directory(), Path::new("/work/app"));
    }

    #[test]
    fn test_is_below() {
        let p = StdPathPredicate;
        assert!(p.is_below(Path::new("/a/b/c"), Path::new("/a/b")));
        assert!(!p.is_below(Path::new("/a/b"), Path::new("/a/b")));
        assert!(!p.is_below(Path::new("/a/bc"), Path::new("/a/b")));
        assert!(!p.is_below(Path::new("/x/y"), Path::new("/a")));
    }

    #[test]
    fn test_under_install_dir() {
        let p = StdPathPredicate;
        assert!(p.under_install_dir(Path::new("/app/node_modules/x/package-lock.json")));
        assert!(p.under_install_dir(Path::new("node_modules/package.json")));
        assert!(!p.under_install_dir(Path::new("/app/src/package-lock.json")));
        // Similar names must not match.
        assert!(!p.under_install_dir(Path::new("/app/node_modules_backup/package.json")));
    }

    #[test]
    fn test_cancel_flag_shared() {
        let flag = CancelFlag::new();
        let clone = flag.clone();
        clone.cancel();
        assert!(flag.is_cancelled());
    }

    #[test]
    fn test_scan_config_default() {
        let config = ScanConfig::default();
        assert!(!config.force_flat_lockfile);
    }
}
