//! npm lockfile resolution engine for lockgraph.
//!
//! Discovers the open-source components a project actually uses by
//! correlating `package-lock.json` / `npm-shrinkwrap.json` contents with
//! the companion `package.json`'s declared dependencies.
//!
//! # Pipeline
//!
//! 1. [`detector::NpmDetector`] pairs lockfiles with manifests by
//!    directory (lerna-aware, `node_modules` excluded).
//! 2. [`lockfile::RawLockDocument`] parses one of three lockfile schema
//!    generations into occurrences plus raw requirement edges.
//! 3. [`correlator::correlate_roots`] walks the location's graph from the
//!    manifest-declared roots, attributing every reachable component and
//!    discarding the rest.
//! 4. Results land on a [`lockgraph_core::DetectionRecorder`], which
//!    merges duplicates per location and offers a global merged view.
//!
//! # Examples
//!
//! ```
//! use lockgraph_core::{CancelFlag, DetectionRecorder, FileComponentDetector, ScanConfig, SourceFile};
//! use lockgraph_npm::NpmDetector;
//!
//! # async fn example() {
//! let lockfile = r#"{
//!   "name": "app", "version": "1.0.0",
//!   "dependencies": {
//!     "left-pad": { "version": "1.3.0", "integrity": "sha512-..." }
//!   }
//! }"#;
//! let manifest = r#"{"name": "app", "dependencies": {"left-pad": "^1.3.0"}}"#;
//!
//! let detector = NpmDetector::new(ScanConfig::default());
//! let recorder = DetectionRecorder::new();
//! detector
//!     .scan(
//!         vec![
//!             SourceFile::new("package-lock.json", lockfile, "/app/package-lock.json"),
//!             SourceFile::new("package.json", manifest, "/app/package.json"),
//!         ],
//!         &recorder,
//!         &CancelFlag::new(),
//!     )
//!     .await;
//!
//! assert_eq!(recorder.detected_components().len(), 1);
//! # }
//! ```

pub mod correlator;
pub mod detector;
pub mod error;
pub mod lockfile;
pub mod manifest;

// Re-export commonly used types
pub use correlator::{correlate_roots, ExplicitReferenceSet};
pub use detector::{NpmDetector, LOCKFILE_SEARCH_PATTERNS, MANIFEST_SEARCH_PATTERN};
pub use error::{NpmError, Result};
pub use lockfile::{LockfileSchema, RawLockDocument};
pub use manifest::{parse_manifest, NpmManifest};
