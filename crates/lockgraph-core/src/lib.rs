//! Core abstractions for lockgraph.
//!
//! This crate provides the ecosystem-agnostic contracts used by the
//! ecosystem engines (currently npm): component identity, the per-location
//! dependency graph, the detection recorder with its cross-location merge,
//! and the file-discovery interfaces.
//!
//! # Architecture
//!
//! lockgraph-core defines:
//! - **Identity**: [`ComponentId`] keys graphs, attributions and merges by
//!   (name, version); integrity hashes stay provenance metadata.
//! - **Graph**: [`DependencyGraph`], one per lockfile location, with
//!   idempotent edge insertion and cycle-safe reachability.
//! - **Recorder**: [`DetectionRecorder`], the concurrent result sink that
//!   merges duplicate discoveries and exposes both per-location and
//!   globally merged views.
//! - **Discovery seam**: [`SourceFile`] tuples from the discovery
//!   collaborator and the [`PathPredicate`] trait for containment checks.
//!
//! # Examples
//!
//! Recording a small detection by hand:
//!
//! ```
//! use lockgraph_core::{ComponentId, DependencyGraph, DetectionRecorder, NpmComponent};
//! use std::path::Path;
//!
//! let express = ComponentId::new("express", "4.18.2").unwrap();
//! let body_parser = ComponentId::new("body-parser", "1.20.1").unwrap();
//!
//! let mut graph = DependencyGraph::new();
//! graph.add_edge(express.clone(), body_parser.clone());
//!
//! let recorder = DetectionRecorder::new();
//! let location = Path::new("/app/package-lock.json");
//!
//! for reached in graph.reachable_from(&express) {
//!     recorder.register_usage(
//!         location,
//!         NpmComponent::new(reached, None, false),
//!         [express.clone()].into(),
//!     );
//! }
//! recorder.record_graph(location, graph);
//!
//! assert_eq!(recorder.detected_components().len(), 2);
//! ```

pub mod component;
pub mod detect;
pub mod discovery;
pub mod error;
pub mod graph;
pub mod recorder;

// Re-export commonly used types
pub use component::{ComponentId, NpmComponent};
pub use detect::{FileComponentDetector, ScanResultCode, ScanSummary};
pub use discovery::{CancelFlag, PathPredicate, ScanConfig, SourceFile, StdPathPredicate};
pub use error::{CoreError, Result};
pub use graph::DependencyGraph;
pub use recorder::{DetectedComponent, Detection, DetectionRecorder};
