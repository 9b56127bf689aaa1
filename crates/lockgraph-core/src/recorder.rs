//! Detection recording and cross-location merge.
//!
//! Each lockfile location produces one dependency graph and one attributed
//! component set. The recorder keeps both keyed by location so units can
//! register concurrently, merges duplicate discoveries within a location by
//! identity, and exposes a separate globally merged view so callers choose
//! whether cross-location duplicates count as one detection or several.

use crate::component::{ComponentId, NpmComponent};
use crate::graph::DependencyGraph;
use dashmap::DashMap;
use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

/// One attributed component detection at a single lockfile location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
    pub component: NpmComponent,
    /// Root identities (manifest-declared components) this detection is
    /// reachable from. Never empty in recorder output.
    pub roots: HashSet<ComponentId>,
}

/// A detection paired with the lockfile location that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DetectedComponent {
    pub location: PathBuf,
    pub component: NpmComponent,
    pub roots: HashSet<ComponentId>,
}

/// Thread-safe sink for per-unit detection results.
///
/// Units run independently and register their graphs and attributed
/// components as they finish; the recorder serializes writes per location.
/// Within a location, the first occurrence of an identity fixes the
/// canonical hash/dev record and later occurrences only union in
/// additional root attributions.
///
/// # Examples
///
/// ```
/// use lockgraph_core::component::{ComponentId, NpmComponent};
/// use lockgraph_core::recorder::DetectionRecorder;
/// use std::path::Path;
///
/// let recorder = DetectionRecorder::new();
/// let id = ComponentId::new("express", "4.18.2").unwrap();
/// let root = id.clone();
///
/// recorder.register_usage(
///     Path::new("/app/package-lock.json"),
///     NpmComponent::new(id, Some("sha512-abc".into()), false),
///     [root].into(),
/// );
///
/// assert_eq!(recorder.detected_components().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct DetectionRecorder {
    graphs: DashMap<PathBuf, DependencyGraph>,
    detections: DashMap<PathBuf, HashMap<ComponentId, Detection>>,
    file_errors: DashMap<PathBuf, String>,
}

impl DetectionRecorder {
    /// Creates an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores the frozen dependency graph for a lockfile location.
    pub fn record_graph(&self, location: &Path, graph: DependencyGraph) {
        self.graphs.insert(location.to_path_buf(), graph);
    }

    /// Returns the dependency graph recorded for a location, if any.
    pub fn graph_at(&self, location: &Path) -> Option<DependencyGraph> {
        self.graphs.get(location).map(|g| g.clone())
    }

    /// Returns all recorded graphs keyed by lockfile location.
    pub fn graphs_by_location(&self) -> HashMap<PathBuf, DependencyGraph> {
        self.graphs
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Registers one attributed component occurrence at a location.
    ///
    /// Merging is by (name, version): the first occurrence's hash and dev
    /// flag are canonical, later occurrences contribute roots only.
    pub fn register_usage(
        &self,
        location: &Path,
        component: NpmComponent,
        roots: HashSet<ComponentId>,
    ) {
        let mut per_location = self
            .detections
            .entry(location.to_path_buf())
            .or_default();

        per_location
            .entry(component.id.clone())
            .and_modify(|existing| existing.roots.extend(roots.iter().cloned()))
            .or_insert(Detection { component, roots });
    }

    /// Records a structural per-file failure.
    ///
    /// Does not affect detections from other locations; the overall scan
    /// still counts as successful.
    pub fn record_file_error(&self, location: &Path, message: impl Into<String>) {
        let message = message.into();
        tracing::warn!("Failed to process {}: {}", location.display(), message);
        self.file_errors.insert(location.to_path_buf(), message);
    }

    /// Returns per-file failures recorded during the scan.
    pub fn file_errors(&self) -> HashMap<PathBuf, String> {
        self.file_errors
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    /// Returns all detections, one entry per (location, identity).
    ///
    /// Components that ended up with no attributed roots are excluded.
    pub fn detected_components(&self) -> Vec<DetectedComponent> {
        self.detections
            .iter()
            .flat_map(|entry| {
                let location = entry.key().clone();
                entry
                    .value()
                    .values()
                    .filter(|d| !d.roots.is_empty())
                    .map(|d| DetectedComponent {
                        location: location.clone(),
                        component: d.component.clone(),
                        roots: d.roots.clone(),
                    })
                    .collect::<Vec<_>>()
            })
            .collect()
    }

    /// Pure global union across locations, keyed by identity.
    ///
    /// The first-seen occurrence (in location order) supplies the
    /// canonical hash/dev record; attribution sets are unioned. Hash never
    /// participates in identity, so occurrences differing only in
    /// integrity hash collapse into one entry.
    pub fn merged_view(&self) -> HashMap<ComponentId, Detection> {
        let mut merged: HashMap<ComponentId, Detection> = HashMap::new();

        let mut locations: Vec<PathBuf> =
            self.detections.iter().map(|e| e.key().clone()).collect();
        locations.sort();

        for location in locations {
            if let Some(per_location) = self.detections.get(&location) {
                for detection in per_location.values() {
                    if detection.roots.is_empty() {
                        continue;
                    }
                    merged
                        .entry(detection.component.id.clone())
                        .and_modify(|existing| {
                            existing.roots.extend(detection.roots.iter().cloned());
                        })
                        .or_insert_with(|| detection.clone());
                }
            }
        }
        merged
    }
}
