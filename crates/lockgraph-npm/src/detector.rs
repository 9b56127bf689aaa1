//! npm detector: unit grouping and the per-unit pipeline.
//!
//! Pairs each lockfile with its companion package.json by directory
//! adjacency, applies monorepo (lerna) and install-directory exclusion
//! rules, then drives parse → graph → correlate → record per unit. Units
//! are independent; results land on the shared [`DetectionRecorder`] and
//! the global merge happens after all units complete.

use crate::correlator::correlate_roots;
use crate::lockfile::RawLockDocument;
use crate::manifest::parse_manifest;
use async_trait::async_trait;
use lockgraph_core::{
    CancelFlag, DetectionRecorder, FileComponentDetector, NpmComponent, PathPredicate,
    ScanConfig, ScanResultCode, ScanSummary, SourceFile, StdPathPredicate,
};

/// Lockfile names this detector accepts; `npm-shrinkwrap.json` shares the
/// package-lock grammar.
pub const LOCKFILE_SEARCH_PATTERNS: &[&str] = &["package-lock.json", "npm-shrinkwrap.json"];

/// Companion manifest name.
pub const MANIFEST_SEARCH_PATTERN: &str = "package.json";

/// Monorepo marker: content ignored, only existence and location matter.
const MONOREPO_MARKER: &str = "lerna.json";

const ALL_PATTERNS: &[&str] = &[
    "package-lock.json",
    "npm-shrinkwrap.json",
    "lerna.json",
    "package.json",
];

/// One processing unit: a lockfile, its companion manifest if one was
/// found, and whether a monorepo marker governs it.
struct ScanUnit<'a> {
    lockfile: &'a SourceFile,
    manifest: Option<&'a SourceFile>,
    lerna_grouped: bool,
}

/// npm-ecosystem component detector.
///
/// # Examples
///
/// ```
/// use lockgraph_core::{CancelFlag, DetectionRecorder, FileComponentDetector, ScanConfig, SourceFile};
/// use lockgraph_npm::detector::NpmDetector;
///
/// # async fn example() {
/// let detector = NpmDetector::new(ScanConfig::default());
/// let recorder = DetectionRecorder::new();
/// let files = vec![
///     SourceFile::new("package-lock.json", "{}", "/app/package-lock.json"),
///     SourceFile::new("package.json", "{}", "/app/package.json"),
/// ];
///
/// let summary = detector.scan(files, &recorder, &CancelFlag::new()).await;
/// assert_eq!(summary.units_processed, 1);
/// # }
/// ```
pub struct NpmDetector<P: PathPredicate = StdPathPredicate> {
    config: ScanConfig,
    paths: P,
}

impl NpmDetector<StdPathPredicate> {
    /// Creates a detector with the default lexical path predicate.
    pub fn new(config: ScanConfig) -> Self {
        Self {
            config,
            paths: StdPathPredicate,
        }
    }
}

impl<P: PathPredicate> NpmDetector<P> {
    /// Creates a detector with a caller-supplied path predicate.
    pub fn with_path_predicate(config: ScanConfig, paths: P) -> Self {
        Self { config, paths }
    }

    /// Buckets discovered files and pairs lockfiles with manifests.
    ///
    /// Files underneath a `node_modules` directory are excluded entirely,
    /// markers included: they belong to already-installed packages, not
    /// project roots. Pairing is sibling-first; a monorepo marker in an
    /// ancestor directory additionally allows pairing with the nearest
    /// manifest below the lockfile's directory.
    fn group_units<'a>(&self, files: &'a [SourceFile]) -> Vec<ScanUnit<'a>> {
        let mut lockfiles: Vec<&SourceFile> = Vec::new();
        let mut manifests: Vec<&SourceFile> = Vec::new();
        let mut markers: Vec<&SourceFile> = Vec::new();

        for file in files {
            let name = file.file_name.as_str();
            let bucket = if LOCKFILE_SEARCH_PATTERNS.contains(&name) {
                &mut lockfiles
            } else if name == MANIFEST_SEARCH_PATTERN {
                &mut manifests
            } else if name == MONOREPO_MARKER {
                &mut markers
            } else {
                continue;
            };

            if self.paths.under_install_dir(&file.location) {
                tracing::debug!(
                    "Excluding {} under install directory: {}",
                    name,
                    file.location.display()
                );
                continue;
            }
            bucket.push(file);
        }

        lockfiles
            .into_iter()
            .map(|lockfile| {
                let dir = lockfile.directory();
                let lerna_grouped = markers
                    .iter()
                    .any(|marker| self.paths.is_below(&lockfile.location, marker.directory()));

                let sibling = manifests.iter().copied().find(|m| m.directory() == dir);
                let manifest = sibling.or_else(|| {
                    if !lerna_grouped {
                        return None;
                    }
                    manifests
                        .iter()
                        .copied()
                        .filter(|m| self.paths.is_below(&m.location, dir))
                        .min_by_key(|m| m.location.components().count())
                });

                ScanUnit {
                    lockfile,
                    manifest,
                    lerna_grouped,
                }
            })
            .collect()
    }

    /// Runs one unit end to end. Every early return is best-effort
    /// degradation: the unit yields nothing, the scan stays successful.
    fn process_unit(&self, unit: &ScanUnit<'_>, recorder: &DetectionRecorder) {
        let location = &unit.lockfile.location;

        let doc = match RawLockDocument::parse(
            &unit.lockfile.contents,
            self.config.force_flat_lockfile,
        ) {
            Ok(doc) => doc,
            Err(e) => {
                recorder.record_file_error(location, e.to_string());
                return;
            }
        };

        // Lockfiles without a usable root entry are rejected, except under
        // a monorepo marker where workspace-level lockfiles legitimately
        // omit root name/version.
        if !unit.lerna_grouped && !doc.has_valid_root() {
            tracing::debug!(
                "Lockfile {} has no usable root entry, yielding nothing",
                location.display()
            );
            return;
        }

        let graph = doc.build_graph();
        recorder.record_graph(location, graph.clone());

        // A lockfile alone never contributes detections.
        let Some(manifest_file) = unit.manifest else {
            tracing::debug!(
                "No companion manifest for {}, yielding nothing",
                location.display()
            );
            return;
        };
        let manifest = match parse_manifest(&manifest_file.contents) {
            Ok(manifest) => manifest,
            Err(e) => {
                recorder.record_file_error(&manifest_file.location, e.to_string());
                return;
            }
        };

        // The manifest is authoritative; the lockfile root's declared
        // names only seed correlation when the manifest declares nothing.
        let declared: Vec<&str> = if manifest.dependencies.is_empty() {
            doc.root_dependencies.iter().map(String::as_str).collect()
        } else {
            manifest.declared_names().collect()
        };

        let references = correlate_roots(&graph, declared.into_iter());
        let by_id = doc.components_by_id();

        let count = references.len();
        for (id, roots) in references {
            let component = by_id
                .get(&id)
                .map(|c| (*c).clone())
                .unwrap_or_else(|| NpmComponent::new(id, None, false));
            recorder.register_usage(location, component, roots);
        }

        tracing::info!(
            "Processed {}: {} attributed components",
            location.display(),
            count
        );
    }
}

#[async_trait]
impl<P: PathPredicate> FileComponentDetector for NpmDetector<P> {
    fn search_patterns(&self) -> &[&str] {
        ALL_PATTERNS
    }

    async fn scan(
        &self,
        files: Vec<SourceFile>,
        recorder: &DetectionRecorder,
        cancel: &CancelFlag,
    ) -> ScanSummary {
        let units = self.group_units(&files);
        tracing::debug!("Grouped {} npm units", units.len());

        let runs = units.iter().map(|unit| async move {
            // Coarse-grained cancellation: skip units not yet started.
            if cancel.is_cancelled() {
                return false;
            }
            self.process_unit(unit, recorder);
            true
        });
        let results = futures::future::join_all(runs).await;

        let units_processed = results.iter().filter(|ran| **ran).count();
        ScanSummary {
            result_code: ScanResultCode::Success,
            units_processed,
            units_cancelled: results.len() - units_processed,
        }
    }
}
