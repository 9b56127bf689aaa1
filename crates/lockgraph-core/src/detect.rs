//! Detector contract shared by ecosystem engines.
//!
//! An engine consumes the discovery collaborator's file stream, records
//! per-location graphs and attributed components on the recorder, and
//! reports a coarse scan outcome. Best-effort degradation applies: a unit
//! yielding zero components is still a successful scan.

use crate::discovery::{CancelFlag, SourceFile};
use crate::recorder::DetectionRecorder;
use async_trait::async_trait;

/// Coarse outcome of a scan.
///
/// Per-file structural failures are reported through
/// [`DetectionRecorder::record_file_error`] and do not change the scan
/// outcome; `InputFailure` is reserved for a discovery stream the engine
/// could not consume at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanResultCode {
    Success,
    InputFailure,
}

/// Summary returned by a detector run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanSummary {
    pub result_code: ScanResultCode,
    /// Units that ran to completion (including those yielding nothing).
    pub units_processed: usize,
    /// Units skipped because cancellation was requested first.
    pub units_cancelled: usize,
}

/// An ecosystem-specific component detector.
///
/// Implementations pair lockfiles with companion manifests, resolve the
/// dependency topology and register detections. The detector never touches
/// the filesystem; contents arrive pre-read in [`SourceFile`] tuples.
#[async_trait]
pub trait FileComponentDetector: Send + Sync {
    /// File name patterns the discovery collaborator should match.
    fn search_patterns(&self) -> &[&str];

    /// Processes the discovered files, recording results on `recorder`.
    async fn scan(
        &self,
        files: Vec<SourceFile>,
        recorder: &DetectionRecorder,
        cancel: &CancelFlag,
    ) -> ScanSummary;
}
