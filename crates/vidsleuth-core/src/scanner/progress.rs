/// Scan progress reporting: lightweight messages sent from the scan
/// workers to the caller via a crossbeam channel.
///
/// The records themselves live in the shared `LiveResults`; these
/// messages carry only counters and status.
use std::time::Duration;

#[derive(Debug)]
pub enum ScanProgress {
    /// Sent after each candidate has been processed.
    Update {
        files_processed: u64,
        candidates_found: u64,
        skipped: u64,
        current_path: String,
    },
    /// A candidate whose metadata could not be obtained. Non-fatal.
    Skipped { path: String, message: String },
    /// A directory that could not be listed. Its subtree is skipped.
    TraversalError { path: String, message: String },
    /// Scanning completed. The sorted results are in the shared `LiveResults`.
    Complete {
        duration: Duration,
        files_processed: u64,
        skipped: u64,
        traversal_errors: u64,
    },
    /// Scan was cancelled. Results gathered so far are kept.
    Cancelled { files_processed: u64, skipped: u64 },
    /// The scan could not run at all (e.g. root is not a directory).
    Failed { message: String },
}

impl ScanProgress {
    /// `true` for the last message a scan ever sends.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Self::Complete { .. } | Self::Cancelled { .. } | Self::Failed { .. }
        )
    }
}
