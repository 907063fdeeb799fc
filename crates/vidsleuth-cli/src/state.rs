/// Scan session state.
///
/// Centralises all mutable state the frontend reads and writes. The scan
/// thread communicates via channels; state updates happen in
/// `process_scan_messages()`, which the frontend calls from its own loop.
///
/// During scanning, records are read from the scan's **shared
/// `LiveResults`** so rows appear as they are classified. On completion
/// the finished `ResultSet` is moved into the state.
use crate::view::{self, Column};
use crossbeam_channel::TryRecvError;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};
use vidsleuth_core::model::{FeatureRecord, ResultSet};
use vidsleuth_core::probe::Probe;
use vidsleuth_core::scanner::{self, LiveResults, ScanConfig, ScanHandle, ScanProgress};
use vidsleuth_core::ScanError;

/// The current phase of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppPhase {
    /// No scan in progress, possibly holding previous results.
    Idle,
    /// Scanning, with live counters and a growing result set.
    Scanning,
    /// Scan finished (completed or cancelled); results are available.
    Results,
    /// The scan could not run; see `scan_failure`.
    Failed,
}

/// Maximum number of scan-progress messages drained per call.
///
/// Keeps one call to `process_scan_messages` short even when a large
/// backlog has built up.
const MAX_MESSAGES_PER_PASS: usize = 500;

/// Maximum skip/traversal messages kept for display.
pub const MAX_SCAN_ERRORS: usize = 1_000;

/// All session state.
pub struct AppState {
    // ── Configuration ──────────────────────────────────
    config: ScanConfig,
    probe: Arc<dyn Probe>,

    // ── Scan ───────────────────────────────────────────
    pub phase: AppPhase,
    pub scan_handle: Option<ScanHandle>,
    pub scan_root: Option<PathBuf>,
    pub scan_files_processed: u64,
    pub scan_candidates_found: u64,
    pub scan_skipped: u64,
    pub scan_traversal_errors: u64,
    pub scan_current_path: String,
    pub scan_duration: Option<Duration>,
    /// True if the most recent scan was cancelled (partial results).
    pub scan_was_cancelled: bool,
    pub scan_failure: Option<String>,
    /// `(path, message)` for skipped files and unreadable directories.
    pub scan_errors: Vec<(String, String)>,

    // ── Results ────────────────────────────────────────
    /// The finished result set (set once the scan ends).
    pub results: Option<ResultSet>,
    /// The live result set during scanning.
    pub live_results: Option<LiveResults>,
}

impl AppState {
    /// Create an idle session that scans with `config` and `probe`.
    pub fn new(config: ScanConfig, probe: Arc<dyn Probe>) -> Self {
        Self {
            config,
            probe,
            phase: AppPhase::Idle,
            scan_handle: None,
            scan_root: None,
            scan_files_processed: 0,
            scan_candidates_found: 0,
            scan_skipped: 0,
            scan_traversal_errors: 0,
            scan_current_path: String::new(),
            scan_duration: None,
            scan_was_cancelled: false,
            scan_failure: None,
            scan_errors: Vec::new(),
            results: None,
            live_results: None,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    pub fn is_scanning(&self) -> bool {
        self.scan_handle.is_some()
    }

    /// Start a scan of `path`, discarding previous results.
    ///
    /// # Errors
    ///
    /// [`ScanError::AlreadyScanning`] while a scan is in flight: only one
    /// scan may feed this session's results at a time.
    pub fn start_scan(&mut self, path: PathBuf) -> Result<(), ScanError> {
        if self.is_scanning() {
            return Err(ScanError::AlreadyScanning);
        }

        let handle = scanner::start_scan(path.clone(), self.config.clone(), self.probe.clone())?;

        self.reset_counters();
        self.phase = AppPhase::Scanning;
        self.scan_current_path = path.to_string_lossy().into_owned();
        self.scan_root = Some(path);
        self.results = None;
        self.live_results = Some(handle.results.clone());
        self.scan_handle = Some(handle);
        Ok(())
    }

    /// Cancel any running scan.
    pub fn cancel_scan(&mut self) {
        if let Some(ref handle) = self.scan_handle {
            handle.cancel();
        }
    }

    /// Drop held results and counters ("Clear Results").
    ///
    /// Ignored while a scan is running; cancel it first.
    pub fn clear_results(&mut self) -> bool {
        if self.is_scanning() {
            debug!("Ignoring clear while a scan is running");
            return false;
        }
        self.reset_counters();
        self.results = None;
        self.live_results = None;
        self.scan_root = None;
        self.scan_current_path.clear();
        self.phase = AppPhase::Idle;
        true
    }

    fn reset_counters(&mut self) {
        self.scan_files_processed = 0;
        self.scan_candidates_found = 0;
        self.scan_skipped = 0;
        self.scan_traversal_errors = 0;
        self.scan_duration = None;
        self.scan_was_cancelled = false;
        self.scan_failure = None;
        self.scan_errors.clear();
    }

    fn push_error(&mut self, path: String, message: String) {
        if self.scan_errors.len() < MAX_SCAN_ERRORS {
            self.scan_errors.push((path, message));
        }
    }

    /// Process pending scan progress messages.
    ///
    /// Returns `true` if anything changed (new data arrived).
    pub fn process_scan_messages(&mut self) -> bool {
        let mut changed = false;

        for _ in 0..MAX_MESSAGES_PER_PASS {
            let received = match &self.scan_handle {
                Some(handle) => handle.progress_rx.try_recv(),
                None => break,
            };
            let msg = match received {
                Ok(m) => m,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    // The scan thread died before reporting a terminal status.
                    warn!("Scan thread exited without a final status");
                    self.scan_failure = Some("scan thread exited unexpectedly".to_string());
                    self.finish_scan(AppPhase::Failed);
                    return true;
                }
            };
            changed = true;

            match msg {
                ScanProgress::Update {
                    files_processed,
                    candidates_found,
                    skipped,
                    current_path,
                } => {
                    self.scan_files_processed = files_processed;
                    self.scan_candidates_found = candidates_found;
                    self.scan_skipped = skipped;
                    self.scan_current_path = current_path;
                }
                ScanProgress::Skipped { path, message } => {
                    self.push_error(path, message);
                }
                ScanProgress::TraversalError { path, message } => {
                    self.scan_traversal_errors += 1;
                    self.push_error(path, message);
                }
                ScanProgress::Complete {
                    duration,
                    files_processed,
                    skipped,
                    traversal_errors,
                } => {
                    self.scan_files_processed = files_processed;
                    self.scan_skipped = skipped;
                    self.scan_traversal_errors = traversal_errors;
                    self.scan_duration = Some(duration);
                    self.finish_scan(AppPhase::Results);
                    return true;
                }
                ScanProgress::Cancelled {
                    files_processed,
                    skipped,
                } => {
                    self.scan_files_processed = files_processed;
                    self.scan_skipped = skipped;
                    self.scan_was_cancelled = true;
                    self.finish_scan(AppPhase::Results);
                    return true;
                }
                ScanProgress::Failed { message } => {
                    self.scan_failure = Some(message);
                    self.finish_scan(AppPhase::Failed);
                    return true;
                }
            }
        }

        changed
    }

    /// Take ownership of the final result set from the `LiveResults`.
    fn finish_scan(&mut self, phase: AppPhase) {
        self.phase = phase;
        self.scan_handle = None;
        if let Some(lr) = self.live_results.take() {
            // Try to unwrap the Arc; if still shared, clone.
            let set = Arc::try_unwrap(lr)
                .map(RwLock::into_inner)
                .unwrap_or_else(|arc| {
                    let snapshot = arc.read().clone();
                    snapshot
                });
            self.results = Some(set);
        }
    }

    /// Run `f` over the best available records: the live set during a
    /// scan, the finished set afterwards, or nothing.
    pub fn with_records<R>(&self, f: impl FnOnce(&[FeatureRecord]) -> R) -> R {
        if let Some(ref set) = self.results {
            f(set.records())
        } else if let Some(ref lr) = self.live_results {
            f(lr.read().records())
        } else {
            f(&[])
        }
    }

    /// Number of records currently held.
    pub fn record_count(&self) -> usize {
        self.with_records(|r| r.len())
    }

    /// Records whose file name contains `query`, optionally sorted.
    pub fn view(&self, query: &str, sort: Option<(Column, bool)>) -> Vec<FeatureRecord> {
        self.with_records(|records| {
            let mut rows: Vec<FeatureRecord> =
                view::filter_by_name(records, query).cloned().collect();
            if let Some((column, descending)) = sort {
                view::sort_by(&mut rows, column, descending);
            }
            rows
        })
    }
}
