/// Scanner module: orchestrates traversal, probing and classification.
///
/// A scan runs on its own named thread so the caller stays responsive.
/// Records are written into a **shared `LiveResults`**
/// (`Arc<RwLock<ResultSet>>`) as they are classified, so a frontend can show
/// an incrementally-growing table while the scan runs. Every call to
/// [`start_scan`] creates a fresh `LiveResults`; two scans never write into
/// the same set.
pub mod config;
pub mod parallel;
pub mod progress;

pub use config::ScanConfig;
pub use parallel::{process_candidate, FileOutcome};
pub use progress::ScanProgress;

use crate::error::ScanError;
use crate::model::ResultSet;
use crate::probe::Probe;

use crossbeam_channel::Receiver;
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::info;

/// A shared, concurrently-readable result set.
///
/// Probe workers hold the write lock only for a single append.
/// The frontend holds a read lock when it renders.
pub type LiveResults = Arc<RwLock<ResultSet>>;

/// Maximum number of progress messages that may queue up in the channel.
///
/// If the consumer falls behind, workers block on `send` briefly rather
/// than the queue consuming unbounded heap.
pub const PROGRESS_CHANNEL_CAPACITY: usize = 4_096;

/// Handle to a running or completed scan. Allows cancellation and
/// receiving progress updates.
pub struct ScanHandle {
    /// Receiver for progress updates from the scan.
    pub progress_rx: Receiver<ScanProgress>,
    /// Results populated incrementally during scanning.
    pub results: LiveResults,
    /// Flag to request cancellation.
    cancel_flag: Arc<AtomicBool>,
    /// Join handle for the scan thread.
    _thread: Option<thread::JoinHandle<()>>,
}

impl ScanHandle {
    /// Request the scan to stop accepting new work.
    pub fn cancel(&self) {
        self.cancel_flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation has been requested.
    pub fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    /// Block until the scan sends its terminal message and return it.
    ///
    /// Intermediate messages are discarded. Returns `None` only if the scan
    /// thread died without reporting.
    pub fn wait(&self) -> Option<ScanProgress> {
        self.progress_rx.iter().find(ScanProgress::is_terminal)
    }
}

/// Start a new scan of `root_path` on a background thread.
///
/// The probe must already be resolved (see
/// [`FfprobeInvoker::locate`](crate::probe::FfprobeInvoker::locate)), so a
/// missing tool is reported before any scanning begins.
pub fn start_scan(
    root_path: PathBuf,
    config: ScanConfig,
    probe: Arc<dyn Probe>,
) -> Result<ScanHandle, ScanError> {
    let (progress_tx, progress_rx) =
        crossbeam_channel::bounded::<ScanProgress>(PROGRESS_CHANNEL_CAPACITY);
    let cancel_flag = Arc::new(AtomicBool::new(false));
    let cancel_clone = cancel_flag.clone();

    let results: LiveResults = Arc::new(RwLock::new(ResultSet::with_capacity(1_024)));
    let results_clone = results.clone();

    let thread = thread::Builder::new()
        .name("vidsleuth-scanner".into())
        .spawn(move || {
            info!("Starting scan of {}", root_path.display());
            parallel::scan_parallel(
                root_path,
                config,
                probe.as_ref(),
                progress_tx,
                &cancel_clone,
                results_clone,
            );
        })
        .map_err(ScanError::ThreadSpawn)?;

    Ok(ScanHandle {
        progress_rx,
        results,
        cancel_flag,
        _thread: Some(thread),
    })
}
