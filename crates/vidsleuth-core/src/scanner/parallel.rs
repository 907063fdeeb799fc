/// Parallel scan pipeline: `jwalk` traversal feeding a bounded probe pool.
///
/// The scanner thread walks the tree and, for every recognised candidate,
/// spawns one job onto a dedicated rayon pool of `config.workers` threads.
/// Each job runs probe → parse → classify and appends its record to the
/// shared `LiveResults` under a single short write lock. The pool size caps
/// the number of concurrent probe processes.
///
/// # Cancellation
///
/// The walk stops at the next entry once the flag is set. Jobs that have
/// not started yet return immediately; probes that are already running are
/// allowed to finish (bounded by the probe timeout).
///
/// # Symlinks
///
/// Links are never followed, so directory cycles cannot form. Depth is
/// additionally bounded by `config.max_depth`.
use crate::classifier::{classify, classify_without_metadata};
use crate::model::{Candidate, FeatureRecord};
use crate::probe::{parse_probe_output, Probe};
use crate::scanner::config::ScanConfig;
use crate::scanner::progress::ScanProgress;
use crate::scanner::LiveResults;
use chrono::{DateTime, Local};
use crossbeam_channel::Sender;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Instant;
use tracing::{debug, info, warn};

/// What happened to one candidate.
#[derive(Debug)]
pub enum FileOutcome {
    /// Probed, parsed and classified.
    Classified(FeatureRecord),
    /// Probe failed or its output was unparsable. The record has every
    /// attribute defaulted; `reason` explains why.
    NoMetadata {
        record: FeatureRecord,
        reason: String,
    },
    /// The file disappeared before it could be probed. No record.
    Vanished { reason: String },
}

/// Run the full per-file pipeline for one candidate.
///
/// Never fails: every error is folded into the returned outcome.
pub fn process_candidate(probe: &dyn Probe, candidate: &Candidate) -> FileOutcome {
    let text = match probe.probe(&candidate.path) {
        Ok(text) => text,
        Err(err) if err.is_vanished() => {
            return FileOutcome::Vanished {
                reason: err.to_string(),
            }
        }
        Err(err) => {
            return FileOutcome::NoMetadata {
                record: classify_without_metadata(candidate),
                reason: err.to_string(),
            }
        }
    };

    match parse_probe_output(&text) {
        Ok(descriptor) => {
            debug!(
                "{}: container={} streams={}",
                candidate.path.display(),
                descriptor.container,
                descriptor.streams.len()
            );
            FileOutcome::Classified(classify(candidate, &descriptor))
        }
        Err(err) => FileOutcome::NoMetadata {
            record: classify_without_metadata(candidate),
            reason: err.to_string(),
        },
    }
}

/// State shared by the walker and every probe job for one scan.
struct Pipeline<'a> {
    probe: &'a dyn Probe,
    results: &'a LiveResults,
    progress_tx: &'a Sender<ScanProgress>,
    cancel_flag: &'a AtomicBool,
    candidates_found: AtomicU64,
    files_processed: AtomicU64,
    skipped: AtomicU64,
}

impl Pipeline<'_> {
    fn is_cancelled(&self) -> bool {
        self.cancel_flag.load(Ordering::Relaxed)
    }

    fn run(&self, candidate: Candidate) {
        if self.is_cancelled() {
            return;
        }

        let outcome = process_candidate(self.probe, &candidate);
        let path = candidate.path.to_string_lossy().into_owned();

        let skip_reason = {
            let mut results = self.results.write();
            match outcome {
                FileOutcome::Classified(record) => {
                    results.push(record);
                    None
                }
                FileOutcome::NoMetadata { record, reason } => {
                    results.push(record);
                    results.record_skip();
                    Some(reason)
                }
                FileOutcome::Vanished { reason } => {
                    results.record_skip();
                    Some(reason)
                }
            }
        };

        if let Some(message) = skip_reason {
            warn!("Skipping metadata for {path}: {message}");
            self.skipped.fetch_add(1, Ordering::Relaxed);
            let _ = self.progress_tx.send(ScanProgress::Skipped {
                path: path.clone(),
                message,
            });
        }

        let files_processed = self.files_processed.fetch_add(1, Ordering::Relaxed) + 1;
        let _ = self.progress_tx.send(ScanProgress::Update {
            files_processed,
            candidates_found: self.candidates_found.load(Ordering::Relaxed),
            skipped: self.skipped.load(Ordering::Relaxed),
            current_path: path,
        });
    }
}

/// Scan `root_path`, writing records into `results` as they are classified.
///
/// Always finishes by sending exactly one terminal message.
pub fn scan_parallel(
    root_path: PathBuf,
    config: ScanConfig,
    probe: &dyn Probe,
    progress_tx: Sender<ScanProgress>,
    cancel_flag: &AtomicBool,
    results: LiveResults,
) {
    let start = Instant::now();

    if !root_path.is_dir() {
        let message = format!("{} is not a readable directory", root_path.display());
        warn!("{message}");
        let _ = progress_tx.send(ScanProgress::Failed { message });
        return;
    }

    let pool = match rayon::ThreadPoolBuilder::new()
        .num_threads(config.workers)
        .thread_name(|i| format!("vidsleuth-probe-{i}"))
        .build()
    {
        Ok(pool) => pool,
        Err(err) => {
            let _ = progress_tx.send(ScanProgress::Failed {
                message: format!("failed to start probe workers: {err}"),
            });
            return;
        }
    };

    info!(
        "Scanning {} with {} probe workers ({})",
        root_path.display(),
        config.workers,
        probe.name()
    );

    let pipeline = Pipeline {
        probe,
        results: &results,
        progress_tx: &progress_tx,
        cancel_flag,
        candidates_found: AtomicU64::new(0),
        files_processed: AtomicU64::new(0),
        skipped: AtomicU64::new(0),
    };
    let mut traversal_errors: u64 = 0;
    let mut cancelled = false;

    let walker = jwalk::WalkDir::new(&root_path)
        .skip_hidden(false)
        .follow_links(false)
        .max_depth(config.max_depth)
        .sort(true)
        .parallelism(jwalk::Parallelism::RayonNewPool(num_cpus::get()));

    // Returns once every spawned probe job has finished.
    pool.in_place_scope(|scope| {
        let pipeline = &pipeline;
        for entry_result in walker {
            if pipeline.is_cancelled() {
                cancelled = true;
                break;
            }

            let entry = match entry_result {
                Ok(e) => e,
                Err(err) => {
                    // jwalk errors are typically access-denied on directories.
                    traversal_errors += 1;
                    let path = err
                        .path()
                        .map(|p| p.to_string_lossy().to_string())
                        .unwrap_or_default();
                    warn!("Cannot read {path}: {err}");
                    let _ = progress_tx.send(ScanProgress::TraversalError {
                        path,
                        message: err.to_string(),
                    });
                    continue;
                }
            };

            if !entry.file_type().is_file() {
                continue;
            }

            let candidate = Candidate::new(entry.path());
            if !candidate.is_recognised(&config.extensions) {
                continue;
            }
            let modified = entry
                .metadata()
                .ok()
                .and_then(|m| m.modified().ok())
                .map(DateTime::<Local>::from);
            let candidate = candidate.with_modified(modified);

            pipeline.candidates_found.fetch_add(1, Ordering::Relaxed);
            scope.spawn(move |_| pipeline.run(candidate));
        }
    });

    // Sort once every writer is done so exports are reproducible.
    results.write().sort_by_path();

    let files_processed = pipeline.files_processed.load(Ordering::Relaxed);
    let skipped = pipeline.skipped.load(Ordering::Relaxed);

    if cancelled || pipeline.is_cancelled() {
        info!("Scan cancelled after {files_processed} files");
        let _ = progress_tx.send(ScanProgress::Cancelled {
            files_processed,
            skipped,
        });
        return;
    }

    let duration = start.elapsed();
    info!(
        "Scan complete: {files_processed} files ({skipped} skipped, {traversal_errors} unreadable directories) in {duration:?}"
    );
    let _ = progress_tx.send(ScanProgress::Complete {
        duration,
        files_processed,
        skipped,
        traversal_errors,
    });
}
