//! End-to-end scanner integration tests.
//!
//! These tests exercise the real traversal, worker pool, shared result set
//! and progress channel against a real temporary directory. Only the
//! external probe is replaced: `FileProbe` returns the *contents* of each
//! file as its probe output, so every fixture file carries its own JSON.

use std::fs;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use vidsleuth_core::model::Tag;
use vidsleuth_core::probe::Probe;
use vidsleuth_core::scanner::{start_scan, ScanConfig, ScanHandle, ScanProgress};
use vidsleuth_core::ProbeError;

// ── Helpers ──────────────────────────────────────────────────────────────────

const UHD_JSON: &str = r#"{
    "format": {"format_name": "matroska,webm", "size": "2097152000", "duration": "5400.0"},
    "streams": [
        {"codec_type": "video", "codec_name": "hevc", "width": 3840, "height": 2160,
         "bits_per_raw_sample": "10", "color_transfer": "smpte2084", "profile": "dvhe.05"},
        {"codec_type": "audio", "codec_name": "truehd"}
    ]
}"#;

const HD_JSON: &str = r#"{
    "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "size": "1048576"},
    "streams": [
        {"codec_type": "video", "codec_name": "h264", "width": 1920, "height": 1080,
         "bits_per_raw_sample": "8", "color_transfer": "bt709", "profile": "High"},
        {"codec_type": "audio", "codec_name": "aac", "tags": {"language": "eng"}}
    ]
}"#;

/// Marker content that makes `FileProbe` fail as if the tool exited non-zero.
const BROKEN: &str = "BROKEN";

/// Probe stand-in: the file's contents are the probe output.
struct FileProbe;

impl Probe for FileProbe {
    fn name(&self) -> &str {
        "file-probe"
    }

    fn probe(&self, path: &Path) -> Result<String, ProbeError> {
        let text = fs::read_to_string(path).map_err(|_| ProbeError::FileVanished {
            path: path.to_path_buf(),
        })?;
        if text == BROKEN {
            return Err(ProbeError::EmptyOutput {
                tool: "file-probe".into(),
                path: path.to_path_buf(),
            });
        }
        Ok(text)
    }
}

/// Deletes each file just before probing it.
struct VanishingProbe;

impl Probe for VanishingProbe {
    fn name(&self) -> &str {
        "vanishing-probe"
    }

    fn probe(&self, path: &Path) -> Result<String, ProbeError> {
        let _ = fs::remove_file(path);
        FileProbe.probe(path)
    }
}

fn write(path: &Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

/// ```text
/// root/
///   movie.mkv          (UHD fixture)
///   notes.txt          (ignored: not a video extension)
///   series/
///     Episode.MP4      (HD fixture, uppercase extension)
///     deeper/
///       extra.webm     (HD fixture)
/// ```
fn build_library(root: &Path) {
    write(&root.join("movie.mkv"), UHD_JSON);
    write(&root.join("notes.txt"), UHD_JSON);
    write(&root.join("series/Episode.MP4"), HD_JSON);
    write(&root.join("series/deeper/extra.webm"), HD_JSON);
}

fn scan(root: &Path, config: ScanConfig, probe: Arc<dyn Probe>) -> (ScanHandle, ScanProgress) {
    let handle = start_scan(root.to_path_buf(), config, probe).expect("scan must start");
    let terminal = wait_for_terminal(&handle);
    (handle, terminal)
}

/// Drain progress until the terminal message, with a generous deadline so a
/// genuinely stuck scan fails the test instead of hanging the suite.
fn wait_for_terminal(handle: &ScanHandle) -> ScanProgress {
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(
            std::time::Instant::now() < deadline,
            "scanner did not finish within 30 seconds"
        );
        match handle.progress_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(msg) if msg.is_terminal() => return msg,
            Ok(_) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Timeout) => continue,
            Err(crossbeam_channel::RecvTimeoutError::Disconnected) => {
                panic!("scanner channel disconnected before a terminal message")
            }
        }
    }
}

fn config() -> ScanConfig {
    ScanConfig::default().with_workers(4)
}

// ── Tests ─────────────────────────────────────────────────────────────────────

/// Every recognised file is classified, other files are ignored, and the
/// result set is ordered by path.
#[test]
fn scan_classifies_every_candidate() {
    let tmp = TempDir::new().unwrap();
    build_library(tmp.path());

    let (handle, terminal) = scan(tmp.path(), config(), Arc::new(FileProbe));
    match terminal {
        ScanProgress::Complete {
            files_processed,
            skipped,
            ..
        } => {
            assert_eq!(files_processed, 3);
            assert_eq!(skipped, 0);
        }
        other => panic!("expected Complete, got {other:?}"),
    }

    let results = handle.results.read();
    let names: Vec<&str> = results.records().iter().map(|r| r.file.as_str()).collect();
    assert_eq!(names, ["movie.mkv", "Episode.MP4", "extra.webm"]);

    let movie = &results.records()[0];
    assert_eq!(movie.size, "2000.0 MB");
    assert_eq!(movie.resolution, "3840x2160");
    assert_eq!(movie.bit_depth, "10-bit");
    assert_eq!(movie.duration, "90m 0s");
    for tag in [
        Tag::Mkv,
        Tag::Hevc,
        Tag::FourK,
        Tag::Hdr,
        Tag::DolbyVision,
        Tag::DolbyAtmos,
        Tag::TrueHd,
    ] {
        assert!(movie.tag(tag), "movie.mkv should have {tag:?}");
    }
    assert_eq!(movie.tags.present().count(), 7);
    assert_ne!(movie.modified, "N/A", "mtime is read during traversal");

    let episode = &results.records()[1];
    assert!(episode.tag(Tag::Mp4));
    assert!(episode.tag(Tag::H264));
    assert!(episode.tag(Tag::Aac));
    assert!(!episode.tag(Tag::Hdr));
    assert_eq!(episode.size, "1.0 MB");
}

/// A failed probe still produces a row with every attribute defaulted; the
/// skip is counted and the scan still completes.
#[test]
fn failed_probe_yields_default_record() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("broken.mp4"), BROKEN);
    write(&tmp.path().join("good.mkv"), UHD_JSON);

    let (handle, terminal) = scan(tmp.path(), config(), Arc::new(FileProbe));
    assert!(
        matches!(terminal, ScanProgress::Complete { skipped: 1, .. }),
        "expected Complete with one skip, got {terminal:?}"
    );

    let results = handle.results.read();
    assert_eq!(results.len(), 2);
    assert_eq!(results.skipped(), 1);

    let broken = &results.records()[0];
    assert_eq!(broken.file, "broken.mp4");
    assert!(broken.tags.none_present());
    assert_eq!(broken.size, "N/A");
    assert_eq!(broken.resolution, "N/A");
    assert_eq!(broken.bit_depth, "N/A");
}

/// Unparsable probe output is treated as "no metadata", not as a failure.
#[test]
fn unparsable_output_yields_default_record() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("garbage.avi"), "{\"streams\": [");

    let (handle, terminal) = scan(tmp.path(), config(), Arc::new(FileProbe));
    assert!(matches!(terminal, ScanProgress::Complete { .. }));

    let results = handle.results.read();
    assert_eq!(results.len(), 1);
    assert_eq!(results.skipped(), 1);
    assert!(results.records()[0].tags.none_present());
}

/// Files that disappear between enumeration and probing are skipped
/// without a record.
#[test]
fn vanished_files_are_skipped() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("a.mkv"), UHD_JSON);
    write(&tmp.path().join("b.mkv"), UHD_JSON);

    let (handle, terminal) = scan(tmp.path(), config(), Arc::new(VanishingProbe));
    assert!(matches!(terminal, ScanProgress::Complete { skipped: 2, .. }));
    let results = handle.results.read();
    assert!(results.is_empty());
    assert_eq!(results.skipped(), 2);
}

/// An unreadable subdirectory is skipped; the rest of the tree is scanned.
#[cfg(unix)]
#[test]
fn unreadable_subdirectory_does_not_abort() {
    use std::os::unix::fs::PermissionsExt;

    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("one.mkv"), UHD_JSON);
    write(&tmp.path().join("open/two.mp4"), HD_JSON);
    let locked = tmp.path().join("locked");
    write(&locked.join("hidden.mkv"), UHD_JSON);
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

    // Privileged users can still list the directory.
    let locked_is_readable = fs::read_dir(&locked).is_ok();

    let (handle, terminal) = scan(tmp.path(), config(), Arc::new(FileProbe));
    fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

    let traversal_errors = match terminal {
        ScanProgress::Complete {
            traversal_errors, ..
        } => traversal_errors,
        other => panic!("expected Complete, got {other:?}"),
    };
    if locked_is_readable {
        assert_eq!(handle.results.read().len(), 3);
        assert_eq!(traversal_errors, 0);
    } else {
        assert_eq!(handle.results.read().len(), 2);
        assert_eq!(traversal_errors, 1, "the locked directory is reported once");
    }
}

/// An empty directory completes with an empty result set.
#[test]
fn scan_empty_directory() {
    let tmp = TempDir::new().unwrap();
    let (handle, terminal) = scan(tmp.path(), config(), Arc::new(FileProbe));
    assert!(matches!(
        terminal,
        ScanProgress::Complete {
            files_processed: 0,
            ..
        }
    ));
    assert!(handle.results.read().is_empty());
}

/// A root that is not a directory fails the scan with a terminal message.
#[test]
fn scan_of_missing_root_fails() {
    let tmp = TempDir::new().unwrap();
    let (_, terminal) = scan(&tmp.path().join("nope"), config(), Arc::new(FileProbe));
    assert!(matches!(terminal, ScanProgress::Failed { .. }));
}

/// Cancellation must stop the scan and send a terminal message. The scan
/// may finish before the flag is read, so either terminal is accepted.
#[test]
fn scan_cancellation_sends_terminal_message() {
    let tmp = TempDir::new().unwrap();
    for i in 0..200 {
        write(&tmp.path().join(format!("clip{i:03}.mkv")), HD_JSON);
    }

    let handle = start_scan(tmp.path().to_path_buf(), config(), Arc::new(FileProbe)).unwrap();
    handle.cancel();
    assert!(handle.is_cancelled());

    match wait_for_terminal(&handle) {
        ScanProgress::Cancelled {
            files_processed, ..
        } => assert!(files_processed <= 200),
        ScanProgress::Complete { .. } => {}
        other => panic!("unexpected terminal {other:?}"),
    }
}

/// Every processed file produces an `Update` with a running count.
#[test]
fn scan_sends_progress_updates() {
    let tmp = TempDir::new().unwrap();
    for i in 0..20 {
        write(&tmp.path().join(format!("ep{i:02}.mp4")), HD_JSON);
    }

    let handle = start_scan(tmp.path().to_path_buf(), config(), Arc::new(FileProbe)).unwrap();
    let mut max_processed = 0;
    let deadline = std::time::Instant::now() + Duration::from_secs(30);
    loop {
        assert!(std::time::Instant::now() < deadline, "scan timed out");
        match handle.progress_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(ScanProgress::Update {
                files_processed,
                current_path,
                ..
            }) => {
                assert!(current_path.ends_with(".mp4"));
                max_processed = max_processed.max(files_processed);
            }
            Ok(msg) if msg.is_terminal() => break,
            _ => continue,
        }
    }
    assert_eq!(max_processed, 20);
}

/// Only the configured extensions are candidates.
#[test]
fn custom_extensions_filter_candidates() {
    let tmp = TempDir::new().unwrap();
    build_library(tmp.path());
    write(&tmp.path().join("capture.ts"), HD_JSON);

    let cfg = config().with_extensions(["ts"]);
    let (handle, _) = scan(tmp.path(), cfg, Arc::new(FileProbe));
    let results = handle.results.read();
    assert_eq!(results.len(), 1);
    assert_eq!(results.records()[0].file, "capture.ts");
}

/// Traversal depth is bounded by the configuration.
#[test]
fn max_depth_bounds_traversal() {
    let tmp = TempDir::new().unwrap();
    build_library(tmp.path());

    let (handle, _) = scan(tmp.path(), config().with_max_depth(2), Arc::new(FileProbe));
    let names: Vec<String> = handle
        .results
        .read()
        .records()
        .iter()
        .map(|r| r.file.to_string())
        .collect();
    assert_eq!(names, ["movie.mkv", "Episode.MP4"]);
}

/// Two scans never share a result set.
#[test]
fn concurrent_scans_use_independent_result_sets() {
    let a = TempDir::new().unwrap();
    let b = TempDir::new().unwrap();
    write(&a.path().join("a.mkv"), UHD_JSON);
    write(&b.path().join("b1.mkv"), UHD_JSON);
    write(&b.path().join("b2.mkv"), UHD_JSON);

    let ha = start_scan(a.path().to_path_buf(), config(), Arc::new(FileProbe)).unwrap();
    let hb = start_scan(b.path().to_path_buf(), config(), Arc::new(FileProbe)).unwrap();
    wait_for_terminal(&ha);
    wait_for_terminal(&hb);

    assert!(!Arc::ptr_eq(&ha.results, &hb.results));
    assert_eq!(ha.results.read().len(), 1);
    assert_eq!(hb.results.read().len(), 2);
}

/// `wait` returns the terminal message.
#[test]
fn wait_returns_terminal_message() {
    let tmp = TempDir::new().unwrap();
    write(&tmp.path().join("x.mov"), HD_JSON);
    let handle = start_scan(tmp.path().to_path_buf(), config(), Arc::new(FileProbe)).unwrap();
    assert!(matches!(handle.wait(), Some(ScanProgress::Complete { .. })));
    assert_eq!(handle.results.read().len(), 1);
}
