/// Error types for probing and scanning.
///
/// Only [`ScanError`] is ever surfaced to the caller as a failure. Probe and
/// parse errors are recovered per file by the scanner: the file is logged,
/// counted as skipped, and the scan carries on.
use std::path::PathBuf;
use std::process::ExitStatus;
use std::time::Duration;
use thiserror::Error;

/// A single probe invocation that did not produce usable output.
#[derive(Debug, Error)]
pub enum ProbeError {
    /// The candidate disappeared between enumeration and invocation.
    #[error("{} vanished before it could be probed", .path.display())]
    FileVanished { path: PathBuf },

    #[error("failed to start {tool} for {}: {source}", .path.display())]
    Spawn {
        tool: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{tool} exited with {status} for {}: {stderr}", .path.display())]
    NonZeroExit {
        tool: String,
        path: PathBuf,
        status: ExitStatus,
        stderr: String,
    },

    #[error("{tool} timed out after {timeout:?} on {}", .path.display())]
    Timeout {
        tool: String,
        path: PathBuf,
        timeout: Duration,
    },

    #[error("{tool} produced no output for {}", .path.display())]
    EmptyOutput { tool: String, path: PathBuf },

    #[error("I/O error while probing {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ProbeError {
    /// `true` when the file itself is gone, so no record should be emitted.
    pub fn is_vanished(&self) -> bool {
        matches!(self, Self::FileVanished { .. })
    }
}

/// Probe output that is not valid structured metadata.
#[derive(Debug, Error)]
#[error("malformed probe output: {0}")]
pub struct ParseError(#[from] pub serde_json::Error);

/// Errors that prevent a scan from starting at all.
#[derive(Debug, Error)]
pub enum ScanError {
    /// The external probe binary could not be located.
    #[error("{tool} not found ({reason}); install FFmpeg and make sure {tool} is on PATH")]
    ToolUnavailable { tool: String, reason: String },

    #[error("{} is not a directory", .0.display())]
    RootNotDirectory(PathBuf),

    /// A scan is already in flight for this result set.
    #[error("a scan is already running")]
    AlreadyScanning,

    #[error("failed to spawn scanner thread: {0}")]
    ThreadSpawn(#[source] std::io::Error),
}
