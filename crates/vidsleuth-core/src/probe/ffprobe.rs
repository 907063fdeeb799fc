/// FFprobe-backed [`Probe`] implementation.
///
/// Shells out to `ffprobe -v error -print_format json -show_format -show_streams`
/// once per file. Standard output and standard error are drained on helper
/// threads while the child runs so a large JSON document can never fill the
/// pipe and stall the process; the main thread only polls for exit and
/// enforces the wall-clock timeout. On Unix the child leads its own process
/// group and a timeout kills the whole group.
use crate::error::{ProbeError, ScanError};
use crate::probe::Probe;
use crate::scanner::ScanConfig;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Name of the probe binary looked up on `PATH`.
pub const FFPROBE: &str = "ffprobe";

/// How often a running probe is polled for exit.
const POLL_INTERVAL: Duration = Duration::from_millis(5);

/// Longest stderr excerpt kept in an error message.
const MAX_STDERR_CHARS: usize = 512;

/// Arguments requesting quiet, JSON-formatted container and stream info.
const PROBE_ARGS: [&str; 6] = [
    "-v",
    "error",
    "-print_format",
    "json",
    "-show_format",
    "-show_streams",
];

/// A prober backed by the `ffprobe` CLI.
#[derive(Debug, Clone)]
pub struct FfprobeInvoker {
    /// Resolved path to the ffprobe binary.
    program: PathBuf,
    /// Maximum wall-clock time for one invocation.
    timeout: Duration,
}

impl FfprobeInvoker {
    /// Create an invoker for an already-resolved binary.
    pub fn new(program: PathBuf, timeout: Duration) -> Self {
        Self { program, timeout }
    }

    /// Locate the probe binary up front.
    ///
    /// `program` may be a bare name (searched on `PATH`) or a path. When it
    /// is `None`, `ffprobe` is searched on `PATH`. A missing tool is a fatal
    /// configuration error and must be reported before any scan starts.
    pub fn locate(program: Option<&Path>, timeout: Duration) -> Result<Self, ScanError> {
        let wanted = program.unwrap_or_else(|| Path::new(FFPROBE));
        let resolved = which::which(wanted).map_err(|e| ScanError::ToolUnavailable {
            tool: wanted.display().to_string(),
            reason: e.to_string(),
        })?;
        debug!("Using probe binary {}", resolved.display());
        Ok(Self::new(resolved, timeout))
    }

    /// [`locate`](Self::locate) using the probe settings of a scan config.
    pub fn from_config(config: &ScanConfig) -> Result<Self, ScanError> {
        Self::locate(config.probe_program.as_deref(), config.probe_timeout)
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn tool_name(&self) -> String {
        self.program
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.program.to_string_lossy().to_string())
    }

    /// Wait for `child` to exit, killing it once the deadline passes.
    ///
    /// Returns `Ok(None)` on timeout.
    fn wait_with_deadline(
        &self,
        child: &mut Child,
    ) -> std::io::Result<Option<std::process::ExitStatus>> {
        let deadline = Instant::now() + self.timeout;
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(Some(status));
            }
            if Instant::now() >= deadline {
                kill_process_group(child);
                let _ = child.kill();
                let _ = child.wait();
                return Ok(None);
            }
            thread::sleep(POLL_INTERVAL);
        }
    }
}

impl Probe for FfprobeInvoker {
    fn name(&self) -> &str {
        FFPROBE
    }

    fn probe(&self, path: &Path) -> Result<String, ProbeError> {
        if !path.is_file() {
            return Err(ProbeError::FileVanished {
                path: path.to_path_buf(),
            });
        }

        let tool = self.tool_name();
        let mut command = Command::new(&self.program);
        command
            .args(PROBE_ARGS)
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        // Own process group, so a timeout also reaches anything a wrapper
        // script forked.
        #[cfg(unix)]
        {
            use std::os::unix::process::CommandExt;
            command.process_group(0);
        }
        let mut child = command
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                tool: tool.clone(),
                path: path.to_path_buf(),
                source,
            })?;

        let stdout = drain(child.stdout.take());
        let stderr = drain(child.stderr.take());

        let status = match self.wait_with_deadline(&mut child) {
            Ok(Some(status)) => status,
            // The readers are detached, not joined: a surviving descendant
            // may still hold the pipes open.
            Ok(None) => {
                return Err(ProbeError::Timeout {
                    tool,
                    path: path.to_path_buf(),
                    timeout: self.timeout,
                })
            }
            Err(source) => {
                return Err(ProbeError::Io {
                    path: path.to_path_buf(),
                    source,
                })
            }
        };
        // The child has exited; collect what it wrote.
        let stdout = stdout.join().unwrap_or_default();
        let stderr = stderr.join().unwrap_or_default();

        if !status.success() {
            if !path.exists() {
                return Err(ProbeError::FileVanished {
                    path: path.to_path_buf(),
                });
            }
            let stderr = String::from_utf8_lossy(&stderr);
            return Err(ProbeError::NonZeroExit {
                tool,
                path: path.to_path_buf(),
                status,
                stderr: stderr.trim().chars().take(MAX_STDERR_CHARS).collect(),
            });
        }

        let text = String::from_utf8_lossy(&stdout).into_owned();
        if text.trim().is_empty() {
            return Err(ProbeError::EmptyOutput {
                tool,
                path: path.to_path_buf(),
            });
        }
        Ok(text)
    }
}

/// Kill every process in the child's group.
#[cfg(unix)]
fn kill_process_group(child: &Child) {
    if let Ok(pgid) = libc::pid_t::try_from(child.id()) {
        // SAFETY: plain syscall; a negative pid addresses the group the
        // child leads.
        let rc = unsafe { libc::kill(-pgid, libc::SIGKILL) };
        if rc != 0 {
            debug!("Could not signal process group {pgid}");
        }
    }
}

#[cfg(not(unix))]
fn kill_process_group(_child: &Child) {}

/// Read a child pipe to EOF on a helper thread.
fn drain<R: Read + Send + 'static>(pipe: Option<R>) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        if let Some(mut pipe) = pipe {
            let _ = pipe.read_to_end(&mut buf);
        }
        buf
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locate_reports_missing_tool() {
        let err = FfprobeInvoker::locate(
            Some(Path::new("vidsleuth-definitely-not-a-real-probe")),
            Duration::from_secs(1),
        )
        .unwrap_err();
        assert!(matches!(err, ScanError::ToolUnavailable { .. }));
        assert!(err.to_string().contains("vidsleuth-definitely-not-a-real-probe"));
    }

    #[test]
    fn missing_file_is_reported_as_vanished() {
        let invoker = FfprobeInvoker::new(PathBuf::from(FFPROBE), Duration::from_secs(1));
        let err = invoker
            .probe(Path::new("/nonexistent/vidsleuth/clip.mkv"))
            .unwrap_err();
        assert!(err.is_vanished());
    }
}
