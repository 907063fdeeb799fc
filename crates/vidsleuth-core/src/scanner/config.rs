/// Scan configuration: the user-facing tunables of one scan.
///
/// Internal tunables (channel capacity, poll interval) are module constants.
use compact_str::CompactString;
use std::path::PathBuf;
use std::time::Duration;

/// Container extensions recognised by default.
pub const DEFAULT_EXTENSIONS: [&str; 5] = ["mp4", "mkv", "avi", "mov", "webm"];

/// Default wall-clock limit for one probe invocation.
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(60);

/// Default traversal depth limit. Symlinks are never followed, so this only
/// guards against pathologically deep trees.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Probe workers per logical core. Probing is dominated by process spawn
/// and I/O wait, not CPU.
const WORKERS_PER_CORE: usize = 2;

#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Lowercase extensions without the leading dot.
    pub extensions: Vec<CompactString>,
    /// Size of the probe worker pool.
    pub workers: usize,
    pub probe_timeout: Duration,
    pub max_depth: usize,
    /// Explicit probe binary (name or path). `None` searches `PATH`.
    pub probe_program: Option<PathBuf>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            extensions: DEFAULT_EXTENSIONS
                .iter()
                .map(|e| CompactString::new(e))
                .collect(),
            workers: default_workers(),
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            max_depth: DEFAULT_MAX_DEPTH,
            probe_program: None,
        }
    }
}

impl ScanConfig {
    /// Replace the recognised extensions. Leading dots and case are
    /// normalised away; an empty list keeps the defaults.
    pub fn with_extensions<I, S>(mut self, extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let exts: Vec<CompactString> = extensions
            .into_iter()
            .map(|e| CompactString::new(e.as_ref().trim_start_matches('.').to_ascii_lowercase()))
            .filter(|e| !e.is_empty())
            .collect();
        if !exts.is_empty() {
            self.extensions = exts;
        }
        self
    }

    /// Set the probe pool size (minimum 1).
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Set the traversal depth limit (minimum 1, the root's own entries).
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = depth.max(1);
        self
    }

    pub fn with_probe_program(mut self, program: impl Into<PathBuf>) -> Self {
        self.probe_program = Some(program.into());
        self
    }
}

fn default_workers() -> usize {
    (num_cpus::get() * WORKERS_PER_CORE).max(1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_cover_recognised_containers() {
        let cfg = ScanConfig::default();
        assert_eq!(cfg.extensions, ["mp4", "mkv", "avi", "mov", "webm"]);
        assert!(cfg.workers >= 1);
        assert_eq!(cfg.probe_timeout, DEFAULT_PROBE_TIMEOUT);
    }

    #[test]
    fn extensions_are_normalised() {
        let cfg = ScanConfig::default().with_extensions([".MKV", "ts", ""]);
        assert_eq!(cfg.extensions, ["mkv", "ts"]);
        let cfg = ScanConfig::default().with_extensions(Vec::<String>::new());
        assert_eq!(cfg.extensions.len(), 5);
    }

    #[test]
    fn bounds_are_clamped() {
        let cfg = ScanConfig::default().with_workers(0).with_max_depth(0);
        assert_eq!(cfg.workers, 1);
        assert_eq!(cfg.max_depth, 1);
    }
}
