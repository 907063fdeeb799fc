/// Probe module: runs the external metadata tool and decodes its output.
///
/// - [`ffprobe`]: the process-backed [`Probe`] implementation.
/// - [`parse`]: JSON decoding into a [`MediaDescriptor`](crate::model::MediaDescriptor).
///
/// The scanner only depends on the [`Probe`] trait, so frontends and tests
/// can substitute any source of probe output.
pub mod ffprobe;
pub mod parse;

use crate::error::ProbeError;
use std::path::Path;

pub use ffprobe::FfprobeInvoker;
pub use parse::parse_probe_output;

/// Something that can inspect a media file and return the raw structured
/// (JSON) text describing its container and streams.
///
/// Implementations must be callable from many worker threads at once.
pub trait Probe: Send + Sync {
    /// Short tool name used in log messages.
    fn name(&self) -> &str;

    /// Inspect `path` once. No retries: any failure is reported and the
    /// caller decides how to recover.
    fn probe(&self, path: &Path) -> Result<String, ProbeError>;
}
