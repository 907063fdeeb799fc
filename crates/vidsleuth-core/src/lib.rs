/// VidSleuth Core: scanning, probing, and feature classification.
///
/// This crate contains all business logic with zero UI dependencies.
/// It is designed to be reusable across different frontends (CLI, GUI, TUI).
///
/// # Modules
///
/// - [`model`]: Candidates, probe descriptors, and classified feature records.
/// - [`probe`]: External metadata probe invocation and output parsing.
/// - [`classifier`]: Pure mapping from probe metadata to taxonomy tags.
/// - [`scanner`]: Background directory traversal with bounded-concurrency probing.
/// - [`error`]: Error types shared across the crate.
pub mod classifier;
pub mod error;
pub mod model;
pub mod probe;
pub mod scanner;

pub use error::{ParseError, ProbeError, ScanError};
