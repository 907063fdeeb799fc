/// Data model for VidSleuth scans.
///
/// Re-exports the per-file pipeline types (candidate → descriptor → record)
/// and the formatting helpers used to render them.
pub mod candidate;
pub mod descriptor;
pub mod record;
pub mod size;

pub use candidate::Candidate;
pub use descriptor::{AudioStream, MediaDescriptor, StreamDescriptor, StreamKind, VideoStream};
pub use record::{FeatureRecord, ResultSet, Tag, TagSet};
