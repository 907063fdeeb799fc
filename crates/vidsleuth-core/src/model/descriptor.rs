/// Parsed probe result for a single file.
///
/// A `MediaDescriptor` is immutable once built by the parser and is owned
/// solely by the classification step that consumes it.

/// Broad kind of an elementary stream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StreamKind {
    Video,
    Audio,
    Other,
}

/// Video-specific stream properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VideoStream {
    pub codec: Option<String>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    /// Bit depth of the raw samples, when the probe reports it.
    pub bits_per_raw_sample: Option<u32>,
    /// Per-sample bit depth; a fallback for `bits_per_raw_sample`.
    pub bits_per_sample: Option<u32>,
    /// Colour transfer characteristic (empty if unknown).
    pub color_transfer: String,
    /// Codec profile string (empty if unknown).
    pub profile: String,
}

/// Audio-specific stream properties.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AudioStream {
    pub codec: Option<String>,
    /// Free-form `title` tag, often used to label Atmos tracks.
    pub title: Option<String>,
}

/// One elementary stream inside a container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamDescriptor {
    Video(VideoStream),
    Audio(AudioStream),
    Other { codec: Option<String> },
}

impl StreamDescriptor {
    pub fn kind(&self) -> StreamKind {
        match self {
            Self::Video(_) => StreamKind::Video,
            Self::Audio(_) => StreamKind::Audio,
            Self::Other { .. } => StreamKind::Other,
        }
    }

    /// Codec identifier as reported by the probe.
    pub fn codec(&self) -> Option<&str> {
        match self {
            Self::Video(v) => v.codec.as_deref(),
            Self::Audio(a) => a.codec.as_deref(),
            Self::Other { codec } => codec.as_deref(),
        }
    }
}

/// Container-level metadata plus every stream, in probe order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MediaDescriptor {
    /// Container label (e.g. `"matroska,webm"`).
    pub container: String,
    /// Overall file size in bytes, if reported.
    pub size_bytes: Option<u64>,
    /// Container duration in seconds, if reported.
    pub duration_secs: Option<f64>,
    pub streams: Vec<StreamDescriptor>,
}

impl MediaDescriptor {
    /// The first video stream. Later video streams (alternate angles,
    /// cover art) never influence classification.
    pub fn first_video(&self) -> Option<&VideoStream> {
        self.streams.iter().find_map(|s| match s {
            StreamDescriptor::Video(v) => Some(v),
            _ => None,
        })
    }

    /// Every audio stream, in probe order.
    pub fn audio_streams(&self) -> impl Iterator<Item = &AudioStream> {
        self.streams.iter().filter_map(|s| match s {
            StreamDescriptor::Audio(a) => Some(a),
            _ => None,
        })
    }

    pub fn count_of(&self, kind: StreamKind) -> usize {
        self.streams.iter().filter(|s| s.kind() == kind).count()
    }
}
