/// Decoding of ffprobe's JSON output into a [`MediaDescriptor`].
///
/// The probe is inconsistent about numeric fields (`format.size` and
/// `bits_per_raw_sample` are strings, `width` and `bits_per_sample` are
/// numbers), so every numeric field accepts either form. Unknown fields
/// are ignored; missing fields become `None`.
use crate::error::ParseError;
use crate::model::{AudioStream, MediaDescriptor, StreamDescriptor, VideoStream};
use serde::Deserialize;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// JSON structures
// ---------------------------------------------------------------------------

#[derive(Debug, Default, Deserialize)]
struct FfprobeOutput {
    #[serde(default)]
    format: FfprobeFormat,
    #[serde(default)]
    streams: Vec<FfprobeStream>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeFormat {
    format_name: Option<String>,
    size: Option<Numeric>,
    duration: Option<Numeric>,
}

#[derive(Debug, Default, Deserialize)]
struct FfprobeStream {
    codec_type: Option<String>,
    codec_name: Option<String>,
    width: Option<Numeric>,
    height: Option<Numeric>,
    bits_per_raw_sample: Option<Numeric>,
    bits_per_sample: Option<Numeric>,
    color_transfer: Option<String>,
    profile: Option<String>,
    #[serde(default)]
    tags: BTreeMap<String, String>,
}

/// A number the probe may emit either bare or quoted.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Numeric {
    Int(u64),
    Float(f64),
    Text(String),
}

impl Numeric {
    fn as_u64(&self) -> Option<u64> {
        match self {
            Self::Int(n) => Some(*n),
            Self::Float(f) if f.is_finite() && *f >= 0.0 => Some(*f as u64),
            Self::Float(_) => None,
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Int(n) => Some(*n as f64),
            Self::Float(f) => Some(*f),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }

    fn as_u32(&self) -> Option<u32> {
        self.as_u64().and_then(|n| u32::try_from(n).ok())
    }
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Decode probe output text into a descriptor.
///
/// # Errors
///
/// Returns [`ParseError`] when the text is not a JSON object of the expected
/// shape (truncated output, HTML error pages, plain-text diagnostics).
pub fn parse_probe_output(text: &str) -> Result<MediaDescriptor, ParseError> {
    let output: FfprobeOutput = serde_json::from_str(text)?;
    Ok(into_descriptor(output))
}

fn into_descriptor(output: FfprobeOutput) -> MediaDescriptor {
    let streams = output.streams.into_iter().map(into_stream).collect();

    MediaDescriptor {
        container: output.format.format_name.unwrap_or_default(),
        size_bytes: output.format.size.as_ref().and_then(Numeric::as_u64),
        duration_secs: output.format.duration.as_ref().and_then(Numeric::as_f64),
        streams,
    }
}

fn into_stream(stream: FfprobeStream) -> StreamDescriptor {
    match stream.codec_type.as_deref() {
        Some("video") => StreamDescriptor::Video(VideoStream {
            codec: stream.codec_name,
            width: stream.width.as_ref().and_then(Numeric::as_u32),
            height: stream.height.as_ref().and_then(Numeric::as_u32),
            bits_per_raw_sample: stream.bits_per_raw_sample.as_ref().and_then(Numeric::as_u32),
            bits_per_sample: stream.bits_per_sample.as_ref().and_then(Numeric::as_u32),
            color_transfer: stream.color_transfer.unwrap_or_default(),
            profile: stream.profile.unwrap_or_default(),
        }),
        Some("audio") => StreamDescriptor::Audio(AudioStream {
            codec: stream.codec_name,
            title: title_tag(stream.tags),
        }),
        _ => StreamDescriptor::Other {
            codec: stream.codec_name,
        },
    }
}

/// Container muxers disagree on tag key case (`title` vs `TITLE`).
fn title_tag(tags: BTreeMap<String, String>) -> Option<String> {
    tags.into_iter()
        .find(|(k, _)| k.eq_ignore_ascii_case("title"))
        .map(|(_, v)| v)
}
