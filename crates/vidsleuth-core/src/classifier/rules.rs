/// Individual detection rules.
///
/// Each rule is a small pure function so it can be tested on its own. The
/// string matches are deliberately narrow: they target ffprobe's vocabulary
/// and nothing broader.
use crate::model::{AudioStream, Candidate, Tag, VideoStream};

/// Minimum first-video-stream width for the 4K tag.
pub const FOUR_K_MIN_WIDTH: u32 = 3840;

/// SMPTE ST 2084 (PQ) transfer characteristic identifier.
pub const PQ_TRANSFER: &str = "smpte2084";

/// Dolby Vision HEVC profile marker.
pub const DOLBY_VISION_PROFILE: &str = "dvhe";

/// Title-tag marker for Atmos audio tracks.
pub const ATMOS_TITLE: &str = "atmos";

/// Codecs treated as Atmos carriers. A heuristic proxy only: TrueHD and
/// E-AC3 can carry Atmos metadata but do not always.
pub const ATMOS_CARRIER_CODECS: [&str; 2] = ["truehd", "eac3"];

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_ascii_lowercase().contains(needle)
}

fn codec_is(codec: Option<&str>, expected: &str) -> bool {
    codec.is_some_and(|c| c.eq_ignore_ascii_case(expected))
}

/// Container tag: the candidate's extension names the container.
pub fn container_matches(candidate: &Candidate, tag: Tag) -> bool {
    tag.container_extension()
        .is_some_and(|ext| candidate.extension.eq_ignore_ascii_case(ext))
}

/// Video-codec tag: the first video stream uses the tag's codec.
pub fn video_codec_matches(video: &VideoStream, tag: Tag) -> bool {
    tag.video_codec()
        .is_some_and(|codec| codec_is(video.codec.as_deref(), codec))
}

pub fn is_four_k(video: &VideoStream) -> bool {
    video.width.unwrap_or(0) >= FOUR_K_MIN_WIDTH
}

pub fn is_hdr(video: &VideoStream) -> bool {
    contains_ignore_case(&video.color_transfer, PQ_TRANSFER)
}

pub fn is_dolby_vision(video: &VideoStream) -> bool {
    contains_ignore_case(&video.profile, DOLBY_VISION_PROFILE)
}

/// Atmos: any audio title mentions Atmos, or any audio stream uses a
/// codec that commonly carries it.
pub fn is_dolby_atmos<'a>(mut audio: impl Iterator<Item = &'a AudioStream>) -> bool {
    audio.any(|a| {
        a.title
            .as_deref()
            .is_some_and(|t| contains_ignore_case(t, ATMOS_TITLE))
            || ATMOS_CARRIER_CODECS
                .iter()
                .any(|c| codec_is(a.codec.as_deref(), c))
    })
}

/// Audio-codec tag: any audio stream uses the tag's codec.
pub fn audio_codec_present<'a>(mut audio: impl Iterator<Item = &'a AudioStream>, tag: Tag) -> bool {
    match tag.audio_codec() {
        Some(codec) => audio.any(|a| codec_is(a.codec.as_deref(), codec)),
        None => false,
    }
}

/// `"{width}x{height}"`, with missing dimensions rendered as 0.
pub fn resolution(video: &VideoStream) -> String {
    format!(
        "{}x{}",
        video.width.unwrap_or(0),
        video.height.unwrap_or(0)
    )
}

/// Raw-sample bit depth, falling back to per-sample depth. Zero means
/// "unknown" to the probe and is skipped.
pub fn bit_depth(video: &VideoStream) -> Option<u32> {
    video
        .bits_per_raw_sample
        .filter(|&b| b > 0)
        .or(video.bits_per_sample.filter(|&b| b > 0))
}
