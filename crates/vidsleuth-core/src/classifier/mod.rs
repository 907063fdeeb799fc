/// Feature classifier: maps probe metadata onto the fixed tag taxonomy.
///
/// [`classify`] is a pure function: no I/O, no clock, no global state.
/// Identical inputs always produce identical records.
///
/// Only the first video stream is consulted for codec, resolution, bit
/// depth, HDR and Dolby Vision; later video streams (alternate angles,
/// cover art) are ignored. All audio streams are consulted.
pub mod rules;

use crate::model::size::{format_duration, format_megabytes, NOT_AVAILABLE};
use crate::model::{Candidate, FeatureRecord, MediaDescriptor, Tag, TagSet};

/// Timestamp format for the `Modified` column.
pub const MODIFIED_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Classify one probed file.
pub fn classify(candidate: &Candidate, descriptor: &MediaDescriptor) -> FeatureRecord {
    let mut tags = TagSet::default();
    let video = descriptor.first_video();

    // A file with no audio or video streams gets no tags at all.
    if video.is_some() || descriptor.audio_streams().next().is_some() {
        for tag in [Tag::Mkv, Tag::Mp4] {
            tags.set(tag, rules::container_matches(candidate, tag));
        }
    }

    if let Some(v) = video {
        for tag in [Tag::Hevc, Tag::H264, Tag::Av1] {
            tags.set(tag, rules::video_codec_matches(v, tag));
        }
        tags.set(Tag::FourK, rules::is_four_k(v));
        tags.set(Tag::Hdr, rules::is_hdr(v));
        tags.set(Tag::DolbyVision, rules::is_dolby_vision(v));
    }

    tags.set(
        Tag::DolbyAtmos,
        rules::is_dolby_atmos(descriptor.audio_streams()),
    );
    for tag in Tag::ALL.into_iter().filter(|t| t.audio_codec().is_some()) {
        tags.set(tag, rules::audio_codec_present(descriptor.audio_streams(), tag));
    }

    let size_bytes = descriptor.size_bytes.unwrap_or(0);
    let duration = descriptor.duration_secs.and_then(format_duration);

    FeatureRecord {
        file: candidate.file_name(),
        path: candidate.path.clone(),
        size: format_megabytes(size_bytes),
        resolution: video
            .map(rules::resolution)
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        bit_depth: video
            .and_then(rules::bit_depth)
            .map(|b| format!("{b}-bit"))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        duration: duration.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        modified: format_modified(candidate),
        tags,
        size_bytes: Some(size_bytes),
        duration_secs: descriptor
            .duration_secs
            .filter(|d| d.is_finite() && *d >= 0.0)
            .map(|d| d as u64),
    }
}

/// Record for a file whose metadata could not be obtained or decoded.
///
/// Every tag is `false` and every probe-derived column is `"N/A"`, so the
/// file still gets a row and counts stay consistent with the directory.
pub fn classify_without_metadata(candidate: &Candidate) -> FeatureRecord {
    FeatureRecord {
        file: candidate.file_name(),
        path: candidate.path.clone(),
        size: NOT_AVAILABLE.to_string(),
        resolution: NOT_AVAILABLE.to_string(),
        bit_depth: NOT_AVAILABLE.to_string(),
        duration: NOT_AVAILABLE.to_string(),
        modified: format_modified(candidate),
        tags: TagSet::default(),
        size_bytes: None,
        duration_secs: None,
    }
}

fn format_modified(candidate: &Candidate) -> String {
    candidate
        .modified
        .map(|t| t.format(MODIFIED_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}
