/// Classified attribute records and the ordered result set that owns them.
///
/// A [`FeatureRecord`] always carries a value for every [`Tag`]: the tag
/// storage is a fixed-size array indexed by the tag discriminant, so a
/// "missing key" cannot be represented at all.
use compact_str::CompactString;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::path::PathBuf;

/// One fixed boolean attribute in the classification taxonomy.
///
/// Declaration order is report column order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Tag {
    Mkv,
    Mp4,
    Hevc,
    H264,
    Av1,
    Hdr,
    FourK,
    DolbyVision,
    DolbyAtmos,
    Aac,
    Mp3,
    Ac3,
    Eac3,
    TrueHd,
    Dts,
    Opus,
    Flac,
    Vorbis,
    Pcm,
}

impl Tag {
    /// Number of tags in the taxonomy.
    pub const COUNT: usize = 19;

    /// Every tag, in report column order.
    pub const ALL: [Tag; Tag::COUNT] = [
        Tag::Mkv,
        Tag::Mp4,
        Tag::Hevc,
        Tag::H264,
        Tag::Av1,
        Tag::Hdr,
        Tag::FourK,
        Tag::DolbyVision,
        Tag::DolbyAtmos,
        Tag::Aac,
        Tag::Mp3,
        Tag::Ac3,
        Tag::Eac3,
        Tag::TrueHd,
        Tag::Dts,
        Tag::Opus,
        Tag::Flac,
        Tag::Vorbis,
        Tag::Pcm,
    ];

    /// Column label used in reports and exports.
    pub fn label(self) -> &'static str {
        match self {
            Self::Mkv => "MKV",
            Self::Mp4 => "MP4",
            Self::Hevc => "HEVC",
            Self::H264 => "H264",
            Self::Av1 => "AV1",
            Self::Hdr => "HDR",
            Self::FourK => "4K",
            Self::DolbyVision => "DolbyVision",
            Self::DolbyAtmos => "DolbyAtmos",
            Self::Aac => "AAC",
            Self::Mp3 => "MP3",
            Self::Ac3 => "AC3",
            Self::Eac3 => "EAC3",
            Self::TrueHd => "TRUEHD",
            Self::Dts => "DTS",
            Self::Opus => "OPUS",
            Self::Flac => "FLAC",
            Self::Vorbis => "VORBIS",
            Self::Pcm => "PCM",
        }
    }

    /// Case-insensitive lookup by column label.
    pub fn from_label(label: &str) -> Option<Tag> {
        Self::ALL
            .into_iter()
            .find(|t| t.label().eq_ignore_ascii_case(label))
    }

    /// File extension this container tag matches, if it is a container tag.
    pub fn container_extension(self) -> Option<&'static str> {
        match self {
            Self::Mkv => Some("mkv"),
            Self::Mp4 => Some("mp4"),
            _ => None,
        }
    }

    /// Probe codec identifier this video-codec tag matches.
    pub fn video_codec(self) -> Option<&'static str> {
        match self {
            Self::Hevc => Some("hevc"),
            Self::H264 => Some("h264"),
            Self::Av1 => Some("av1"),
            _ => None,
        }
    }

    /// Probe codec identifier this audio-codec tag matches.
    pub fn audio_codec(self) -> Option<&'static str> {
        match self {
            Self::Aac => Some("aac"),
            Self::Mp3 => Some("mp3"),
            Self::Ac3 => Some("ac3"),
            Self::Eac3 => Some("eac3"),
            Self::TrueHd => Some("truehd"),
            Self::Dts => Some("dts"),
            Self::Opus => Some("opus"),
            Self::Flac => Some("flac"),
            Self::Vorbis => Some("vorbis"),
            Self::Pcm => Some("pcm"),
            _ => None,
        }
    }

    #[inline]
    fn idx(self) -> usize {
        self as usize
    }
}

/// Presence flags for every [`Tag`], defaulting to `false`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct TagSet([bool; Tag::COUNT]);

impl TagSet {
    pub fn get(&self, tag: Tag) -> bool {
        self.0[tag.idx()]
    }

    pub fn set(&mut self, tag: Tag, present: bool) {
        self.0[tag.idx()] = present;
    }

    /// `(tag, present)` pairs in column order. Always yields [`Tag::COUNT`] items.
    pub fn iter(&self) -> impl Iterator<Item = (Tag, bool)> + '_ {
        Tag::ALL.into_iter().map(|t| (t, self.get(t)))
    }

    /// Tags that are present, in column order.
    pub fn present(&self) -> impl Iterator<Item = Tag> + '_ {
        self.iter().filter(|&(_, p)| p).map(|(t, _)| t)
    }

    pub fn none_present(&self) -> bool {
        !self.0.iter().any(|&p| p)
    }
}

/// Serialises as a map keyed by tag label, every key present.
impl Serialize for TagSet {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Tag::COUNT))?;
        for (tag, present) in self.iter() {
            map.serialize_entry(tag.label(), &present)?;
        }
        map.end()
    }
}

/// The classified attribute set for one file.
///
/// Immutable after construction; owned by the [`ResultSet`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeatureRecord {
    /// File name only.
    pub file: CompactString,
    /// Full path, used for ordering and to disambiguate equal names.
    pub path: PathBuf,
    /// Human-readable size, e.g. `"2000.0 MB"`, or `"N/A"`.
    pub size: String,
    /// `"{width}x{height}"` of the first video stream, or `"N/A"`.
    pub resolution: String,
    /// `"{n}-bit"`, or `"N/A"`.
    pub bit_depth: String,
    /// `"{m}m {s}s"`, or `"N/A"`.
    pub duration: String,
    /// Local modification time `"%Y-%m-%d %H:%M:%S"`, or `"N/A"`.
    pub modified: String,
    pub tags: TagSet,
    /// Raw byte count behind `size`, for numeric sorting.
    #[serde(skip)]
    pub size_bytes: Option<u64>,
    /// Whole seconds behind `duration`, for numeric sorting.
    #[serde(skip)]
    pub duration_secs: Option<u64>,
}

impl FeatureRecord {
    pub fn tag(&self, tag: Tag) -> bool {
        self.tags.get(tag)
    }
}

/// Records collected during one scan, plus the count of files whose
/// metadata could not be obtained.
#[derive(Debug, Clone, Default)]
pub struct ResultSet {
    records: Vec<FeatureRecord>,
    skipped: u64,
}

impl ResultSet {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            records: Vec::with_capacity(capacity),
            skipped: 0,
        }
    }

    pub fn push(&mut self, record: FeatureRecord) {
        self.records.push(record);
    }

    pub fn record_skip(&mut self) {
        self.skipped += 1;
    }

    /// Order records by full path so exports are reproducible regardless of
    /// which worker finished first.
    pub fn sort_by_path(&mut self) {
        self.records.sort_by(|a, b| a.path.cmp(&b.path));
    }

    pub fn records(&self) -> &[FeatureRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<FeatureRecord> {
        self.records
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn clear(&mut self) {
        self.records.clear();
        self.skipped = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_is_in_discriminant_order() {
        for (i, tag) in Tag::ALL.iter().enumerate() {
            assert_eq!(tag.idx(), i, "{tag:?} out of order");
        }
    }

    #[test]
    fn labels_round_trip_case_insensitively() {
        for tag in Tag::ALL {
            assert_eq!(Tag::from_label(&tag.label().to_lowercase()), Some(tag));
        }
        assert_eq!(Tag::from_label("Resolution"), None);
    }

    #[test]
    fn tagset_defaults_to_all_false() {
        let set = TagSet::default();
        assert_eq!(set.iter().count(), Tag::COUNT);
        assert!(set.none_present());
    }

    #[test]
    fn tagset_serialises_every_key() {
        let mut set = TagSet::default();
        set.set(Tag::Hdr, true);
        let json = serde_json::to_value(set).unwrap();
        let obj = json.as_object().unwrap();
        assert_eq!(obj.len(), Tag::COUNT);
        assert_eq!(obj["HDR"], true);
        assert_eq!(obj["4K"], false);
    }

    #[test]
    fn result_set_sorts_by_path() {
        let mk = |p: &str| FeatureRecord {
            file: CompactString::new(p),
            path: PathBuf::from(p),
            size: "N/A".into(),
            resolution: "N/A".into(),
            bit_depth: "N/A".into(),
            duration: "N/A".into(),
            modified: "N/A".into(),
            tags: TagSet::default(),
            size_bytes: None,
            duration_secs: None,
        };
        let mut rs = ResultSet::default();
        rs.push(mk("/b.mkv"));
        rs.push(mk("/a.mkv"));
        rs.record_skip();
        rs.sort_by_path();
        assert_eq!(rs.records()[0].file, "/a.mkv");
        assert_eq!(rs.skipped(), 1);
        rs.clear();
        assert!(rs.is_empty());
        assert_eq!(rs.skipped(), 0);
    }
}
