/// Report columns, name filtering and column sorting.
use std::cmp::Ordering;
use vidsleuth_core::model::size::NOT_AVAILABLE;
use vidsleuth_core::model::{FeatureRecord, Tag};

/// One report column. Text columns come first, then every taxonomy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Column {
    File,
    Size,
    Resolution,
    BitDepth,
    Duration,
    Modified,
    Tag(Tag),
}

const TEXT_COLUMNS: [Column; 6] = [
    Column::File,
    Column::Size,
    Column::Resolution,
    Column::BitDepth,
    Column::Duration,
    Column::Modified,
];

impl Column {
    /// Every column, in report order.
    pub fn all() -> impl Iterator<Item = Column> {
        TEXT_COLUMNS
            .into_iter()
            .chain(Tag::ALL.into_iter().map(Column::Tag))
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::File => "File",
            Self::Size => "Size",
            Self::Resolution => "Resolution",
            Self::BitDepth => "BitDepth",
            Self::Duration => "Duration",
            Self::Modified => "Modified",
            Self::Tag(tag) => tag.label(),
        }
    }

    /// Case-insensitive lookup by header label.
    pub fn from_label(label: &str) -> Option<Column> {
        Self::all().find(|c| c.label().eq_ignore_ascii_case(label))
    }

    /// Text value of a non-tag column; `None` for tag columns.
    pub fn text(self, record: &FeatureRecord) -> Option<&str> {
        match self {
            Self::File => Some(record.file.as_str()),
            Self::Size => Some(record.size.as_str()),
            Self::Resolution => Some(record.resolution.as_str()),
            Self::BitDepth => Some(record.bit_depth.as_str()),
            Self::Duration => Some(record.duration.as_str()),
            Self::Modified => Some(record.modified.as_str()),
            Self::Tag(_) => None,
        }
    }

    fn compare(self, a: &FeatureRecord, b: &FeatureRecord) -> Ordering {
        match self {
            Self::File => a
                .file
                .to_lowercase()
                .cmp(&b.file.to_lowercase())
                .then_with(|| a.path.cmp(&b.path)),
            Self::Size => a.size_bytes.cmp(&b.size_bytes),
            Self::Resolution => pixels(&a.resolution).cmp(&pixels(&b.resolution)),
            Self::BitDepth => leading_number(&a.bit_depth).cmp(&leading_number(&b.bit_depth)),
            Self::Duration => a.duration_secs.cmp(&b.duration_secs),
            // The timestamp format sorts chronologically as text.
            Self::Modified => available(&a.modified).cmp(&available(&b.modified)),
            Self::Tag(tag) => a.tag(tag).cmp(&b.tag(tag)),
        }
    }
}

fn available(text: &str) -> Option<&str> {
    (text != NOT_AVAILABLE).then_some(text)
}

/// Pixel count of a `"WxH"` string.
fn pixels(resolution: &str) -> Option<u64> {
    let (w, h) = resolution.split_once('x')?;
    Some(w.parse::<u64>().ok()? * h.parse::<u64>().ok()?)
}

/// Leading integer of strings like `"10-bit"`.
fn leading_number(text: &str) -> Option<u32> {
    let digits: String = text.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Records whose file name contains `query`, case-insensitively.
/// An empty query matches everything.
pub fn filter_by_name<'a>(
    records: &'a [FeatureRecord],
    query: &str,
) -> impl Iterator<Item = &'a FeatureRecord> {
    let query = query.to_lowercase();
    records
        .iter()
        .filter(move |r| query.is_empty() || r.file.to_lowercase().contains(&query))
}

/// Stable sort by `column`. Missing values (`"N/A"`) sort first ascending.
pub fn sort_by(records: &mut [FeatureRecord], column: Column, descending: bool) {
    records.sort_by(|a, b| {
        let ord = column.compare(a, b);
        if descending {
            ord.reverse()
        } else {
            ord
        }
    });
}
