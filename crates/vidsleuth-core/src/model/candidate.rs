/// A file selected by traversal as eligible for probing.
///
/// Candidates are ephemeral: produced by the walker, consumed once by the
/// probe stage, then dropped.
use chrono::{DateTime, Local};
use compact_str::CompactString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    /// Full path of the file.
    pub path: PathBuf,
    /// Lowercase extension without the leading dot (empty if none).
    pub extension: CompactString,
    /// Last-modification time, read once during traversal.
    pub modified: Option<DateTime<Local>>,
}

impl Candidate {
    /// Build a candidate from a path, deriving the lowercase extension.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let extension = lowercase_extension(&path);
        Self {
            path,
            extension,
            modified: None,
        }
    }

    /// Attach the modification time observed during traversal.
    pub fn with_modified(mut self, modified: Option<DateTime<Local>>) -> Self {
        self.modified = modified;
        self
    }

    /// File name only (NOT the full path), as shown in the report.
    pub fn file_name(&self) -> CompactString {
        self.path
            .file_name()
            .map(|n| CompactString::new(n.to_string_lossy()))
            .unwrap_or_else(|| CompactString::new(self.path.to_string_lossy()))
    }

    /// `true` if the extension is in `recognised` (already lowercase, no dots).
    pub fn is_recognised(&self, recognised: &[CompactString]) -> bool {
        recognised.iter().any(|ext| *ext == self.extension)
    }
}

fn lowercase_extension(path: &Path) -> CompactString {
    path.extension()
        .map(|e| CompactString::new(e.to_string_lossy().to_ascii_lowercase()))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extension_is_lowercased() {
        let c = Candidate::new("/media/Movie.MKV");
        assert_eq!(c.extension, "mkv");
        assert_eq!(c.file_name(), "Movie.MKV");
    }

    #[test]
    fn missing_extension_is_empty() {
        let c = Candidate::new("/media/README");
        assert_eq!(c.extension, "");
    }

    #[test]
    fn recognised_matches_exact_extension_only() {
        let exts = [CompactString::new("mp4"), CompactString::new("mkv")];
        assert!(Candidate::new("a.Mp4").is_recognised(&exts));
        assert!(!Candidate::new("a.mp4.part").is_recognised(&exts));
        assert!(!Candidate::new("mkv").is_recognised(&exts));
    }
}
