/// Formatting utilities: human-readable byte counts and durations.
///
/// All internal sizes are `u64` bytes. Floating point is only used
/// at the display-formatting boundary.

/// Placeholder shown for any attribute the probe could not supply.
pub const NOT_AVAILABLE: &str = "N/A";

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// Format a byte count as megabytes rounded to two decimal places.
///
/// Trailing zeros are dropped but at least one decimal digit is kept, so
/// 2 097 152 000 bytes renders as `"2000.0 MB"` and 1 572 864 as `"1.5 MB"`.
pub fn format_megabytes(bytes: u64) -> String {
    let mb = ((bytes as f64 / BYTES_PER_MB) * 100.0).round() / 100.0;
    let mut digits = format!("{mb:.2}");
    while digits.ends_with('0') && !digits[..digits.len() - 1].ends_with('.') {
        digits.pop();
    }
    format!("{digits} MB")
}

/// Format a duration in seconds as `"{minutes}m {seconds}s"`.
///
/// Both parts are truncated, not rounded. Negative or non-finite values
/// yield `None`.
pub fn format_duration(secs: f64) -> Option<String> {
    if !secs.is_finite() || secs < 0.0 {
        return None;
    }
    let whole = secs as u64;
    Some(format!("{}m {}s", whole / 60, whole % 60))
}

/// Format a byte count into a human-readable string with appropriate unit.
///
/// Uses binary units (KiB = 1024) but labels them with common short forms
/// (KB, MB, GB, TB) because that is what users expect.
pub fn format_size(bytes: u64) -> String {
    const KB: f64 = 1024.0;
    const MB: f64 = KB * 1024.0;
    const GB: f64 = MB * 1024.0;
    const TB: f64 = GB * 1024.0;

    let b = bytes as f64;
    if b < KB {
        format!("{bytes} B")
    } else if b < MB {
        format!("{:.1} KB", b / KB)
    } else if b < GB {
        format!("{:.1} MB", b / MB)
    } else if b < TB {
        format!("{:.2} GB", b / GB)
    } else {
        format!("{:.2} TB", b / TB)
    }
}

/// Format a file count with thousand separators.
pub fn format_count(count: u64) -> String {
    if count < 1_000 {
        return count.to_string();
    }
    let s = count.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().rev().enumerate() {
        if i > 0 && i % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result.chars().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_megabytes_whole() {
        assert_eq!(format_megabytes(2_097_152_000), "2000.0 MB");
        assert_eq!(format_megabytes(0), "0.0 MB");
    }

    #[test]
    fn test_format_megabytes_fractional() {
        assert_eq!(format_megabytes(1_572_864), "1.5 MB");
        // 1.2345 MB rounds to two places.
        assert_eq!(format_megabytes(1_294_467), "1.23 MB");
    }

    #[test]
    fn test_format_duration() {
        assert_eq!(format_duration(0.0).as_deref(), Some("0m 0s"));
        assert_eq!(format_duration(5_423.84).as_deref(), Some("90m 23s"));
        assert_eq!(format_duration(59.99).as_deref(), Some("0m 59s"));
        assert_eq!(format_duration(-1.0), None);
        assert_eq!(format_duration(f64::NAN), None);
    }

    #[test]
    fn test_format_size_units() {
        assert_eq!(format_size(512), "512 B");
        assert_eq!(format_size(1536), "1.5 KB");
        assert_eq!(format_size(1_048_576), "1.0 MB");
        assert_eq!(format_size(1_073_741_824), "1.00 GB");
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(1_234_567), "1,234,567");
    }
}
