/// One-line scan status: progress while scanning, a summary afterwards.
use crate::state::{AppPhase, AppState};
use vidsleuth_core::model::size::{format_count, format_size};

/// Widest current-path excerpt shown while scanning.
const MAX_PATH_CHARS: usize = 60;

/// Render the status line for the session's current phase.
pub fn status_line(state: &AppState) -> String {
    let mut parts: Vec<String> = Vec::new();

    match state.phase {
        AppPhase::Idle => parts.push("Ready".to_string()),
        AppPhase::Scanning => {
            parts.push(format!(
                "Scanning {}...",
                truncate_path(&state.scan_current_path, MAX_PATH_CHARS)
            ));
            parts.push(format!(
                "{} files",
                format_count(state.scan_files_processed)
            ));
            parts.push(format!(
                "{} candidates",
                format_count(state.scan_candidates_found)
            ));
            parts.push(format!("{} analysed", format_count(state.record_count() as u64)));
        }
        AppPhase::Results => {
            parts.push(if state.scan_was_cancelled {
                "\u{23f9} Scan stopped (partial results)".to_string()
            } else {
                "\u{2713} Scan complete".to_string()
            });
            let total_bytes: u64 =
                state.with_records(|records| records.iter().filter_map(|r| r.size_bytes).sum());
            parts.push(format!("{} files", format_count(state.record_count() as u64)));
            parts.push(format_size(total_bytes));
            if let Some(duration) = state.scan_duration {
                parts.push(format!("{:.1}s", duration.as_secs_f64()));
            }
        }
        AppPhase::Failed => {
            parts.push(format!(
                "Scan failed: {}",
                state.scan_failure.as_deref().unwrap_or("unknown error")
            ));
        }
    }

    if state.scan_skipped > 0 {
        parts.push(format!("{} skipped", format_count(state.scan_skipped)));
    }
    if state.scan_traversal_errors > 0 {
        parts.push(format!(
            "{} unreadable",
            format_count(state.scan_traversal_errors)
        ));
    }

    parts.join(" | ")
}

/// Shorten `path` to at most `max_chars` characters by replacing the
/// middle with `"..."`.
fn truncate_path(path: &str, max_chars: usize) -> String {
    let len = path.chars().count();
    if len <= max_chars {
        return path.to_string();
    }
    let half = max_chars.saturating_sub(3) / 2;
    let head: String = path.chars().take(half).collect();
    let tail: String = path.chars().skip(len - half).collect();
    format!("{head}...{tail}")
}
