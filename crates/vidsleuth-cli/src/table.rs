/// Plain-text report table.
use crate::view::Column;
use vidsleuth_core::model::FeatureRecord;

/// Glyphs used for tag cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marks {
    pub present: &'static str,
    pub absent: &'static str,
}

impl Marks {
    pub const UNICODE: Marks = Marks {
        present: "\u{2714}",
        absent: "\u{2716}",
    };
    pub const ASCII: Marks = Marks {
        present: "Y",
        absent: "-",
    };
}

/// Rendering options for [`render_table`].
#[derive(Debug, Clone)]
pub struct TableStyle {
    pub marks: Marks,
    /// Text placed between columns.
    pub separator: &'static str,
    /// Columns to render, in order.
    pub columns: Vec<Column>,
}

impl TableStyle {
    pub fn unicode() -> Self {
        Self {
            marks: Marks::UNICODE,
            separator: "  ",
            columns: Column::all().collect(),
        }
    }

    pub fn ascii() -> Self {
        Self {
            marks: Marks::ASCII,
            ..Self::unicode()
        }
    }
}

impl Default for TableStyle {
    fn default() -> Self {
        Self::unicode()
    }
}

fn cell(record: &FeatureRecord, column: Column, marks: Marks) -> String {
    match column {
        Column::Tag(tag) => {
            if record.tag(tag) {
                marks.present.to_string()
            } else {
                marks.absent.to_string()
            }
        }
        other => other.text(record).unwrap_or_default().to_string(),
    }
}

/// Render `records` as a padded table with a header row and a rule.
pub fn render_table(records: &[FeatureRecord], style: &TableStyle) -> String {
    let header: Vec<String> = style.columns.iter().map(|c| c.label().to_string()).collect();
    let rows: Vec<Vec<String>> = records
        .iter()
        .map(|r| style.columns.iter().map(|&c| cell(r, c, style.marks)).collect())
        .collect();

    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &rows {
        for (width, text) in widths.iter_mut().zip(row) {
            *width = (*width).max(text.chars().count());
        }
    }

    let mut out = String::new();
    push_line(&mut out, &header, &widths, style.separator);
    let rule: Vec<String> = widths.iter().map(|&w| "-".repeat(w)).collect();
    push_line(&mut out, &rule, &widths, style.separator);
    for row in &rows {
        push_line(&mut out, row, &widths, style.separator);
    }
    out
}

fn push_line(out: &mut String, cells: &[String], widths: &[usize], separator: &str) {
    let mut line = String::new();
    for (i, (text, &width)) in cells.iter().zip(widths).enumerate() {
        if i > 0 {
            line.push_str(separator);
        }
        line.push_str(text);
        let pad = width - text.chars().count();
        line.extend(std::iter::repeat(' ').take(pad));
    }
    out.push_str(line.trim_end());
    out.push('\n');
}
