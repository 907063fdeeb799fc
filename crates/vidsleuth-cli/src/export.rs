/// CSV and JSON export of feature records.
use crate::view::Column;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;
use vidsleuth_core::model::FeatureRecord;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV export failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON export failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot write {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Write `records` as CSV with a header row of every column.
///
/// Tag columns are written as `true`/`false`.
pub fn write_csv<W: Write>(records: &[FeatureRecord], writer: W) -> Result<(), ExportError> {
    let mut csv = csv::Writer::from_writer(writer);
    csv.write_record(Column::all().map(Column::label))?;
    for record in records {
        csv.write_record(Column::all().map(|column| match column {
            Column::Tag(tag) => {
                if record.tag(tag) {
                    "true"
                } else {
                    "false"
                }
            }
            other => other.text(record).unwrap_or_default(),
        }))?;
    }
    csv.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Write `records` as a pretty-printed JSON array.
pub fn write_json<W: Write>(records: &[FeatureRecord], mut writer: W) -> Result<(), ExportError> {
    serde_json::to_writer_pretty(&mut writer, records)?;
    writer
        .write_all(b"\n")
        .and_then(|_| writer.flush())
        .map_err(serde_json::Error::io)?;
    Ok(())
}

fn create(path: &Path) -> Result<BufWriter<File>, ExportError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| ExportError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Write a CSV report to `path`.
pub fn export_csv(records: &[FeatureRecord], path: &Path) -> Result<(), ExportError> {
    write_csv(records, create(path)?)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}

/// Write a JSON report to `path`.
pub fn export_json(records: &[FeatureRecord], path: &Path) -> Result<(), ExportError> {
    write_json(records, create(path)?)?;
    info!("Wrote {} records to {}", records.len(), path.display());
    Ok(())
}
