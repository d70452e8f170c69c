//! CSV output for usage rows
//!
//! The output file is produced by two operations called in strict sequence:
//! [`write_header`] once, which creates or truncates the file, then
//! [`append_rows`] once per flushed batch. Each call serializes into memory
//! first and reaches the file in a single write.

use std::path::Path;
use tokio::io::AsyncWriteExt;
use usagecsv_core::error::{Result, UsagecsvError};
use usagecsv_core::types::UsageRow;

/// Create or truncate `path` and write the column header line
pub async fn write_header(path: &Path) -> Result<()> {
    let mut writer = row_writer();
    writer.write_record(UsageRow::HEADERS)?;
    let bytes = into_bytes(writer)?;

    tokio::fs::write(path, bytes).await?;
    Ok(())
}

/// Append `rows` to an existing file, in order, without touching the header
///
/// # Errors
///
/// Fails with an IO error if `path` does not exist yet; [`write_header`]
/// must run first.
pub async fn append_rows(path: &Path, rows: &[UsageRow]) -> Result<()> {
    let mut writer = row_writer();
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = into_bytes(writer)?;

    let mut file = tokio::fs::OpenOptions::new()
        .append(true)
        .open(path)
        .await?;
    file.write_all(&bytes).await?;
    file.flush().await?;
    Ok(())
}

fn row_writer() -> csv::Writer<Vec<u8>> {
    csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new())
}

fn into_bytes(writer: csv::Writer<Vec<u8>>) -> Result<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| UsagecsvError::Io(e.into_error()))
}
