//! Monthly aggregation of usage records into the CSV file
//!
//! The [`Aggregator`] pulls records from a stream in arrival order and buffers
//! them in a [`MonthlyBatch`] while their month key stays the same. When a
//! record with a different key arrives, the buffered batch is appended to the
//! output file in one write and a new batch starts. The last batch is flushed
//! when the stream ends.
//!
//! Grouping follows arrival order only. Records are never sorted, and two
//! separate runs of the same month are written as two batches rather than
//! merged. Memory use is bounded by the largest contiguous run.
//!
//! # Examples
//!
//! ```no_run
//! use usagecsv::aggregation::Aggregator;
//! use usagecsv::provider::UsageSource;
//! use usagecsv::config::{Credentials, ExportConfig};
//! use usagecsv_provider_twilio::DataLoader;
//! use std::path::Path;
//!
//! # async fn example() -> usagecsv::Result<()> {
//! let config = ExportConfig::new(Credentials::from_env()?);
//! let source = DataLoader::from_config(&config)?;
//!
//! let total = Aggregator::new()
//!     .aggregate(source.monthly_records(), Path::new("local/usage.csv"))
//!     .await?;
//! println!("{total} records written");
//! # Ok(())
//! # }
//! ```

use crate::output::{append_rows, write_header};
use futures::stream::{Stream, StreamExt};
use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::info;
use usagecsv_core::error::Result;
use usagecsv_core::types::{MonthKey, UsageRecord, UsageRow};

/// A contiguous run of rows sharing one month key, in arrival order
#[derive(Debug, Clone)]
pub struct MonthlyBatch {
    month: Option<MonthKey>,
    rows: Vec<UsageRow>,
}

impl MonthlyBatch {
    fn new(month: Option<MonthKey>) -> Self {
        Self {
            month,
            rows: Vec::new(),
        }
    }

    /// Month key shared by every row; `None` for records without a start date
    pub fn month(&self) -> Option<MonthKey> {
        self.month
    }

    pub fn rows(&self) -> &[UsageRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// One flushed batch
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchSummary {
    /// Month key of the batch
    pub month: Option<MonthKey>,
    /// Number of rows written by the flush
    pub rows: usize,
}

/// Outcome of one export run
#[derive(Debug, Clone, Serialize)]
pub struct ExportSummary {
    /// File the rows were written to
    pub output_path: PathBuf,
    /// Flushed batches, in write order
    pub batches: Vec<BatchSummary>,
    /// Sum of all batch sizes
    pub total_records: usize,
}

impl ExportSummary {
    fn new(output_path: &Path) -> Self {
        Self {
            output_path: output_path.to_path_buf(),
            batches: Vec::new(),
            total_records: 0,
        }
    }

    fn record_batch(&mut self, month: Option<MonthKey>, rows: usize) {
        self.batches.push(BatchSummary { month, rows });
        self.total_records += rows;
    }
}

/// Writes a record stream to CSV, one append per month
#[derive(Debug, Default)]
pub struct Aggregator {
    show_progress: bool,
}

impl Aggregator {
    /// Create a new Aggregator
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable the progress spinner
    pub fn with_progress(mut self, show_progress: bool) -> Self {
        self.show_progress = show_progress;
        self
    }

    /// Write every record of `records` to `output_path` and return how many were written
    ///
    /// The file is truncated and receives the header before the first record
    /// is pulled, so an empty stream leaves a header-only file.
    pub async fn aggregate(
        &self,
        records: impl Stream<Item = Result<UsageRecord>>,
        output_path: &Path,
    ) -> Result<usize> {
        Ok(self
            .aggregate_with_summary(records, output_path)
            .await?
            .total_records)
    }

    /// Same as [`Aggregator::aggregate`], also reporting every flushed batch
    ///
    /// # Errors
    ///
    /// The first source or write error is returned as-is. Batches flushed
    /// before it stay in the file; the batch being buffered is dropped.
    pub async fn aggregate_with_summary(
        &self,
        records: impl Stream<Item = Result<UsageRecord>>,
        output_path: &Path,
    ) -> Result<ExportSummary> {
        write_header(output_path).await?;

        let progress = if self.show_progress {
            let pb = ProgressBar::new_spinner();
            pb.set_style(
                ProgressStyle::default_spinner()
                    .template("{spinner:.green} {msg} [{elapsed_precise}] {pos} records processed")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner()),
            );
            pb.set_message("Fetching usage records");
            pb.enable_steady_tick(std::time::Duration::from_millis(100));
            Some(pb)
        } else {
            None
        };

        let mut summary = ExportSummary::new(output_path);
        let mut current: Option<MonthlyBatch> = None;
        let mut processed = 0u64;

        tokio::pin!(records);
        while let Some(result) = records.next().await {
            let record = result?;
            let month = record.month_key();

            if let Some(batch) = current.take_if(|batch| batch.month != month) {
                Self::flush(output_path, batch, &mut summary, progress.as_ref()).await?;
            }

            current
                .get_or_insert_with(|| MonthlyBatch::new(month))
                .rows
                .push(record.to_row());

            processed += 1;
            if let Some(ref pb) = progress {
                pb.set_position(processed);
            }
        }

        if let Some(batch) = current.take() {
            Self::flush(output_path, batch, &mut summary, progress.as_ref()).await?;
        }

        if let Some(pb) = progress {
            pb.finish_with_message(format!("Wrote {} records", summary.total_records));
        }

        Ok(summary)
    }

    async fn flush(
        output_path: &Path,
        batch: MonthlyBatch,
        summary: &mut ExportSummary,
        progress: Option<&ProgressBar>,
    ) -> Result<()> {
        append_rows(output_path, batch.rows()).await?;

        let month = describe_month(batch.month());
        let log = || info!("Wrote {} records for {}", batch.len(), month);
        match progress {
            Some(pb) => pb.suspend(log),
            None => log(),
        }

        summary.record_batch(batch.month(), batch.len());
        Ok(())
    }
}

fn describe_month(month: Option<MonthKey>) -> String {
    month
        .map(|key| key.to_string())
        .unwrap_or_else(|| "records without a start date".to_string())
}
