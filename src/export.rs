//! Export of one account's usage to `<output_dir>/<account_sid>.csv`

use crate::aggregation::{Aggregator, ExportSummary};
use std::path::Path;
use tracing::info;
use usagecsv_core::config::output_path_for;
use usagecsv_core::error::Result;
use usagecsv_core::provider::UsageSource;

/// Export every monthly usage record of `source` into `output_dir`
///
/// Creates `output_dir` if needed. An existing file for the same account is
/// overwritten.
pub async fn export_usage<S>(
    source: &S,
    output_dir: &Path,
    show_progress: bool,
) -> Result<ExportSummary>
where
    S: UsageSource + ?Sized,
{
    if !tokio::fs::try_exists(output_dir).await? {
        info!("Creating {} directory", output_dir.display());
        tokio::fs::create_dir_all(output_dir).await?;
    }

    let output_path = output_path_for(output_dir, source.account_sid());
    info!("Will write data to: {}", output_path.display());

    Aggregator::new()
        .with_progress(show_progress)
        .aggregate_with_summary(source.monthly_records(), &output_path)
        .await
}
