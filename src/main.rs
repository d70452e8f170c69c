//! usagecsv - Export monthly Twilio usage records to CSV

use clap::Parser;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use usagecsv::{cli::Cli, error::Result, export::export_usage};
use usagecsv_provider_twilio::DataLoader;

const DEFAULT_LOG_FILTER: &str = "usagecsv=info,usagecsv_core=info,usagecsv_provider_twilio=info";

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables win over it
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    // The --quiet flag should override RUST_LOG.
    let filter = if cli.quiet {
        tracing_subscriber::EnvFilter::new("warn")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(DEFAULT_LOG_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = cli.export_config()?;
    let source = DataLoader::from_config(&config)?;

    info!("Fetching usage records for account {}", config.credentials.account_sid());

    // The spinner draws on stderr, next to the log output
    let show_progress = !cli.quiet && is_terminal::is_terminal(std::io::stderr());
    let summary = export_usage(&source, &config.output_dir, show_progress).await?;

    println!(
        "Successfully wrote a total of {} records to {}",
        summary.total_records,
        summary.output_path.display()
    );

    Ok(())
}
