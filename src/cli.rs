//! CLI interface for usagecsv
//!
//! Every option has an environment variable fallback, so the usual invocation
//! takes no arguments at all:
//!
//! ```bash
//! export TWILIO_ACCOUNT_SID_1=AC...
//! export TWILIO_AUTH_TOKEN_1=...
//! usagecsv
//!
//! # Explicit output directory, larger pages, logs limited to warnings
//! usagecsv --output-dir exports --page-size 500 --quiet
//! ```
//!
//! A `.env` file in the working directory is read before parsing; variables
//! already present in the environment take precedence over it.

use clap::Parser;
use std::path::PathBuf;
use usagecsv_core::config::{
    ACCOUNT_SID_ENV, AUTH_TOKEN_ENV, Credentials, DEFAULT_API_BASE_URL, DEFAULT_OUTPUT_DIR,
    DEFAULT_PAGE_SIZE, ExportConfig, MAX_PAGE_SIZE,
};
use usagecsv_core::error::Result;

/// Export monthly Twilio usage records to CSV
#[derive(Parser, Debug, Clone)]
#[command(name = "usagecsv")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Account SID of the account to export
    #[arg(long, env = ACCOUNT_SID_ENV)]
    pub account_sid: String,

    /// Auth token of the account
    #[arg(long, env = AUTH_TOKEN_ENV, hide_env_values = true)]
    pub auth_token: String,

    /// Directory receiving <account_sid>.csv (created if missing)
    #[arg(long, env = "USAGECSV_OUTPUT_DIR", default_value = DEFAULT_OUTPUT_DIR)]
    pub output_dir: PathBuf,

    /// Usage records requested per API page
    #[arg(
        long,
        env = "USAGECSV_PAGE_SIZE",
        default_value_t = DEFAULT_PAGE_SIZE,
        value_parser = clap::value_parser!(u32).range(1..=MAX_PAGE_SIZE as i64)
    )]
    pub page_size: u32,

    /// Base URL of the REST API
    #[arg(long, env = "USAGECSV_API_BASE_URL", default_value = DEFAULT_API_BASE_URL)]
    pub api_base_url: String,

    /// Only log warnings and errors
    #[arg(long, short = 'q')]
    pub quiet: bool,
}

impl Cli {
    /// Validate the parsed options and turn them into an export configuration
    pub fn export_config(&self) -> Result<ExportConfig> {
        let credentials = Credentials::new(&self.account_sid, &self.auth_token)?;
        let config = ExportConfig::new(credentials)
            .with_output_dir(self.output_dir.clone())
            .with_page_size(self.page_size)
            .with_api_base_url(&self.api_base_url);

        config.validate()?;
        Ok(config)
    }
}
