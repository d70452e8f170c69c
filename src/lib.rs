//! usagecsv - Export monthly Twilio usage records to CSV
//!
//! This library provides functionality to:
//! - Page through an account's monthly usage records
//! - Group records by the calendar month of their start date, in arrival order
//! - Append each month to a CSV file as soon as it is complete, bounding memory
//!
//! # Examples
//!
//! ```no_run
//! use usagecsv::{
//!     config::{Credentials, ExportConfig},
//!     export::export_usage,
//! };
//! use usagecsv_provider_twilio::DataLoader;
//!
//! #[tokio::main]
//! async fn main() -> usagecsv::Result<()> {
//!     let config = ExportConfig::new(Credentials::from_env()?);
//!     let source = DataLoader::from_config(&config)?;
//!
//!     let summary = export_usage(&source, &config.output_dir, false).await?;
//!     println!("{} records", summary.total_records);
//!     Ok(())
//! }
//! ```

pub mod aggregation;
pub mod cli;
pub mod export;
pub mod output;

pub use usagecsv_core::{config, error, provider, types};

// Re-export commonly used types
pub use usagecsv_core::error::{Result, UsagecsvError};
pub use usagecsv_core::types::{MonthKey, UsageRecord, UsageRow};
