//! Core types, traits, and configuration for usagecsv
//!
//! This crate provides the foundational types, error handling,
//! credential configuration, and the usage source trait used
//! by the other usagecsv crates.

pub mod config;
pub mod error;
pub mod provider;
pub mod types;

#[cfg(test)]
pub mod test_utils;

// Re-export commonly used types
pub use config::{Credentials, ExportConfig};
pub use error::{Result, UsagecsvError};
pub use provider::UsageSource;
pub use types::{
    AccountSid, CalendarDate, ISOTimestamp, MonthKey, Quantity, UsageRecord, UsageRow,
};
