//! Twilio provider for usagecsv
//!
//! This crate implements the usage source trait for Twilio's
//! monthly usage records list endpoint, following page links lazily.

pub mod data_loader;

pub use data_loader::DataLoader;
