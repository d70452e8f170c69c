//! Usage source trait
//!
//! This module defines the `UsageSource` trait that provider crates implement.
//! It gives the exporter a uniform, pull-based view of an account's monthly
//! usage records regardless of where they come from.

use crate::error::Result;
use crate::types::{AccountSid, UsageRecord};
use futures::stream::Stream;
use std::pin::Pin;

/// A lazy, ordered, forward-only sequence of monthly usage records.
///
/// Records are delivered at most once, in the order the provider returns them.
/// The stream is not restartable; calling `monthly_records` again starts a new
/// traversal from the first record.
pub trait UsageSource: Send + Sync {
    /// Account whose records this source yields
    fn account_sid(&self) -> &AccountSid;

    /// Stream all monthly usage records of the account.
    ///
    /// The first error ends the stream.
    fn monthly_records(&self) -> Pin<Box<dyn Stream<Item = Result<UsageRecord>> + Send + '_>>;
}
