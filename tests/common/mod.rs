//! Common test utilities for usagecsv integration tests
//!
//! Provides a builder for usage records, an in-memory usage source and a
//! reader for the produced CSV files.

#![allow(dead_code)]

use chrono::{TimeZone, Utc};
use futures::stream::Stream;
use std::path::Path;
use std::pin::Pin;
use usagecsv::{
    error::{Result, UsagecsvError},
    provider::UsageSource,
    types::{AccountSid, ISOTimestamp, Quantity, UsageRecord, UsageRow},
};

pub const TEST_ACCOUNT_SID: &str = "AC0123456789abcdef0123456789abcdef";

/// Builder for creating test UsageRecord instances
pub struct UsageRecordBuilder {
    record: UsageRecord,
}

impl UsageRecordBuilder {
    /// A January 2024 SMS record with every field populated
    pub fn new() -> Self {
        Self {
            record: UsageRecord {
                account_sid: Some(AccountSid::new(TEST_ACCOUNT_SID)),
                category: Some("sms".to_string()),
                description: Some("SMS Messages".to_string()),
                start_date: Some(day(2024, 1, 1)),
                end_date: Some(day(2024, 1, 31)),
                count: Some(Quantity::new("1")),
                count_unit: Some("messages".to_string()),
                usage: Some(Quantity::new("1")),
                usage_unit: Some("messages".to_string()),
                price: Some(Quantity::new("0.0079")),
                price_unit: Some("usd".to_string()),
            },
        }
    }

    pub fn with_category(mut self, category: &str) -> Self {
        self.record.category = Some(category.to_string());
        self
    }

    pub fn with_description(mut self, description: &str) -> Self {
        self.record.description = Some(description.to_string());
        self
    }

    /// Period covering the whole month
    pub fn with_month(mut self, year: i32, month: u32) -> Self {
        let start = Utc.with_ymd_and_hms(year, month, 1, 0, 0, 0).unwrap();
        let (next_year, next_month) = if month == 12 { (year + 1, 1) } else { (year, month + 1) };
        let end = Utc.with_ymd_and_hms(next_year, next_month, 1, 0, 0, 0).unwrap()
            - chrono::Duration::days(1);
        self.record.start_date = Some(ISOTimestamp::new(start));
        self.record.end_date = Some(ISOTimestamp::new(end));
        self
    }

    pub fn with_start(mut self, start: Option<ISOTimestamp>) -> Self {
        self.record.start_date = start;
        self
    }

    pub fn with_count(mut self, count: &str) -> Self {
        self.record.count = Some(Quantity::new(count));
        self
    }

    pub fn with_price(mut self, price: Option<&str>) -> Self {
        self.record.price = price.map(Quantity::new);
        self
    }

    pub fn build(self) -> UsageRecord {
        self.record
    }
}

impl Default for UsageRecordBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Midnight UTC of the given day
pub fn day(year: i32, month: u32, day: u32) -> ISOTimestamp {
    ISOTimestamp::new(Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap())
}

/// Usage source backed by a vector, optionally failing after some records
pub struct VecSource {
    account_sid: AccountSid,
    records: Vec<UsageRecord>,
    fail_after: Option<usize>,
}

impl VecSource {
    pub fn new(records: Vec<UsageRecord>) -> Self {
        Self {
            account_sid: AccountSid::new(TEST_ACCOUNT_SID),
            records,
            fail_after: None,
        }
    }

    /// Yield the first `n` records, then an API error
    pub fn failing_after(mut self, n: usize) -> Self {
        self.fail_after = Some(n);
        self
    }
}

impl UsageSource for VecSource {
    fn account_sid(&self) -> &AccountSid {
        &self.account_sid
    }

    fn monthly_records(&self) -> Pin<Box<dyn Stream<Item = Result<UsageRecord>> + Send + '_>> {
        Box::pin(async_stream::stream! {
            for (index, record) in self.records.iter().enumerate() {
                if self.fail_after == Some(index) {
                    yield Err(UsagecsvError::Api {
                        status: 429,
                        code: Some(20429),
                        message: "Too Many Requests".to_string(),
                    });
                    return;
                }
                yield Ok(record.clone());
            }
        })
    }
}

/// Read an output file back as (header, rows)
pub fn read_csv(path: &Path) -> (Vec<String>, Vec<UsageRow>) {
    let mut reader = csv::Reader::from_path(path).unwrap();
    let header = reader
        .headers()
        .unwrap()
        .iter()
        .map(str::to_string)
        .collect();
    let rows = reader
        .deserialize::<UsageRow>()
        .map(|row| row.unwrap())
        .collect();
    (header, rows)
}
