//! Core domain types for usagecsv
//!
//! This module contains the fundamental types used throughout the usagecsv crates.
//! These types provide strong typing for account identifiers, timestamps, month
//! keys, and the usage records that travel from the provider into the CSV file.

use crate::error::{Result, UsagecsvError};
use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::Value;
use std::fmt;

/// Strongly-typed account SID wrapper
///
/// # Examples
/// ```
/// use usagecsv_core::types::AccountSid;
///
/// let sid = AccountSid::new("AC0123456789abcdef0123456789abcdef");
/// assert_eq!(sid.as_str(), "AC0123456789abcdef0123456789abcdef");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AccountSid(String);

impl AccountSid {
    /// Create a new AccountSid from any string-like type
    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountSid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for AccountSid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// ISO timestamp wrapper for UTC timestamps
///
/// Calendar dates and month keys are always derived from the UTC instant,
/// never from the textual form the timestamp arrived in.
///
/// # Examples
/// ```
/// use usagecsv_core::types::ISOTimestamp;
/// use chrono::{TimeZone, Utc};
///
/// let dt = Utc.with_ymd_and_hms(2024, 3, 15, 23, 59, 59).unwrap();
/// let timestamp = ISOTimestamp::new(dt);
///
/// assert_eq!(timestamp.to_calendar_date().to_string(), "2024-03-15");
/// assert_eq!(timestamp.month_key().to_string(), "2024-03");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ISOTimestamp(DateTime<Utc>);

impl ISOTimestamp {
    /// Create a new ISOTimestamp
    pub fn new(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Get the inner DateTime
    pub fn inner(&self) -> &DateTime<Utc> {
        &self.0
    }

    /// Parse a timestamp as sent by the provider
    ///
    /// Accepts a bare `YYYY-MM-DD` date (midnight UTC), RFC 3339 and RFC 2822.
    pub fn parse(value: &str) -> Result<Self> {
        let value = value.trim();

        if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
            return date
                .and_hms_opt(0, 0, 0)
                .map(|dt| Self(dt.and_utc()))
                .ok_or_else(|| UsagecsvError::InvalidDate(value.to_string()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
            return Ok(Self(dt.to_utc()));
        }

        if let Ok(dt) = DateTime::parse_from_rfc2822(value) {
            return Ok(Self(dt.to_utc()));
        }

        Err(UsagecsvError::InvalidDate(value.to_string()))
    }

    /// Convert to the UTC calendar date
    pub fn to_calendar_date(&self) -> CalendarDate {
        CalendarDate::new(self.0.date_naive())
    }

    /// Year and month of the UTC calendar date
    pub fn month_key(&self) -> MonthKey {
        MonthKey::from_date(self.0.date_naive())
    }
}

impl AsRef<DateTime<Utc>> for ISOTimestamp {
    fn as_ref(&self) -> &DateTime<Utc> {
        &self.0
    }
}

/// Calendar date without time information
///
/// Displays as `YYYY-MM-DD`, the format used by the date columns of the CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CalendarDate(NaiveDate);

impl CalendarDate {
    /// Create a new CalendarDate
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Get the inner NaiveDate
    pub fn inner(&self) -> &NaiveDate {
        &self.0
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

/// The (year, month) pair used to group records into batches
///
/// # Examples
/// ```
/// use usagecsv_core::types::MonthKey;
///
/// let key = MonthKey::new(2024, 1).unwrap();
/// assert_eq!(key.to_string(), "2024-01");
/// assert!(MonthKey::new(2024, 13).is_none());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Create a month key, rejecting months outside 1..=12
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Month key of a calendar date
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Calendar month, 1-based
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

/// A numeric value kept in its literal textual form
///
/// Counts, usage amounts and prices are written to the CSV exactly as the
/// provider sent them. The wire may carry them as JSON strings or numbers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Quantity(String);

impl Quantity {
    /// Create a new Quantity
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Get the literal value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl Serialize for Quantity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Quantity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        // Numbers keep their source text through serde_json's arbitrary_precision
        match Value::deserialize(deserializer)? {
            Value::String(text) => Ok(Self(text)),
            Value::Number(number) => Ok(Self(number.to_string())),
            other => Err(de::Error::custom(format!(
                "expected a string or number, found {other}"
            ))),
        }
    }
}

/// One billed usage line item for a time window
///
/// Every field may be missing on the wire; a missing value is written as an
/// empty cell.
///
/// # Examples
/// ```
/// use usagecsv_core::types::{AccountSid, ISOTimestamp, Quantity, UsageRecord};
///
/// let record = UsageRecord {
///     account_sid: Some(AccountSid::new("AC0123456789abcdef0123456789abcdef")),
///     category: Some("sms".to_string()),
///     start_date: Some(ISOTimestamp::parse("2024-01-01").unwrap()),
///     end_date: Some(ISOTimestamp::parse("2024-01-31").unwrap()),
///     count: Some(Quantity::new("10")),
///     ..Default::default()
/// };
///
/// let row = record.to_row();
/// assert_eq!(row.start_date.as_deref(), Some("2024-01-01"));
/// assert_eq!(row.count.as_deref(), Some("10"));
/// assert_eq!(row.price, None);
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsageRecord {
    /// Account the usage was billed to
    pub account_sid: Option<AccountSid>,
    /// Provider-defined usage category, e.g. `sms-outbound`
    pub category: Option<String>,
    /// Human-readable description of the category
    pub description: Option<String>,
    /// Start of the billing period
    pub start_date: Option<ISOTimestamp>,
    /// End of the billing period
    pub end_date: Option<ISOTimestamp>,
    /// Number of billable events
    pub count: Option<Quantity>,
    /// Unit of `count`
    pub count_unit: Option<String>,
    /// Amount of usage
    pub usage: Option<Quantity>,
    /// Unit of `usage`
    pub usage_unit: Option<String>,
    /// Total price for the period
    pub price: Option<Quantity>,
    /// Currency of `price`
    pub price_unit: Option<String>,
}

impl UsageRecord {
    /// Month key of the period start, if the record has one
    pub fn month_key(&self) -> Option<MonthKey> {
        self.start_date.map(|ts| ts.month_key())
    }

    /// Project the record onto the fixed CSV columns
    pub fn to_row(&self) -> UsageRow {
        UsageRow {
            account_sid: self.account_sid.as_ref().map(|sid| sid.to_string()),
            category: self.category.clone(),
            description: self.description.clone(),
            start_date: self.start_date.map(|ts| ts.to_calendar_date().to_string()),
            end_date: self.end_date.map(|ts| ts.to_calendar_date().to_string()),
            count: self.count.as_ref().map(|q| q.to_string()),
            count_unit: self.count_unit.clone(),
            usage: self.usage.as_ref().map(|q| q.to_string()),
            usage_unit: self.usage_unit.clone(),
            price: self.price.as_ref().map(|q| q.to_string()),
            price_unit: self.price_unit.clone(),
        }
    }
}

/// One data row of the output CSV
///
/// Field order is the column order; the serde names are the header titles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageRow {
    #[serde(rename = "Account SID")]
    pub account_sid: Option<String>,
    #[serde(rename = "Category")]
    pub category: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "Start Date")]
    pub start_date: Option<String>,
    #[serde(rename = "End Date")]
    pub end_date: Option<String>,
    #[serde(rename = "Count")]
    pub count: Option<String>,
    #[serde(rename = "Count Unit")]
    pub count_unit: Option<String>,
    #[serde(rename = "Usage")]
    pub usage: Option<String>,
    #[serde(rename = "Usage Unit")]
    pub usage_unit: Option<String>,
    #[serde(rename = "Price")]
    pub price: Option<String>,
    #[serde(rename = "Price Unit")]
    pub price_unit: Option<String>,
}

impl UsageRow {
    /// Column titles, in output order
    pub const HEADERS: [&'static str; 11] = [
        "Account SID",
        "Category",
        "Description",
        "Start Date",
        "End Date",
        "Count",
        "Count Unit",
        "Usage",
        "Usage Unit",
        "Price",
        "Price Unit",
    ];
}
