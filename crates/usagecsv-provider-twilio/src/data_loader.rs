//! Twilio usage records loader
//!
//! Streams `Usage/Records/Monthly` entries of one account. The endpoint is
//! paginated: every page carries a `next_page_uri` (relative to the API host)
//! until the last one, where it is null. Pages are requested only when the
//! consumer has drained the previous one, so at most one page is held in
//! memory.

use futures::stream::Stream;
use reqwest::StatusCode;
use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::pin::Pin;
use tracing::debug;
use usagecsv_core::config::{
    Credentials, DEFAULT_API_BASE_URL, DEFAULT_PAGE_SIZE, ExportConfig, MAX_PAGE_SIZE,
};
use usagecsv_core::error::{Result, UsagecsvError};
use usagecsv_core::provider::UsageSource;
use usagecsv_core::types::{AccountSid, ISOTimestamp, Quantity, UsageRecord};

/// REST API version segment of every resource path
const API_VERSION: &str = "2010-04-01";

/// Data loader for Twilio monthly usage records.
pub struct DataLoader {
    client: reqwest::Client,
    credentials: Credentials,
    base_url: String,
    page_size: u32,
}

impl DataLoader {
    /// Create a loader for the account identified by `credentials`
    ///
    /// Uses the public API host and the default page size.
    pub fn new(credentials: Credentials) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("usagecsv/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            client,
            credentials,
            base_url: DEFAULT_API_BASE_URL.to_string(),
            page_size: DEFAULT_PAGE_SIZE,
        })
    }

    /// Create a loader from a validated export configuration
    pub fn from_config(config: &ExportConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(config.credentials.clone())?
            .with_base_url(config.api_base_url.clone())
            .with_page_size(config.page_size))
    }

    /// Point the loader at another API host (used against local servers in tests)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Records per page, clamped to what the API accepts
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.clamp(1, MAX_PAGE_SIZE);
        self
    }

    fn first_page_url(&self) -> String {
        format!(
            "{}/{API_VERSION}/Accounts/{}/Usage/Records/Monthly.json?PageSize={}",
            self.base_url,
            self.credentials.account_sid(),
            self.page_size
        )
    }

    /// `next_page_uri` is host-relative; absolute URIs are used as-is
    fn resolve_page_uri(&self, uri: &str) -> String {
        if uri.starts_with("http://") || uri.starts_with("https://") {
            uri.to_string()
        } else {
            format!("{}{}", self.base_url, uri)
        }
    }

    async fn fetch_page(&self, url: &str) -> Result<UsagePage> {
        debug!("Fetching usage records page: {}", url);

        let response = self
            .client
            .get(url)
            .basic_auth(
                self.credentials.account_sid().as_str(),
                Some(self.credentials.auth_token()),
            )
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(api_error(status, &body));
        }

        Ok(serde_json::from_str(&body)?)
    }
}

impl UsageSource for DataLoader {
    fn account_sid(&self) -> &AccountSid {
        self.credentials.account_sid()
    }

    fn monthly_records(&self) -> Pin<Box<dyn Stream<Item = Result<UsageRecord>> + Send + '_>> {
        Box::pin(async_stream::try_stream! {
            let mut next_url = Some(self.first_page_url());
            let mut page_index = 0usize;

            while let Some(url) = next_url.take() {
                let page = self.fetch_page(&url).await?;
                debug!(
                    "Page {} returned {} usage records",
                    page_index,
                    page.usage_records.len()
                );

                next_url = page
                    .next_page_uri
                    .as_deref()
                    .filter(|uri| !uri.is_empty())
                    .map(|uri| self.resolve_page_uri(uri));

                for raw in page.usage_records {
                    yield raw.into_record()?;
                }

                page_index += 1;
            }
        })
    }
}

// ---------------------------------------------------------------------------
// Wire schema
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
struct UsagePage {
    #[serde(default)]
    usage_records: Vec<RawUsageRecord>,
    #[serde(default)]
    next_page_uri: Option<String>,
}

#[derive(Deserialize)]
struct RawUsageRecord {
    account_sid: Option<String>,
    category: Option<String>,
    description: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    count: Option<Quantity>,
    count_unit: Option<String>,
    usage: Option<Quantity>,
    usage_unit: Option<String>,
    price: Option<Quantity>,
    price_unit: Option<String>,
}

impl RawUsageRecord {
    fn into_record(self) -> Result<UsageRecord> {
        Ok(UsageRecord {
            account_sid: self.account_sid.map(AccountSid::new),
            category: self.category,
            description: self.description,
            start_date: parse_optional_date(self.start_date)?,
            end_date: parse_optional_date(self.end_date)?,
            count: self.count,
            count_unit: self.count_unit,
            usage: self.usage,
            usage_unit: self.usage_unit,
            price: self.price,
            price_unit: self.price_unit,
        })
    }
}

fn parse_optional_date(value: Option<String>) -> Result<Option<ISOTimestamp>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => ISOTimestamp::parse(s).map(Some),
    }
}

/// Error body returned by the REST API on failures
#[derive(Deserialize)]
struct ApiErrorBody {
    code: Option<u32>,
    message: Option<String>,
}

fn api_error(status: StatusCode, body: &str) -> UsagecsvError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed
        .and_then(|b| b.message)
        .or_else(|| status.canonical_reason().map(str::to_string))
        .unwrap_or_else(|| "request failed".to_string());

    UsagecsvError::Api {
        status: status.as_u16(),
        code,
        message,
    }
}
