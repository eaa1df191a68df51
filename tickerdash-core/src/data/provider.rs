//! Data provider trait and structured error types.
//!
//! The DataProvider trait abstracts over data sources (Yahoo Finance, the
//! in-memory demo provider) so the dashboard pipeline can be driven by a
//! mock in tests.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::{MetadataRecord, PriceSeries, Ticker, TimeRange};

/// Structured error types for data operations.
///
/// The `Display` text is what the dashboard shows after
/// "Error retrieving data for ...", so keep it readable.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("network unreachable: {0}")]
    NetworkUnreachable(String),

    #[error("rate limited by provider (retry after {retry_after_secs}s)")]
    RateLimited { retry_after_secs: u64 },

    #[error("authentication required: {0}")]
    AuthenticationRequired(String),

    #[error("HTTP {status} for {symbol}")]
    Http { status: u16, symbol: String },

    #[error("response format changed: {0}")]
    ResponseFormatChanged(String),

    #[error("data error: {0}")]
    Other(String),
}

/// Where the data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DataSource {
    YahooFinance,
    Static,
}

impl DataSource {
    pub fn attribution(self) -> &'static str {
        match self {
            DataSource::YahooFinance => "Yahoo Finance",
            DataSource::Static => "built-in demo data",
        }
    }
}

/// Result of a successful fetch. An empty `series` or `metadata` is a
/// valid answer (unknown symbol), not an error.
#[derive(Debug, Clone)]
pub struct FetchResult {
    pub ticker: Ticker,
    pub series: PriceSeries,
    pub metadata: MetadataRecord,
    pub source: DataSource,
}

/// Trait for data providers.
///
/// Each call is an independent round trip: implementations do not retry and
/// do not cache data between calls.
pub trait DataProvider: Send + Sync {
    /// Human-readable name of this provider.
    fn name(&self) -> &str;

    /// Fetch the daily series for `range` plus the current metadata record.
    fn fetch(&self, ticker: &Ticker, range: TimeRange) -> Result<FetchResult, DataError>;
}
