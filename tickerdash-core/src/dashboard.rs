//! One request, one response: fetch a ticker and derive everything the
//! dashboard shows.

use chrono::{DateTime, Local};
use tracing::{info, warn};

use crate::chart::PriceChart;
use crate::data::{DataProvider, DataSource};
use crate::domain::{MetadataRecord, PriceSeries, Ticker, TimeRange};
use crate::metrics::{derive_metrics, summarize_quote, MetricsTable, QuoteSummary};

pub const NO_BUSINESS_SUMMARY: &str = "No information available";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardRequest {
    pub ticker: Ticker,
    pub range: TimeRange,
}

impl DashboardRequest {
    pub fn new(ticker: Ticker, range: TimeRange) -> Self {
        Self { ticker, range }
    }
}

/// Everything a front end renders for a successful load.
#[derive(Debug, Clone)]
pub struct Dashboard {
    pub ticker: Ticker,
    pub range: TimeRange,
    pub quote: QuoteSummary,
    pub series: PriceSeries,
    pub metadata: MetadataRecord,
    pub metrics: MetricsTable,
    pub chart: PriceChart,
    pub business_summary: String,
    pub source: DataSource,
    pub fetched_at: DateTime<Local>,
}

impl Dashboard {
    /// `Data provided by Yahoo Finance. Updated at: 2024-05-01 16:00:00`
    pub fn footer(&self) -> String {
        format!(
            "Data provided by {}. Updated at: {}",
            self.source.attribution(),
            self.fetched_at.format("%Y-%m-%d %H:%M:%S")
        )
    }
}

#[derive(Debug, Clone)]
pub enum DashboardOutcome {
    Ready(Box<Dashboard>),
    /// The provider answered, but with no bars or no metadata.
    Empty { ticker: Ticker },
    Failed { ticker: Ticker, message: String },
}

impl DashboardOutcome {
    pub fn ticker(&self) -> &Ticker {
        match self {
            DashboardOutcome::Ready(d) => &d.ticker,
            DashboardOutcome::Empty { ticker } | DashboardOutcome::Failed { ticker, .. } => ticker,
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match self {
            DashboardOutcome::Ready(d) => Some(d),
            _ => None,
        }
    }

    /// User-facing text for the non-ready states.
    pub fn notice(&self) -> Option<String> {
        match self {
            DashboardOutcome::Ready(_) => None,
            DashboardOutcome::Empty { ticker } => Some(empty_message(ticker)),
            DashboardOutcome::Failed { ticker, message } => Some(error_message(ticker, message)),
        }
    }
}

pub fn error_message(ticker: &Ticker, message: &str) -> String {
    format!("Error retrieving data for {ticker}: {message}")
}

pub fn empty_message(ticker: &Ticker) -> String {
    format!("No data found for symbol: {ticker}. Please check if the symbol is correct.")
}

/// Run one fetch and build the dashboard. Never panics and never retries;
/// every failure comes back as a [`DashboardOutcome`].
pub fn load_dashboard(provider: &dyn DataProvider, request: &DashboardRequest) -> DashboardOutcome {
    let ticker = request.ticker.clone();

    let fetched = match provider.fetch(&ticker, request.range) {
        Ok(fetched) => fetched,
        Err(e) => {
            warn!(symbol = ticker.as_str(), provider = provider.name(), error = %e, "fetch failed");
            return DashboardOutcome::Failed {
                ticker,
                message: e.to_string(),
            };
        }
    };

    if fetched.series.is_empty() || fetched.metadata.is_empty() {
        info!(symbol = ticker.as_str(), "no data for symbol");
        return DashboardOutcome::Empty { ticker };
    }

    let quote = summarize_quote(&ticker, &fetched.metadata, &fetched.series);
    let metrics = derive_metrics(&fetched.metadata);
    let chart = PriceChart::build(&ticker, &fetched.series);
    let business_summary = fetched
        .metadata
        .text("longBusinessSummary")
        .filter(|s| !s.trim().is_empty())
        .unwrap_or(NO_BUSINESS_SUMMARY)
        .to_string();

    DashboardOutcome::Ready(Box::new(Dashboard {
        ticker,
        range: request.range,
        quote,
        series: fetched.series,
        metadata: fetched.metadata,
        metrics,
        chart,
        business_summary,
        source: fetched.source,
        fetched_at: Local::now(),
    }))
}
