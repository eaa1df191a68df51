//! In-memory provider.
//!
//! Serves series and metadata registered up front. Used by tests and by the
//! `--demo` mode of both front ends, which needs deterministic data without
//! network access.

use std::collections::HashMap;

use chrono::{Datelike, Duration, Months, NaiveDate, Weekday};
use tracing::debug;

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::domain::{MetadataRecord, PriceBar, PriceSeries, Ticker, TimeRange};

#[derive(Debug, Clone, Default)]
struct Entry {
    series: PriceSeries,
    metadata: MetadataRecord,
}

/// Provider backed by a fixed map of ticker to (full series, metadata).
///
/// `fetch` slices the stored series to the requested range, counted back
/// from the last stored bar. Unknown tickers yield an empty result.
#[derive(Debug, Clone, Default)]
pub struct StaticProvider {
    entries: HashMap<Ticker, Entry>,
}

impl StaticProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, ticker: Ticker, series: PriceSeries, metadata: MetadataRecord) {
        self.entries.insert(ticker, Entry { series, metadata });
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, ticker: Ticker, series: PriceSeries, metadata: MetadataRecord) -> Self {
        self.insert(ticker, series, metadata);
        self
    }

    /// Synthetic demo data for a handful of large caps.
    ///
    /// Five years of weekday bars ending 2024-12-31, generated with a
    /// seeded LCG so every run sees the same numbers.
    pub fn demo() -> Self {
        let end = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap_or_default();
        let mut provider = Self::new();
        for profile in DEMO_PROFILES {
            let Ok(ticker) = Ticker::parse(profile.symbol) else {
                continue;
            };
            let series = synthetic_series(end, 5 * 261, &profile);
            let metadata = synthetic_metadata(&series, &profile);
            provider.insert(ticker, series, metadata);
        }
        provider
    }
}

fn slice_to_range(series: &[PriceBar], range: TimeRange) -> PriceSeries {
    let (Some(months), Some(last)) = (range.months(), series.last()) else {
        return series.to_vec();
    };
    let start = last
        .date
        .checked_sub_months(Months::new(months))
        .unwrap_or(NaiveDate::MIN);
    series.iter().filter(|b| b.date > start).cloned().collect()
}

impl DataProvider for StaticProvider {
    fn name(&self) -> &str {
        "static"
    }

    fn fetch(&self, ticker: &Ticker, range: TimeRange) -> Result<FetchResult, DataError> {
        let entry = self.entries.get(ticker).cloned().unwrap_or_default();
        let series = slice_to_range(&entry.series, range);
        debug!(symbol = ticker.as_str(), range = range.token(), rows = series.len(), "static fetch");
        Ok(FetchResult {
            ticker: ticker.clone(),
            series,
            metadata: entry.metadata,
            source: DataSource::Static,
        })
    }
}

// ─── Demo data ──────────────────────────────────────────────────────

struct DemoProfile {
    symbol: &'static str,
    name: &'static str,
    summary: &'static str,
    start_price: f64,
    drift: f64,
    volatility: f64,
    seed: u64,
    shares_outstanding: f64,
    eps: f64,
    forward_eps: f64,
    dividend_per_share: f64,
    beta: f64,
    peg: f64,
}

const DEMO_PROFILES: [DemoProfile; 3] = [
    DemoProfile {
        symbol: "AAPL",
        name: "Apple Inc.",
        summary: "Designs, manufactures and markets smartphones, personal computers, \
                  tablets, wearables and accessories, and sells a range of related services.",
        start_price: 75.0,
        drift: 0.0009,
        volatility: 0.018,
        seed: 42,
        shares_outstanding: 15.1e9,
        eps: 6.08,
        forward_eps: 7.35,
        dividend_per_share: 1.0,
        beta: 1.24,
        peg: 2.1,
    },
    DemoProfile {
        symbol: "MSFT",
        name: "Microsoft Corporation",
        summary: "Develops and supports software, services, devices and solutions \
                  worldwide, including cloud platforms, productivity software and gaming.",
        start_price: 160.0,
        drift: 0.0008,
        volatility: 0.016,
        seed: 7,
        shares_outstanding: 7.43e9,
        eps: 12.12,
        forward_eps: 14.0,
        dividend_per_share: 3.32,
        beta: 0.9,
        peg: 2.3,
    },
    DemoProfile {
        symbol: "GOOGL",
        name: "Alphabet Inc.",
        summary: "Provides online advertising, search, cloud computing, hardware and \
                  other services through its Google and Other Bets segments.",
        start_price: 68.0,
        drift: 0.0007,
        volatility: 0.019,
        seed: 1234,
        shares_outstanding: 12.2e9,
        eps: 8.04,
        forward_eps: 9.1,
        dividend_per_share: 0.8,
        beta: 1.03,
        peg: 1.4,
    },
];

/// Deterministic pseudo-random in [-1, 1].
fn next_noise(state: &mut u64) -> f64 {
    *state = state
        .wrapping_mul(6364136223846793005)
        .wrapping_add(1442695040888963407);
    ((*state >> 33) as f64) / (u32::MAX as f64) * 2.0 - 1.0
}

fn synthetic_series(end: NaiveDate, trading_days: usize, profile: &DemoProfile) -> PriceSeries {
    let mut dates = Vec::with_capacity(trading_days);
    let mut date = end;
    while dates.len() < trading_days {
        if !matches!(date.weekday(), Weekday::Sat | Weekday::Sun) {
            dates.push(date);
        }
        date -= Duration::days(1);
    }
    dates.reverse();

    let mut state = profile.seed;
    let mut close = profile.start_price;
    let quarterly_dividend = profile.dividend_per_share / 4.0;

    dates
        .into_iter()
        .enumerate()
        .map(|(i, date)| {
            let open = close * (1.0 + 0.004 * next_noise(&mut state));
            close *= 1.0 + profile.drift + profile.volatility * next_noise(&mut state);
            close = close.max(1.0);
            let spread = close * (0.006 + 0.004 * next_noise(&mut state).abs());
            let high = open.max(close) + spread;
            let low = (open.min(close) - spread).max(0.5);
            let volume = (50_000_000.0 * (1.0 + 0.4 * next_noise(&mut state))) as u64;
            let dividends = if i % 63 == 40 { quarterly_dividend } else { 0.0 };

            PriceBar {
                date,
                open,
                high,
                low,
                close,
                volume,
                dividends,
                stock_splits: 0.0,
            }
        })
        .collect()
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

fn synthetic_metadata(series: &[PriceBar], profile: &DemoProfile) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    let Some(last) = series.last() else {
        return record;
    };
    let tail = |n: usize| &series[series.len().saturating_sub(n)..];
    let price = last.close;

    record.insert("shortName", profile.name);
    record.insert("longName", profile.name);
    record.insert("currency", "USD");
    record.insert("longBusinessSummary", profile.summary);
    record.insert("currentPrice", price);
    if let Some(prev) = series.len().checked_sub(2).map(|i| series[i].close) {
        record.insert("previousClose", prev);
    }
    record.insert("marketCap", price * profile.shares_outstanding);
    record.insert("trailingEps", profile.eps);
    record.insert("trailingPE", price / profile.eps);
    record.insert("forwardPE", price / profile.forward_eps);
    record.insert("pegRatio", profile.peg);
    record.insert("beta", profile.beta);
    record.insert("dividendYield", profile.dividend_per_share / price);

    let year = tail(252);
    if let Some(high) = year.iter().map(|b| b.high).reduce(f64::max) {
        record.insert("fiftyTwoWeekHigh", high);
    }
    if let Some(low) = year.iter().map(|b| b.low).reduce(f64::min) {
        record.insert("fiftyTwoWeekLow", low);
    }
    if let Some(avg) = mean(tail(50).iter().map(|b| b.close)) {
        record.insert("fiftyDayAverage", avg);
    }
    if let Some(avg) = mean(tail(200).iter().map(|b| b.close)) {
        record.insert("twoHundredDayAverage", avg);
    }
    record.insert("volume", last.volume as f64);
    if let Some(avg) = mean(tail(90).iter().map(|b| b.volume as f64)) {
        record.insert("averageVolume", avg.round());
    }
    record
}
