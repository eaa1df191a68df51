//! Yahoo Finance data provider.
//!
//! Two endpoints per fetch:
//! - v8 chart API for the daily OHLCV series (with dividend/split events)
//! - v10 quoteSummary API for the metadata record, which needs a cookie and
//!   a crumb token obtained once per provider
//!
//! Yahoo Finance has no official API and is subject to unannounced format
//! changes. Parsing is split from HTTP so it can be tested against frozen
//! response bodies.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use chrono::NaiveDate;
use reqwest::blocking::{Client, Response};
use reqwest::{StatusCode, Url};
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};

use super::provider::{DataError, DataProvider, DataSource, FetchResult};
use crate::config::ProviderSettings;
use crate::domain::{MetadataRecord, MetadataValue, PriceBar, Ticker, TimeRange};

const CHART_BASE: &str = "https://query2.finance.yahoo.com/v8/finance/chart";
const QUOTE_SUMMARY_BASE: &str = "https://query2.finance.yahoo.com/v10/finance/quoteSummary";
const COOKIE_URL: &str = "https://fc.yahoo.com";
const CRUMB_URL: &str = "https://query1.finance.yahoo.com/v1/test/getcrumb";
const QUOTE_MODULES: &str = "price,summaryDetail,defaultKeyStatistics,financialData,assetProfile";

// ─── Chart API response ─────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    code: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    meta: Option<ChartMeta>,
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
    events: Option<ChartEvents>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ChartMeta {
    gmtoffset: Option<i64>,
    currency: Option<String>,
    short_name: Option<String>,
    long_name: Option<String>,
    regular_market_price: Option<f64>,
    regular_market_volume: Option<f64>,
    previous_close: Option<f64>,
    fifty_two_week_high: Option<f64>,
    fifty_two_week_low: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
    adjclose: Option<Vec<AdjCloseData>>,
}

#[derive(Debug, Deserialize)]
struct QuoteData {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<u64>>,
}

#[derive(Debug, Deserialize)]
struct AdjCloseData {
    adjclose: Vec<Option<f64>>,
}

#[derive(Debug, Deserialize)]
struct ChartEvents {
    dividends: Option<HashMap<String, DividendEvent>>,
    splits: Option<HashMap<String, SplitEvent>>,
}

#[derive(Debug, Deserialize)]
struct DividendEvent {
    amount: f64,
    date: i64,
}

#[derive(Debug, Deserialize)]
struct SplitEvent {
    numerator: f64,
    denominator: f64,
    date: i64,
}

/// Parsed chart response: bars plus the metadata keys the chart `meta`
/// block carries.
#[derive(Debug, Default)]
struct ChartParts {
    pub bars: Vec<PriceBar>,
    pub metadata: MetadataRecord,
}

fn local_date(ts: i64, gmtoffset: i64) -> Result<NaiveDate, DataError> {
    chrono::DateTime::from_timestamp(ts + gmtoffset, 0)
        .map(|dt| dt.naive_utc().date())
        .ok_or_else(|| DataError::ResponseFormatChanged(format!("invalid timestamp: {ts}")))
}

/// Parse the chart API response into bars.
///
/// A `Not Found` error, or a result with no timestamps, is an empty series.
fn parse_chart(
    symbol: &str,
    resp: ChartResponse,
    auto_adjust: bool,
) -> Result<ChartParts, DataError> {
    let Some(result) = resp.chart.result else {
        return match resp.chart.error {
            Some(err) if err.code == "Not Found" => {
                debug!(symbol, "chart API reports symbol not found");
                Ok(ChartParts::default())
            }
            Some(err) => Err(DataError::ResponseFormatChanged(format!(
                "{}: {}",
                err.code,
                err.description.unwrap_or_default()
            ))),
            None => Err(DataError::ResponseFormatChanged(
                "empty result with no error".into(),
            )),
        };
    };

    let Some(data) = result.into_iter().next() else {
        return Ok(ChartParts::default());
    };

    let meta = data.meta.unwrap_or_default();
    let gmtoffset = meta.gmtoffset.unwrap_or(0);
    let metadata = meta_record(&meta);

    let Some(timestamps) = data.timestamp else {
        return Ok(ChartParts {
            bars: Vec::new(),
            metadata,
        });
    };

    let quote = data
        .indicators
        .quote
        .into_iter()
        .next()
        .ok_or_else(|| DataError::ResponseFormatChanged("no quote data".into()))?;

    let adj_closes = data
        .indicators
        .adjclose
        .and_then(|v| v.into_iter().next())
        .map(|a| a.adjclose);

    let mut dividends: HashMap<NaiveDate, f64> = HashMap::new();
    let mut splits: HashMap<NaiveDate, f64> = HashMap::new();
    if let Some(events) = data.events {
        for ev in events.dividends.into_iter().flat_map(|m| m.into_values()) {
            *dividends.entry(local_date(ev.date, gmtoffset)?).or_default() += ev.amount;
        }
        for ev in events.splits.into_iter().flat_map(|m| m.into_values()) {
            if ev.denominator != 0.0 {
                splits.insert(local_date(ev.date, gmtoffset)?, ev.numerator / ev.denominator);
            }
        }
    }

    let mut bars = Vec::with_capacity(timestamps.len());
    for (i, &ts) in timestamps.iter().enumerate() {
        let date = local_date(ts, gmtoffset)?;

        let open = quote.open.get(i).copied().flatten();
        let high = quote.high.get(i).copied().flatten();
        let low = quote.low.get(i).copied().flatten();
        let close = quote.close.get(i).copied().flatten();
        let volume = quote.volume.get(i).copied().flatten();

        // Skip rows where all OHLCV are None (holidays/non-trading days)
        if open.is_none() && high.is_none() && low.is_none() && close.is_none() && volume.is_none()
        {
            continue;
        }

        let mut bar = PriceBar {
            date,
            open: open.unwrap_or(f64::NAN),
            high: high.unwrap_or(f64::NAN),
            low: low.unwrap_or(f64::NAN),
            close: close.unwrap_or(f64::NAN),
            volume: volume.unwrap_or(0),
            dividends: dividends.get(&date).copied().unwrap_or(0.0),
            stock_splits: splits.get(&date).copied().unwrap_or(0.0),
        };

        if auto_adjust {
            let adj = adj_closes.as_ref().and_then(|v| v.get(i).copied().flatten());
            if let Some(adj) = adj {
                if bar.close.is_finite() && bar.close != 0.0 {
                    let ratio = adj / bar.close;
                    bar.open *= ratio;
                    bar.high *= ratio;
                    bar.low *= ratio;
                    bar.close = adj;
                }
            }
        }

        bars.push(bar);
    }

    bars.sort_by_key(|b| b.date);
    Ok(ChartParts { bars, metadata })
}

fn meta_record(meta: &ChartMeta) -> MetadataRecord {
    let mut record = MetadataRecord::new();
    let numbers = [
        ("currentPrice", meta.regular_market_price),
        ("previousClose", meta.previous_close),
        ("fiftyTwoWeekHigh", meta.fifty_two_week_high),
        ("fiftyTwoWeekLow", meta.fifty_two_week_low),
        ("volume", meta.regular_market_volume),
    ];
    for (key, value) in numbers {
        if let Some(v) = value {
            record.insert(key, v);
        }
    }
    let texts = [
        ("shortName", &meta.short_name),
        ("longName", &meta.long_name),
        ("currency", &meta.currency),
    ];
    for (key, value) in texts {
        if let Some(v) = value {
            record.insert(key, v.as_str());
        }
    }
    record
}

// ─── quoteSummary API response ──────────────────────────────────────

/// Flatten one quoteSummary field. Yahoo wraps numbers as
/// `{"raw": 1.5, "fmt": "1.50"}`; empty objects mean "no value".
fn flatten_value(value: &Value) -> Option<MetadataValue> {
    match value {
        Value::Number(n) => n.as_f64().map(MetadataValue::Number),
        Value::String(s) => Some(MetadataValue::Text(s.clone())),
        Value::Bool(b) => Some(MetadataValue::Text(b.to_string())),
        Value::Object(obj) => match obj.get("raw") {
            Some(Value::Number(n)) => n.as_f64().map(MetadataValue::Number),
            _ => obj
                .get("fmt")
                .and_then(Value::as_str)
                .map(|s| MetadataValue::Text(s.to_string())),
        },
        Value::Null | Value::Array(_) => None,
    }
}

/// Merge the requested modules of a quoteSummary response into one flat
/// record. Modules are read in `QUOTE_MODULES` order and later ones
/// override earlier ones on key collisions.
fn parse_quote_summary(body: &Value) -> Result<MetadataRecord, DataError> {
    let summary = body
        .get("quoteSummary")
        .ok_or_else(|| DataError::ResponseFormatChanged("missing quoteSummary".into()))?;

    let result = match summary.get("result") {
        Some(Value::Array(items)) => items.first(),
        _ => None,
    };

    let Some(result) = result else {
        let code = summary
            .pointer("/error/code")
            .and_then(Value::as_str)
            .unwrap_or("unknown");
        if code == "Not Found" {
            return Ok(MetadataRecord::new());
        }
        let description = summary
            .pointer("/error/description")
            .and_then(Value::as_str)
            .unwrap_or_default();
        return Err(DataError::ResponseFormatChanged(format!("{code}: {description}")));
    };

    let modules = result
        .as_object()
        .ok_or_else(|| DataError::ResponseFormatChanged("quoteSummary result is not an object".into()))?;

    let mut record = MetadataRecord::new();
    let requested = QUOTE_MODULES.split(',').filter_map(|name| modules.get(name));
    for module in requested.filter_map(Value::as_object) {
        for (key, value) in module {
            if key == "maxAge" {
                continue;
            }
            if let Some(v) = flatten_value(value) {
                record.insert(key.as_str(), v);
            }
        }
    }
    Ok(record)
}

// ─── Provider ───────────────────────────────────────────────────────

/// Yahoo Finance data provider.
pub struct YahooProvider {
    client: Client,
    auto_adjust: bool,
    crumb: Mutex<Option<String>>,
}

impl YahooProvider {
    pub fn new(settings: &ProviderSettings) -> Result<Self, DataError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .cookie_store(true)
            .build()
            .map_err(|e| DataError::Other(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            auto_adjust: settings.auto_adjust,
            crumb: Mutex::new(None),
        })
    }

    fn endpoint(base: &str, symbol: &str) -> Result<Url, DataError> {
        let mut url =
            Url::parse(base).map_err(|e| DataError::Other(format!("bad endpoint {base}: {e}")))?;
        url.path_segments_mut()
            .map_err(|_| DataError::Other(format!("endpoint {base} cannot take a path")))?
            .push(symbol);
        Ok(url)
    }

    /// Build the chart API URL for a symbol and range.
    fn chart_url(symbol: &str, range: TimeRange) -> Result<Url, DataError> {
        let mut url = Self::endpoint(CHART_BASE, symbol)?;
        url.query_pairs_mut()
            .append_pair("range", range.token())
            .append_pair("interval", "1d")
            .append_pair("events", "div,splits")
            .append_pair("includeAdjustedClose", "true");
        Ok(url)
    }

    fn quote_summary_url(symbol: &str, crumb: &str) -> Result<Url, DataError> {
        let mut url = Self::endpoint(QUOTE_SUMMARY_BASE, symbol)?;
        url.query_pairs_mut()
            .append_pair("modules", QUOTE_MODULES)
            .append_pair("crumb", crumb);
        Ok(url)
    }

    fn send(&self, url: Url) -> Result<Response, reqwest::Error> {
        debug!(%url, "GET");
        self.client.get(url).send()
    }

    /// Map non-success statuses to structured errors. `404` passes through
    /// because Yahoo answers unknown symbols with a JSON body and 404.
    fn check_status(symbol: &str, resp: Response) -> Result<Response, DataError> {
        let status = resp.status();
        if status.is_success() || status == StatusCode::NOT_FOUND {
            return Ok(resp);
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            let retry_after = resp
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(60);
            return Err(DataError::RateLimited {
                retry_after_secs: retry_after,
            });
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(DataError::AuthenticationRequired(format!(
                "Yahoo Finance refused the request ({status})"
            )));
        }

        Err(DataError::Http {
            status: status.as_u16(),
            symbol: symbol.to_string(),
        })
    }

    fn fetch_chart(&self, symbol: &str, range: TimeRange) -> Result<ChartParts, DataError> {
        let resp = self
            .send(Self::chart_url(symbol, range)?)
            .map_err(transport_error)?;
        let resp = Self::check_status(symbol, resp)?;
        let chart: ChartResponse = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse chart for {symbol}: {e}"))
        })?;
        parse_chart(symbol, chart, self.auto_adjust)
    }

    /// Cookie + crumb handshake, done once and reused for the provider's
    /// lifetime.
    fn crumb(&self) -> Result<String, DataError> {
        let mut guard = self.crumb.lock().unwrap_or_else(|e| e.into_inner());
        if let Some(crumb) = guard.as_ref() {
            return Ok(crumb.clone());
        }

        // Only the Set-Cookie header matters; fc.yahoo.com answers 404.
        if let Ok(url) = Url::parse(COOKIE_URL) {
            let _ = self.send(url);
        }

        let url = Url::parse(CRUMB_URL).map_err(|e| DataError::Other(e.to_string()))?;
        let resp = self.send(url).map_err(transport_error)?;
        let resp = Self::check_status("crumb", resp)?;
        let crumb = resp
            .text()
            .map_err(|e| DataError::ResponseFormatChanged(format!("crumb body: {e}")))?
            .trim()
            .to_string();

        if crumb.is_empty() || crumb.contains('<') || crumb.contains(' ') {
            return Err(DataError::AuthenticationRequired(
                "Yahoo Finance did not issue a crumb".into(),
            ));
        }

        *guard = Some(crumb.clone());
        Ok(crumb)
    }

    /// A rejected crumb is dropped so the next fetch repeats the handshake.
    fn note_summary_error(&self, err: &DataError) {
        if matches!(err, DataError::AuthenticationRequired(_)) {
            let mut guard = self.crumb.lock().unwrap_or_else(|e| e.into_inner());
            if guard.take().is_some() {
                debug!("cached crumb rejected, cleared");
            }
        }
    }

    fn fetch_quote_summary(&self, symbol: &str) -> Result<MetadataRecord, DataError> {
        let result = self.request_quote_summary(symbol);
        if let Err(e) = &result {
            self.note_summary_error(e);
        }
        result
    }

    fn request_quote_summary(&self, symbol: &str) -> Result<MetadataRecord, DataError> {
        let crumb = self.crumb()?;
        let resp = self
            .send(Self::quote_summary_url(symbol, &crumb)?)
            .map_err(transport_error)?;
        let resp = Self::check_status(symbol, resp)?;
        let body: Value = resp.json().map_err(|e| {
            DataError::ResponseFormatChanged(format!("failed to parse quoteSummary for {symbol}: {e}"))
        })?;
        parse_quote_summary(&body)
    }
}

fn transport_error(e: reqwest::Error) -> DataError {
    DataError::NetworkUnreachable(e.to_string())
}

impl DataProvider for YahooProvider {
    fn name(&self) -> &str {
        "yahoo_finance"
    }

    fn fetch(&self, ticker: &Ticker, range: TimeRange) -> Result<FetchResult, DataError> {
        let symbol = ticker.as_str();
        info!(symbol, range = range.token(), "fetching chart");

        let chart = self.fetch_chart(symbol, range)?;
        let mut metadata = chart.metadata;

        if !chart.bars.is_empty() {
            match self.fetch_quote_summary(symbol) {
                Ok(summary) => metadata.merge(summary),
                Err(e) => {
                    warn!(symbol, error = %e, "quoteSummary unavailable, using chart metadata only");
                }
            }
        }

        info!(
            symbol,
            rows = chart.bars.len(),
            metadata_keys = metadata.len(),
            "fetch complete"
        );

        Ok(FetchResult {
            ticker: ticker.clone(),
            series: chart.bars,
            metadata,
            source: DataSource::YahooFinance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn chart_fixture() -> ChartResponse {
        // 2024-03-14, 2024-03-15 (holiday row), 2024-03-18; NY offset -4h
        serde_json::from_value(json!({
            "chart": {
                "result": [{
                    "meta": {
                        "currency": "USD",
                        "symbol": "AAPL",
                        "gmtoffset": -14400,
                        "regularMarketPrice": 173.72,
                        "regularMarketVolume": 75604184,
                        "fiftyTwoWeekHigh": 199.62,
                        "fiftyTwoWeekLow": 164.08,
                        "shortName": "Apple Inc.",
                        "longName": "Apple Inc."
                    },
                    "timestamp": [1710423000, 1710509400, 1710768600],
                    "events": {
                        "dividends": {
                            "1710768600": { "amount": 0.24, "date": 1710768600 }
                        },
                        "splits": {
                            "1710423000": { "numerator": 4.0, "denominator": 1.0, "date": 1710423000, "splitRatio": "4:1" }
                        }
                    },
                    "indicators": {
                        "quote": [{
                            "open":   [172.91, null, 175.57],
                            "high":   [174.31, null, 177.71],
                            "low":    [172.05, null, 173.52],
                            "close":  [173.00, null, 173.72],
                            "volume": [72913500, null, 75604200]
                        }],
                        "adjclose": [{ "adjclose": [86.50, null, 173.72] }]
                    }
                }],
                "error": null
            }
        }))
        .unwrap()
    }

    #[test]
    fn parses_bars_and_skips_empty_rows() {
        let parts = parse_chart("AAPL", chart_fixture(), false).unwrap();
        assert_eq!(parts.bars.len(), 2);
        assert_eq!(parts.bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(parts.bars[1].date, NaiveDate::from_ymd_opt(2024, 3, 18).unwrap());
        assert_eq!(parts.bars[0].close, 173.00);
        assert_eq!(parts.bars[1].volume, 75_604_200);
    }

    #[test]
    fn joins_dividend_and_split_events() {
        let parts = parse_chart("AAPL", chart_fixture(), false).unwrap();
        assert_eq!(parts.bars[0].stock_splits, 4.0);
        assert_eq!(parts.bars[0].dividends, 0.0);
        assert_eq!(parts.bars[1].dividends, 0.24);
        assert_eq!(parts.bars[1].stock_splits, 0.0);
    }

    #[test]
    fn auto_adjust_scales_ohlc() {
        let parts = parse_chart("AAPL", chart_fixture(), true).unwrap();
        let bar = &parts.bars[0];
        assert!((bar.close - 86.50).abs() < 1e-9);
        assert!((bar.open - 172.91 * 0.5).abs() < 1e-9);
        assert!((bar.high - 174.31 * 0.5).abs() < 1e-9);
    }

    #[test]
    fn chart_meta_seeds_metadata() {
        let parts = parse_chart("AAPL", chart_fixture(), false).unwrap();
        assert_eq!(parts.metadata.number("currentPrice"), Some(173.72));
        assert_eq!(parts.metadata.number("fiftyTwoWeekHigh"), Some(199.62));
        assert_eq!(parts.metadata.text("shortName"), Some("Apple Inc."));
        assert!(parts.metadata.get("previousClose").is_absent());
    }

    #[test]
    fn not_found_is_empty_series() {
        let resp: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": null,
                "error": { "code": "Not Found", "description": "No data found, symbol may be delisted" }
            }
        }))
        .unwrap();
        let parts = parse_chart("ZZZZINVALID", resp, true).unwrap();
        assert!(parts.bars.is_empty());
        assert!(parts.metadata.is_empty());
    }

    #[test]
    fn other_chart_errors_surface() {
        let resp: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": null,
                "error": { "code": "Bad Request", "description": "Invalid input - interval=1d is not supported" }
            }
        }))
        .unwrap();
        let err = parse_chart("AAPL", resp, true).unwrap_err();
        assert!(err.to_string().contains("Bad Request"));
    }

    #[test]
    fn missing_timestamps_is_empty_series() {
        let resp: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": 0 },
                    "indicators": { "quote": [{}] }
                }],
                "error": null
            }
        }))
        .unwrap();
        assert!(parse_chart("NEWIPO", resp, true).unwrap().bars.is_empty());
    }

    #[test]
    fn flattens_raw_wrappers() {
        assert_eq!(
            flatten_value(&json!({"raw": 1.5, "fmt": "1.50"})),
            Some(MetadataValue::Number(1.5))
        );
        assert_eq!(flatten_value(&json!({})), None);
        assert_eq!(
            flatten_value(&json!({"fmt": "N/A"})),
            Some(MetadataValue::Text("N/A".into()))
        );
        assert_eq!(flatten_value(&json!("Apple Inc.")), Some(MetadataValue::Text("Apple Inc.".into())));
        assert_eq!(flatten_value(&json!(42)), Some(MetadataValue::Number(42.0)));
        assert_eq!(flatten_value(&json!(null)), None);
        assert_eq!(flatten_value(&json!([1, 2])), None);
    }

    #[test]
    fn quote_summary_merges_modules() {
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "price": {
                        "maxAge": 1,
                        "shortName": "Apple Inc.",
                        "marketCap": { "raw": 2.68e12, "fmt": "2.68T" }
                    },
                    "summaryDetail": {
                        "trailingPE": { "raw": 27.03, "fmt": "27.03" },
                        "dividendYield": { "raw": 0.0055, "fmt": "0.55%" },
                        "forwardPE": {}
                    },
                    "assetProfile": {
                        "longBusinessSummary": "Apple Inc. designs, manufactures...",
                        "companyOfficers": []
                    }
                }],
                "error": null
            }
        });
        let record = parse_quote_summary(&body).unwrap();
        assert_eq!(record.number("marketCap"), Some(2.68e12));
        assert_eq!(record.number("trailingPE"), Some(27.03));
        assert_eq!(record.number("dividendYield"), Some(0.0055));
        assert!(record.get("forwardPE").is_absent());
        assert!(record.get("maxAge").is_absent());
        assert!(record.get("companyOfficers").is_absent());
        assert!(record.text("longBusinessSummary").is_some());
    }

    #[test]
    fn quote_summary_not_found_is_empty() {
        let body = json!({
            "quoteSummary": {
                "result": null,
                "error": { "code": "Not Found", "description": "Quote not found for symbol: ZZZZ" }
            }
        });
        assert!(parse_quote_summary(&body).unwrap().is_empty());
    }

    #[test]
    fn dates_follow_exchange_offset() {
        // 2024-03-15 00:00 UTC is still 2024-03-14 in New York
        let resp: ChartResponse = serde_json::from_value(json!({
            "chart": {
                "result": [{
                    "meta": { "gmtoffset": -14400 },
                    "timestamp": [1710460800],
                    "events": {
                        "dividends": {
                            "1710460800": { "amount": 0.5, "date": 1710460800 }
                        }
                    },
                    "indicators": {
                        "quote": [{
                            "open": [10.0], "high": [11.0], "low": [9.0],
                            "close": [10.5], "volume": [1000]
                        }]
                    }
                }],
                "error": null
            }
        }))
        .unwrap();
        let parts = parse_chart("TEST", resp, false).unwrap();
        assert_eq!(parts.bars.len(), 1);
        assert_eq!(parts.bars[0].date, NaiveDate::from_ymd_opt(2024, 3, 14).unwrap());
        assert_eq!(parts.bars[0].dividends, 0.5);
    }

    #[test]
    fn later_modules_win_in_request_order() {
        // alphabetical order would put `price` last
        let body = json!({
            "quoteSummary": {
                "result": [{
                    "financialData": { "currentPrice": { "raw": 2.0, "fmt": "2.00" } },
                    "price": { "currentPrice": { "raw": 1.0, "fmt": "1.00" } },
                    "earnings": { "currentPrice": { "raw": 3.0, "fmt": "3.00" } }
                }],
                "error": null
            }
        });
        let record = parse_quote_summary(&body).unwrap();
        assert_eq!(record.number("currentPrice"), Some(2.0));
    }

    fn response(status: u16, retry_after: Option<&str>) -> Response {
        let mut builder = http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("retry-after", value);
        }
        Response::from(builder.body("").unwrap())
    }

    #[test]
    fn success_and_not_found_pass_through() {
        let ok = YahooProvider::check_status("AAPL", response(200, None)).unwrap();
        assert_eq!(ok.status(), StatusCode::OK);
        let missing = YahooProvider::check_status("ZZZZ", response(404, None)).unwrap();
        assert_eq!(missing.status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn rate_limit_reads_retry_after() {
        let cases = [(Some("120"), 120), (None, 60), (Some("soon"), 60)];
        for (header, expected) in cases {
            let err = YahooProvider::check_status("AAPL", response(429, header)).unwrap_err();
            assert!(
                matches!(err, DataError::RateLimited { retry_after_secs } if retry_after_secs == expected),
                "{header:?}: {err}"
            );
        }
    }

    #[test]
    fn auth_and_other_statuses_map_to_errors() {
        for status in [401, 403] {
            let err = YahooProvider::check_status("AAPL", response(status, None)).unwrap_err();
            assert!(matches!(err, DataError::AuthenticationRequired(_)), "{status}: {err}");
        }
        let err = YahooProvider::check_status("AAPL", response(500, None)).unwrap_err();
        assert!(matches!(err, DataError::Http { status: 500, ref symbol } if symbol == "AAPL"));
        assert_eq!(err.to_string(), "HTTP 500 for AAPL");
    }

    fn cached_crumb(provider: &YahooProvider) -> Option<String> {
        provider.crumb.lock().unwrap().clone()
    }

    #[test]
    fn rejected_crumb_is_forgotten() {
        let provider = YahooProvider::new(&ProviderSettings::default()).unwrap();
        *provider.crumb.lock().unwrap() = Some("abc123".into());

        provider.note_summary_error(&DataError::NetworkUnreachable("timed out".into()));
        provider.note_summary_error(&DataError::Http { status: 500, symbol: "AAPL".into() });
        assert_eq!(cached_crumb(&provider).as_deref(), Some("abc123"));

        provider.note_summary_error(&DataError::AuthenticationRequired("Invalid Crumb".into()));
        assert_eq!(cached_crumb(&provider), None);
    }

    #[test]
    fn chart_url_encodes_symbol_and_range() {
        let url = YahooProvider::chart_url("^GSPC", TimeRange::FiveYears).unwrap();
        let s = url.as_str();
        assert!(s.starts_with("https://query2.finance.yahoo.com/v8/finance/chart/%5EGSPC?"));
        assert!(s.contains("range=5y"));
        assert!(s.contains("interval=1d"));
    }
}
