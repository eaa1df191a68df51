//! Quote header: company name, last price and change versus previous close.

use serde::Serialize;

use crate::domain::{MetadataRecord, PriceBar, Ticker};

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceChange {
    pub absolute: f64,
    pub percent: f64,
}

impl PriceChange {
    pub fn is_gain(&self) -> bool {
        self.absolute >= 0.0
    }

    /// `+1.23 (+0.66%)` / `-1.23 (-0.66%)`
    pub fn display(&self) -> String {
        let sign = if self.is_gain() { "+" } else { "" };
        format!(
            "{sign}{:.2} ({sign}{:.2}%)",
            self.absolute, self.percent
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QuoteSummary {
    pub company_name: String,
    pub current_price: Option<f64>,
    pub previous_close: Option<f64>,
    pub change: Option<PriceChange>,
}

impl QuoteSummary {
    /// `Apple Inc. (AAPL)`
    pub fn heading(&self, ticker: &Ticker) -> String {
        format!("{} ({})", self.company_name, ticker)
    }

    pub fn price_display(&self) -> Option<String> {
        self.current_price.map(|p| format!("${p:.2}"))
    }
}

/// Build the quote header. `currentPrice` falls back to the last close in
/// the series; the change is only computed when both prices are non-zero.
pub fn summarize_quote(ticker: &Ticker, record: &MetadataRecord, series: &[PriceBar]) -> QuoteSummary {
    let company_name = record
        .text("shortName")
        .map(str::to_string)
        .unwrap_or_else(|| ticker.to_string());

    let current_price = record
        .number("currentPrice")
        .or_else(|| series.last().map(|b| b.close))
        .filter(|p| p.is_finite());
    let previous_close = record.number("previousClose").filter(|p| p.is_finite());

    let change = match (current_price, previous_close) {
        (Some(cur), Some(prev)) if cur != 0.0 && prev != 0.0 => {
            let absolute = cur - prev;
            Some(PriceChange {
                absolute,
                percent: absolute / prev * 100.0,
            })
        }
        _ => None,
    };

    QuoteSummary {
        company_name,
        current_price,
        previous_close,
        change,
    }
}
