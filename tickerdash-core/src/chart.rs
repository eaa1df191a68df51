//! Price chart model: three lines over the bar index, independent of any
//! rendering backend.

use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{PriceBar, PriceField, Ticker};

/// Line colour, as an RGB triple the front end maps onto its palette.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum LineColor {
    RoyalBlue,
    Green,
    Red,
}

impl LineColor {
    pub fn rgb(self) -> (u8, u8, u8) {
        match self {
            LineColor::RoyalBlue => (65, 105, 225),
            LineColor::Green => (0, 128, 0),
            LineColor::Red => (255, 0, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartLine {
    pub name: &'static str,
    pub field: PriceField,
    pub color: LineColor,
    /// `(bar index, price)`; bars with a non-finite price are left out.
    pub points: Vec<(f64, f64)>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceChart {
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub legend_title: &'static str,
    pub lines: Vec<ChartLine>,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub x_bounds: [f64; 2],
    pub y_bounds: [f64; 2],
}

const LINES: [(&str, PriceField, LineColor); 3] = [
    ("Close Price", PriceField::Close, LineColor::RoyalBlue),
    ("High", PriceField::High, LineColor::Green),
    ("Low", PriceField::Low, LineColor::Red),
];

impl PriceChart {
    pub fn build(ticker: &Ticker, series: &[PriceBar]) -> Self {
        let lines: Vec<ChartLine> = LINES
            .iter()
            .map(|&(name, field, color)| ChartLine {
                name,
                field,
                color,
                points: series
                    .iter()
                    .enumerate()
                    .map(|(i, bar)| (i as f64, field.value(bar)))
                    .filter(|(_, y)| y.is_finite())
                    .collect(),
            })
            .collect();

        let (lo, hi) = lines
            .iter()
            .flat_map(|l| l.points.iter().map(|&(_, y)| y))
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), y| (lo.min(y), hi.max(y)));

        let y_bounds = if lo.is_finite() && hi.is_finite() {
            let padding = match (hi - lo) * 0.05 {
                p if p > 0.0 => p,
                _ => hi.abs().max(1.0) * 0.05,
            };
            [lo - padding, hi + padding]
        } else {
            [0.0, 1.0]
        };

        Self {
            title: format!("{ticker} Stock Price"),
            x_label: "Date",
            y_label: "Price (USD)",
            legend_title: "Price Type",
            lines,
            first_date: series.first().map(|b| b.date),
            last_date: series.last().map(|b| b.date),
            x_bounds: [0.0, (series.len().saturating_sub(1) as f64).max(1.0)],
            y_bounds,
        }
    }

    pub fn line(&self, field: PriceField) -> Option<&ChartLine> {
        self.lines.iter().find(|l| l.field == field)
    }

    /// `2024-01-02 .. 2024-12-31`, or `None` for an empty chart.
    pub fn date_span(&self) -> Option<String> {
        match (self.first_date, self.last_date) {
            (Some(a), Some(b)) => Some(format!("{a} .. {b}")),
            _ => None,
        }
    }
}
