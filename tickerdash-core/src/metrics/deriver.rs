//! Key financial metrics: fixed 13-row table derived from a metadata record.

use serde::Serialize;

use super::format::format_number;
use crate::domain::{MetadataRecord, MetadataValue};

/// Transform applied to a source value before formatting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transform {
    Identity,
    /// Fraction to percent (×100). Zero or non-numeric sources become absent.
    Percent,
}

impl Transform {
    pub fn apply(self, value: &MetadataValue) -> MetadataValue {
        match (self, value) {
            (Transform::Identity, v) => v.clone(),
            (Transform::Percent, MetadataValue::Number(v)) if *v != 0.0 => {
                MetadataValue::Number(v * 100.0)
            }
            (Transform::Percent, _) => MetadataValue::Absent,
        }
    }
}

/// One row of the metric definition table.
#[derive(Debug, Clone, Copy)]
pub struct MetricSpec {
    pub name: &'static str,
    pub source_key: &'static str,
    pub transform: Transform,
}

const fn spec(name: &'static str, source_key: &'static str) -> MetricSpec {
    MetricSpec {
        name,
        source_key,
        transform: Transform::Identity,
    }
}

/// Display order of the metrics panel.
pub const METRIC_SPECS: [MetricSpec; 13] = [
    spec("Market Cap", "marketCap"),
    spec("PE Ratio", "trailingPE"),
    spec("EPS (TTM)", "trailingEps"),
    MetricSpec {
        name: "Dividend Yield",
        source_key: "dividendYield",
        transform: Transform::Percent,
    },
    spec("52 Week High", "fiftyTwoWeekHigh"),
    spec("52 Week Low", "fiftyTwoWeekLow"),
    spec("50 Day Average", "fiftyDayAverage"),
    spec("200 Day Average", "twoHundredDayAverage"),
    spec("Forward PE", "forwardPE"),
    spec("PEG Ratio", "pegRatio"),
    spec("Beta", "beta"),
    spec("Volume", "volume"),
    spec("Avg Volume", "averageVolume"),
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricRow {
    pub name: &'static str,
    pub value: String,
}

/// Ordered (metric name, formatted value) pairs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MetricsTable {
    rows: Vec<MetricRow>,
}

impl MetricsTable {
    pub fn rows(&self) -> &[MetricRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, name: &str) -> Option<&str> {
        self.rows
            .iter()
            .find(|r| r.name == name)
            .map(|r| r.value.as_str())
    }
}

/// Build the metrics table. Every row in [`METRIC_SPECS`] is always
/// present; missing or non-numeric sources render as `N/A`.
pub fn derive_metrics(record: &MetadataRecord) -> MetricsTable {
    let rows = METRIC_SPECS
        .iter()
        .map(|spec| {
            let value = spec.transform.apply(record.get(spec.source_key));
            MetricRow {
                name: spec.name,
                value: format_number(&value),
            }
        })
        .collect();
    MetricsTable { rows }
}
