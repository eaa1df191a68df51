//! Metric derivation and number formatting.

pub mod deriver;
pub mod format;
pub mod quote;

pub use deriver::{derive_metrics, MetricRow, MetricSpec, MetricsTable, Transform, METRIC_SPECS};
pub use format::{format_amount, format_number, NOT_AVAILABLE};
pub use quote::{summarize_quote, PriceChange, QuoteSummary};
