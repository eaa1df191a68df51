//! Domain types: bars, metadata, tickers, time ranges.

pub mod bar;
pub mod metadata;
pub mod range;
pub mod ticker;

pub use bar::{PriceBar, PriceField, PriceSeries};
pub use metadata::{MetadataRecord, MetadataValue};
pub use range::{RangeParseError, TimeRange};
pub use ticker::{Ticker, TickerError};
