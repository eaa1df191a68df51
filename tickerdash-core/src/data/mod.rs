//! Data retrieval: provider trait, Yahoo Finance client, in-memory provider.

pub mod memory;
pub mod provider;
pub mod yahoo;

pub use memory::StaticProvider;
pub use provider::{DataError, DataProvider, DataSource, FetchResult};
pub use yahoo::YahooProvider;
