//! Ticker symbol newtype.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TickerError {
    #[error("ticker symbol is empty")]
    Empty,
}

/// A normalized (trimmed, upper-case) ticker symbol.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Ticker(String);

impl Ticker {
    /// Normalize user input into a ticker. Surrounding whitespace is dropped
    /// and the symbol is upper-cased; nothing else is validated since
    /// provider symbols include `^`, `-`, `=` and `.`.
    pub fn parse(input: &str) -> Result<Self, TickerError> {
        let symbol = input.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(TickerError::Empty);
        }
        Ok(Self(symbol))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for Ticker {
    /// `AAPL`, the symbol the dashboard opens with.
    fn default() -> Self {
        Self("AAPL".to_string())
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::str::FromStr for Ticker {
    type Err = TickerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Ticker {
    type Error = TickerError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Ticker> for String {
    fn from(t: Ticker) -> Self {
        t.0
    }
}
