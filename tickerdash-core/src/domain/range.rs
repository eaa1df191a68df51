//! Time-range selector: the seven history windows the dashboard offers.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown time range '{0}' (expected one of: 1mo, 3mo, 6mo, 1y, 2y, 5y, max)")]
pub struct RangeParseError(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TimeRange {
    #[default]
    OneMonth,
    ThreeMonths,
    SixMonths,
    OneYear,
    TwoYears,
    FiveYears,
    Max,
}

impl TimeRange {
    /// All ranges in selector order.
    pub const ALL: [TimeRange; 7] = [
        TimeRange::OneMonth,
        TimeRange::ThreeMonths,
        TimeRange::SixMonths,
        TimeRange::OneYear,
        TimeRange::TwoYears,
        TimeRange::FiveYears,
        TimeRange::Max,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1 Month",
            TimeRange::ThreeMonths => "3 Months",
            TimeRange::SixMonths => "6 Months",
            TimeRange::OneYear => "1 Year",
            TimeRange::TwoYears => "2 Years",
            TimeRange::FiveYears => "5 Years",
            TimeRange::Max => "Max",
        }
    }

    /// Token understood by the provider's `range=` parameter.
    pub fn token(self) -> &'static str {
        match self {
            TimeRange::OneMonth => "1mo",
            TimeRange::ThreeMonths => "3mo",
            TimeRange::SixMonths => "6mo",
            TimeRange::OneYear => "1y",
            TimeRange::TwoYears => "2y",
            TimeRange::FiveYears => "5y",
            TimeRange::Max => "max",
        }
    }

    /// Calendar months covered, or `None` for the full history.
    pub fn months(self) -> Option<u32> {
        match self {
            TimeRange::OneMonth => Some(1),
            TimeRange::ThreeMonths => Some(3),
            TimeRange::SixMonths => Some(6),
            TimeRange::OneYear => Some(12),
            TimeRange::TwoYears => Some(24),
            TimeRange::FiveYears => Some(60),
            TimeRange::Max => None,
        }
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|r| *r == self).unwrap_or(0)
    }

    pub fn next(self) -> TimeRange {
        Self::ALL[(self.index() + 1) % Self::ALL.len()]
    }

    pub fn prev(self) -> TimeRange {
        Self::ALL[(self.index() + Self::ALL.len() - 1) % Self::ALL.len()]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for TimeRange {
    type Err = RangeParseError;

    /// Accepts either the provider token (`1y`) or the display label
    /// (`1 Year`), case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .iter()
            .copied()
            .find(|r| r.token().eq_ignore_ascii_case(needle) || r.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| RangeParseError(s.to_string()))
    }
}

impl TryFrom<String> for TimeRange {
    type Error = RangeParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TimeRange> for String {
    fn from(r: TimeRange) -> Self {
        r.token().to_string()
    }
}
