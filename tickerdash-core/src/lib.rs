//! TickerDash Core: domain types, metrics, data providers and the dashboard
//! pipeline shared by the terminal dashboard and the CLI.
//!
//! - Domain types (bars, metadata records, tickers, time ranges)
//! - Metrics deriver and number formatting
//! - Data providers (Yahoo Finance, in-memory)
//! - Dashboard pipeline: one request in, one [`DashboardOutcome`] out
//! - Chart model and CSV export
//! - Configuration and logging setup

pub mod chart;
pub mod config;
pub mod dashboard;
pub mod data;
pub mod domain;
pub mod export;
pub mod logging;
pub mod metrics;

pub use dashboard::{load_dashboard, Dashboard, DashboardOutcome, DashboardRequest};
