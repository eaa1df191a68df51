//! TickerDash CLI: print a dashboard or export its tables without the TUI.
//!
//! Commands:
//! - `show` quote header, key metrics, recent history and chart span
//! - `metrics` the key metrics table (text or JSON)
//! - `export` write the historical and metrics CSV files

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::debug;

use tickerdash_core::config::AppConfig;
use tickerdash_core::data::{DataProvider, StaticProvider, YahooProvider};
use tickerdash_core::domain::{PriceBar, Ticker, TickerError, TimeRange};
use tickerdash_core::export::save_exports;
use tickerdash_core::logging;
use tickerdash_core::metrics::MetricsTable;
use tickerdash_core::{load_dashboard, Dashboard, DashboardOutcome, DashboardRequest};

#[derive(Parser)]
#[command(name = "tickerdash", version, about = "TickerDash CLI: stock quotes, metrics and CSV exports")]
struct Cli {
    /// Config file. Defaults to {config_dir}/tickerdash/config.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use the built-in demo data instead of Yahoo Finance.
    #[arg(long, global = true, default_value_t = false)]
    demo: bool,

    /// Log at debug level.
    #[arg(short, long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the quote, key metrics and the most recent rows.
    Show {
        #[arg(value_parser = parse_ticker)]
        ticker: Ticker,

        /// 1mo, 3mo, 6mo, 1y, 2y, 5y or max. Defaults to the configured range.
        #[arg(long)]
        range: Option<TimeRange>,

        /// Number of historical rows to print.
        #[arg(long, default_value_t = 10)]
        rows: usize,
    },
    /// Print the key metrics table.
    Metrics {
        #[arg(value_parser = parse_ticker)]
        ticker: Ticker,

        #[arg(long)]
        range: Option<TimeRange>,

        /// Print as a JSON array of {metric, value} objects.
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// Write {TICKER}_historical_data.csv and {TICKER}_financial_metrics.csv.
    Export {
        #[arg(value_parser = parse_ticker)]
        ticker: Ticker,

        #[arg(long)]
        range: Option<TimeRange>,

        /// Output directory. Defaults to the configured export_dir.
        #[arg(long)]
        out_dir: Option<PathBuf>,
    },
}

fn parse_ticker(s: &str) -> Result<Ticker, TickerError> {
    Ticker::parse(s)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config =
        AppConfig::load_or_default(cli.config.as_deref()).context("failed to load configuration")?;
    let level = if cli.verbose { "debug" } else { config.logging.level.as_str() };
    logging::init_stderr(level)?;

    let provider: Box<dyn DataProvider> = if cli.demo {
        Box::new(StaticProvider::demo())
    } else {
        Box::new(YahooProvider::new(&config.provider).context("failed to build HTTP client")?)
    };
    debug!(provider = provider.name(), "provider ready");

    match cli.command {
        Commands::Show { ticker, range, rows } => {
            let range = range.unwrap_or(config.default_range);
            let dash = require_ready(provider.as_ref(), ticker, range);
            print!("{}", render_show(&dash, rows));
        }
        Commands::Metrics { ticker, range, json } => {
            let range = range.unwrap_or(config.default_range);
            let dash = require_ready(provider.as_ref(), ticker, range);
            if json {
                println!("{}", serde_json::to_string_pretty(&metrics_json(&dash.metrics))?);
            } else {
                print!("{}", render_metrics(&dash.metrics));
            }
        }
        Commands::Export { ticker, range, out_dir } => {
            let range = range.unwrap_or(config.default_range);
            let dash = require_ready(provider.as_ref(), ticker, range);
            let dir = out_dir.unwrap_or(config.export_dir);
            let paths = save_exports(&dash, &dir)
                .with_context(|| format!("failed to export to {}", dir.display()))?;
            println!("Historical data saved to {}", paths.historical.display());
            println!("Metrics saved to {}", paths.metrics.display());
        }
    }

    Ok(())
}

/// Load the dashboard, or print the notice and exit with [`exit_code`].
fn require_ready(provider: &dyn DataProvider, ticker: Ticker, range: TimeRange) -> Box<Dashboard> {
    let outcome = load_dashboard(provider, &DashboardRequest::new(ticker, range));
    match outcome {
        DashboardOutcome::Ready(dash) => dash,
        other => {
            if let Some(notice) = other.notice() {
                eprintln!("{notice}");
            }
            std::process::exit(exit_code(&other));
        }
    }
}

fn exit_code(outcome: &DashboardOutcome) -> i32 {
    match outcome {
        DashboardOutcome::Ready(_) => 0,
        DashboardOutcome::Failed { .. } => 1,
        DashboardOutcome::Empty { .. } => 2,
    }
}

fn render_show(dash: &Dashboard, rows: usize) -> String {
    let mut out = String::new();
    out.push_str(&render_quote(dash));
    out.push('\n');
    out.push_str(&render_metrics(&dash.metrics));
    out.push('\n');
    out.push_str(&render_history(&dash.series, rows));
    out.push('\n');
    if let Some(span) = dash.chart.date_span() {
        out.push_str(&format!("{}: {span}\n", dash.chart.title));
    }
    out.push_str(&format!("{}\n", dash.footer()));
    out
}

fn render_quote(dash: &Dashboard) -> String {
    let quote = &dash.quote;
    let mut line = quote.heading(&dash.ticker);
    if let Some(price) = quote.price_display() {
        line.push_str(&format!("  {price}"));
    }
    if let Some(change) = quote.change {
        line.push_str(&format!("  {}", change.display()));
    }
    format!("{line}\nRange: {}\n", dash.range.label())
}

fn render_metrics(metrics: &MetricsTable) -> String {
    let mut out = format!("{:<18}{:>16}\n", "Metric", "Value");
    for row in metrics.rows() {
        out.push_str(&format!("{:<18}{:>16}\n", row.name, row.value));
    }
    out
}

/// Last `rows` bars, oldest of them first.
fn render_history(series: &[PriceBar], rows: usize) -> String {
    let mut out = format!(
        "{:<10} {:>10} {:>10} {:>10} {:>10} {:>12}\n",
        "Date", "Open", "High", "Low", "Close", "Volume"
    );
    let start = series.len().saturating_sub(rows);
    for bar in &series[start..] {
        out.push_str(&format!(
            "{:<10} {:>10.2} {:>10.2} {:>10.2} {:>10.2} {:>12}\n",
            bar.date_label(),
            bar.open,
            bar.high,
            bar.low,
            bar.close,
            bar.volume
        ));
    }
    out
}

fn metrics_json(metrics: &MetricsTable) -> serde_json::Value {
    metrics
        .rows()
        .iter()
        .map(|row| serde_json::json!({ "metric": row.name, "value": row.value }))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    fn demo(symbol: &str, range: TimeRange) -> DashboardOutcome {
        let request = DashboardRequest::new(Ticker::parse(symbol).unwrap(), range);
        load_dashboard(&StaticProvider::demo(), &request)
    }

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_show_with_globals() {
        let cli = Cli::try_parse_from(["tickerdash", "show", "msft", "--range", "6mo", "--demo", "-v"])
            .unwrap();
        assert!(cli.demo);
        assert!(cli.verbose);
        match cli.command {
            Commands::Show { ticker, range, rows } => {
                assert_eq!(ticker.as_str(), "MSFT");
                assert_eq!(range, Some(TimeRange::SixMonths));
                assert_eq!(rows, 10);
            }
            _ => panic!("expected show"),
        }
    }

    #[test]
    fn rejects_unknown_range_and_blank_ticker() {
        assert!(Cli::try_parse_from(["tickerdash", "show", "AAPL", "--range", "10y"]).is_err());
        assert!(Cli::try_parse_from(["tickerdash", "metrics", "  "]).is_err());
    }

    #[test]
    fn exit_codes_follow_outcome() {
        assert_eq!(exit_code(&demo("AAPL", TimeRange::OneMonth)), 0);
        assert_eq!(exit_code(&demo("ZZZZINVALID", TimeRange::OneMonth)), 2);
        let failed = DashboardOutcome::Failed {
            ticker: Ticker::parse("AAPL").unwrap(),
            message: "timed out".into(),
        };
        assert_eq!(exit_code(&failed), 1);
    }

    #[test]
    fn show_prints_every_section() {
        let outcome = demo("AAPL", TimeRange::OneYear);
        let dash = outcome.dashboard().unwrap();
        let text = render_show(dash, 5);
        assert!(text.starts_with("Apple Inc. (AAPL)"));
        assert!(text.contains("Range: 1 Year"));
        assert!(text.contains("Market Cap"));
        assert!(text.contains("Avg Volume"));
        assert!(text.contains("AAPL Stock Price: "));
        assert!(text.contains("2024-12-31"));
        assert!(text.contains("Data provided by built-in demo data."));
    }

    #[test]
    fn history_keeps_last_rows_only() {
        let outcome = demo("MSFT", TimeRange::OneMonth);
        let dash = outcome.dashboard().unwrap();
        let text = render_history(&dash.series, 3);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 4);
        assert!(lines[0].starts_with("Date"));
        assert!(lines[3].starts_with(&dash.series.last().unwrap().date_label()));
        assert_eq!(render_history(&dash.series[..2], 10).lines().count(), 3);
    }

    #[test]
    fn metrics_json_keeps_order() {
        let outcome = demo("GOOGL", TimeRange::OneMonth);
        let json = metrics_json(&outcome.dashboard().unwrap().metrics);
        let rows = json.as_array().unwrap();
        assert_eq!(rows.len(), 13);
        assert_eq!(rows[0]["metric"], "Market Cap");
        assert_eq!(rows[12]["metric"], "Avg Volume");
    }
}
