//! CSV export of the historical table and the metrics table.
//!
//! Layout of both files matches what spreadsheet users of the dashboard
//! expect: a leading index column, then the visible columns.
//!
//! - `{TICKER}_historical_data.csv`: `Date,Open,High,Low,Close,Volume,Dividends,Stock Splits`
//! - `{TICKER}_financial_metrics.csv`: `,Metric,Value` with a 0-based row index

use std::io::Read;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use thiserror::Error;
use tracing::info;

use crate::dashboard::Dashboard;
use crate::domain::{PriceBar, PriceSeries, Ticker};
use crate::metrics::MetricsTable;

pub const HISTORICAL_HEADER: [&str; 8] = [
    "Date",
    "Open",
    "High",
    "Low",
    "Close",
    "Volume",
    "Dividends",
    "Stock Splits",
];

pub const METRICS_HEADER: [&str; 3] = ["", "Metric", "Value"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV output is not valid UTF-8")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("unexpected CSV header: {0}")]
    Header(String),

    #[error("row {row}: invalid {column} value '{value}'")]
    Field {
        row: usize,
        column: &'static str,
        value: String,
    },
}

pub fn historical_file_name(ticker: &Ticker) -> String {
    format!("{ticker}_historical_data.csv")
}

pub fn metrics_file_name(ticker: &Ticker) -> String {
    format!("{ticker}_financial_metrics.csv")
}

fn finish(wtr: csv::Writer<Vec<u8>>) -> Result<String, ExportError> {
    let data = wtr.into_inner().map_err(|e| ExportError::Csv(e.into_error().into()))?;
    Ok(String::from_utf8(data)?)
}

/// Historical table as CSV. Prices use the shortest representation that
/// parses back to the same `f64`.
pub fn historical_csv(series: &[PriceBar]) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(HISTORICAL_HEADER)?;
    for bar in series {
        wtr.write_record([
            bar.date_label(),
            bar.open.to_string(),
            bar.high.to_string(),
            bar.low.to_string(),
            bar.close.to_string(),
            bar.volume.to_string(),
            bar.dividends.to_string(),
            bar.stock_splits.to_string(),
        ])?;
    }
    finish(wtr)
}

pub fn metrics_csv(metrics: &MetricsTable) -> Result<String, ExportError> {
    let mut wtr = csv::Writer::from_writer(vec![]);
    wtr.write_record(METRICS_HEADER)?;
    for (i, row) in metrics.rows().iter().enumerate() {
        wtr.write_record([i.to_string().as_str(), row.name, row.value.as_str()])?;
    }
    finish(wtr)
}

fn parse_field<T: std::str::FromStr>(
    record: &csv::StringRecord,
    idx: usize,
    row: usize,
) -> Result<T, ExportError> {
    let raw = record.get(idx).unwrap_or_default();
    raw.trim().parse().map_err(|_| ExportError::Field {
        row,
        column: HISTORICAL_HEADER[idx],
        value: raw.to_string(),
    })
}

/// Parse a historical export back into bars.
pub fn read_historical_csv<R: Read>(reader: R) -> Result<PriceSeries, ExportError> {
    let mut rdr = csv::Reader::from_reader(reader);

    let headers = rdr.headers()?;
    if headers.iter().ne(HISTORICAL_HEADER.iter().copied()) {
        return Err(ExportError::Header(headers.iter().collect::<Vec<_>>().join(",")));
    }

    let mut bars = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let row = i + 1;
        let raw_date = record.get(0).unwrap_or_default();
        let date = NaiveDate::parse_from_str(raw_date, "%Y-%m-%d").map_err(|_| ExportError::Field {
            row,
            column: "Date",
            value: raw_date.to_string(),
        })?;
        bars.push(PriceBar {
            date,
            open: parse_field(&record, 1, row)?,
            high: parse_field(&record, 2, row)?,
            low: parse_field(&record, 3, row)?,
            close: parse_field(&record, 4, row)?,
            volume: parse_field(&record, 5, row)?,
            dividends: parse_field(&record, 6, row)?,
            stock_splits: parse_field(&record, 7, row)?,
        });
    }
    Ok(bars)
}

fn write_file(path: &Path, contents: &str) -> Result<(), ExportError> {
    std::fs::write(path, contents).map_err(|source| ExportError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn ensure_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|source| ExportError::Write {
        path: dir.to_path_buf(),
        source,
    })
}

/// Write `{TICKER}_historical_data.csv` into `dir`.
pub fn save_historical(dashboard: &Dashboard, dir: &Path) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = dir.join(historical_file_name(&dashboard.ticker));
    write_file(&path, &historical_csv(&dashboard.series)?)?;
    info!(path = %path.display(), rows = dashboard.series.len(), "historical data exported");
    Ok(path)
}

/// Write `{TICKER}_financial_metrics.csv` into `dir`.
pub fn save_metrics(dashboard: &Dashboard, dir: &Path) -> Result<PathBuf, ExportError> {
    ensure_dir(dir)?;
    let path = dir.join(metrics_file_name(&dashboard.ticker));
    write_file(&path, &metrics_csv(&dashboard.metrics)?)?;
    info!(path = %path.display(), "metrics exported");
    Ok(path)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPaths {
    pub historical: PathBuf,
    pub metrics: PathBuf,
}

/// Write both exports into `dir`.
pub fn save_exports(dashboard: &Dashboard, dir: &Path) -> Result<ExportPaths, ExportError> {
    Ok(ExportPaths {
        historical: save_historical(dashboard, dir)?,
        metrics: save_metrics(dashboard, dir)?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MetadataRecord;
    use crate::metrics::derive_metrics;

    fn sample_bars() -> Vec<PriceBar> {
        vec![
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 3, 14).unwrap(),
                open: 172.91,
                high: 174.31,
                low: 172.05,
                close: 173.0,
                volume: 72_913_500,
                dividends: 0.0,
                stock_splits: 4.0,
            },
            PriceBar {
                date: NaiveDate::from_ymd_opt(2024, 3, 18).unwrap(),
                open: 175.57,
                high: 177.71,
                low: 173.52,
                close: 173.72,
                volume: 75_604_200,
                dividends: 0.24,
                stock_splits: 0.0,
            },
        ]
    }

    #[test]
    fn historical_layout() {
        let csv = historical_csv(&sample_bars()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], "Date,Open,High,Low,Close,Volume,Dividends,Stock Splits");
        assert_eq!(lines[1], "2024-03-14,172.91,174.31,172.05,173,72913500,0,4");
        assert_eq!(lines[2], "2024-03-18,175.57,177.71,173.52,173.72,75604200,0.24,0");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn historical_reads_back() {
        let bars = sample_bars();
        let csv = historical_csv(&bars).unwrap();
        assert_eq!(read_historical_csv(csv.as_bytes()).unwrap(), bars);
    }

    #[test]
    fn wrong_header_is_rejected() {
        let err = read_historical_csv("a,b,c\n1,2,3\n".as_bytes()).unwrap_err();
        assert!(matches!(err, ExportError::Header(_)));
    }

    #[test]
    fn bad_field_reports_row_and_column() {
        let text = "Date,Open,High,Low,Close,Volume,Dividends,Stock Splits\n\
                    2024-03-14,1,2,0.5,1.5,lots,0,0\n";
        let err = read_historical_csv(text.as_bytes()).unwrap_err();
        assert_eq!(err.to_string(), "row 1: invalid Volume value 'lots'");
    }

    #[test]
    fn metrics_layout() {
        let record: MetadataRecord = [("marketCap", 2.5e12)].into_iter().collect();
        let csv = metrics_csv(&derive_metrics(&record)).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines[0], ",Metric,Value");
        assert_eq!(lines[1], "0,Market Cap,$2500.00B");
        assert_eq!(lines[2], "1,PE Ratio,N/A");
        assert_eq!(lines[13], "12,Avg Volume,N/A");
        assert_eq!(lines.len(), 14);
    }

    #[test]
    fn file_names() {
        let t = Ticker::parse("brk-b").unwrap();
        assert_eq!(historical_file_name(&t), "BRK-B_historical_data.csv");
        assert_eq!(metrics_file_name(&t), "BRK-B_financial_metrics.csv");
    }
}
