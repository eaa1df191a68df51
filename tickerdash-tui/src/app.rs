//! Application state: single-owner, main-thread only.
//!
//! All TUI state lives here. The worker thread communicates via channels.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::mpsc::{Receiver, Sender};

use chrono::NaiveDateTime;
use tracing::warn;

use tickerdash_core::dashboard::Dashboard;
use tickerdash_core::domain::{Ticker, TimeRange};
use tickerdash_core::export;
use tickerdash_core::{DashboardOutcome, DashboardRequest};

use crate::worker::{WorkerCommand, WorkerResponse};

const ERROR_HISTORY_CAP: usize = 50;

/// Which widget receives keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Ticker,
    Range,
    History,
    Metrics,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Ticker, Focus::Range, Focus::History, Focus::Metrics];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn prev(self) -> Focus {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Status message severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusLevel {
    Info,
    Warning,
    Error,
}

/// Error category for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Export,
}

impl ErrorCategory {
    pub fn label(self) -> &'static str {
        match self {
            ErrorCategory::Fetch => "FETCH",
            ErrorCategory::Export => "EXPORT",
        }
    }
}

/// An error record for the error history overlay.
#[derive(Debug, Clone)]
pub struct ErrorRecord {
    pub timestamp: NaiveDateTime,
    pub category: ErrorCategory,
    pub message: String,
    pub context: String,
}

/// Which overlay (if any) is shown on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Overlay {
    None,
    Welcome,
    Help,
    ErrorHistory,
}

/// What the main area shows.
#[derive(Debug)]
pub enum View {
    /// Nothing requested yet.
    Idle,
    Ready(Box<Dashboard>),
    /// Warning text for an empty result.
    Empty(String),
    /// Error text for a failed fetch.
    Failed(String),
}

/// Top-level application state.
pub struct AppState {
    pub running: bool,
    pub focus: Focus,
    pub overlay: Overlay,

    // Inputs
    pub ticker_input: String,
    pub range: TimeRange,

    // Output
    pub view: View,
    pub history_scroll: usize,
    pub metrics_scroll: usize,

    // Worker communication
    pub worker_tx: Sender<WorkerCommand>,
    pub worker_rx: Receiver<WorkerResponse>,
    /// Requests sent but not yet answered.
    pub pending: usize,
    /// Most recently requested ticker while `pending > 0`.
    pub loading: Option<Ticker>,

    // Cross-cutting
    pub status_message: Option<(String, StatusLevel)>,
    pub error_history: VecDeque<ErrorRecord>,
    pub error_scroll: usize,
    pub export_dir: PathBuf,
}

impl AppState {
    pub fn new(
        worker_tx: Sender<WorkerCommand>,
        worker_rx: Receiver<WorkerResponse>,
        ticker: &Ticker,
        range: TimeRange,
        export_dir: PathBuf,
    ) -> Self {
        Self {
            running: true,
            focus: Focus::Ticker,
            overlay: Overlay::None,
            ticker_input: ticker.to_string(),
            range,
            view: View::Idle,
            history_scroll: 0,
            metrics_scroll: 0,
            worker_tx,
            worker_rx,
            pending: 0,
            loading: None,
            status_message: None,
            error_history: VecDeque::with_capacity(ERROR_HISTORY_CAP),
            error_scroll: 0,
            export_dir,
        }
    }

    pub fn dashboard(&self) -> Option<&Dashboard> {
        match &self.view {
            View::Ready(d) => Some(d),
            _ => None,
        }
    }

    /// Validate the ticker field and request a load for it.
    pub fn submit(&mut self) {
        match Ticker::parse(&self.ticker_input) {
            Ok(ticker) => {
                self.ticker_input = ticker.to_string();
                self.request_load(ticker);
            }
            Err(e) => self.set_warning(format!("Enter a ticker symbol ({e})")),
        }
    }

    /// Change the range and reload when the ticker field holds a symbol.
    pub fn set_range(&mut self, range: TimeRange) {
        if range == self.range {
            return;
        }
        self.range = range;
        if let Ok(ticker) = Ticker::parse(&self.ticker_input) {
            self.request_load(ticker);
        }
    }

    pub fn request_load(&mut self, ticker: Ticker) {
        let request = DashboardRequest::new(ticker.clone(), self.range);
        if self.worker_tx.send(WorkerCommand::Load(request)).is_err() {
            self.push_error(
                ErrorCategory::Fetch,
                "Background worker is not running".into(),
                ticker.to_string(),
            );
            return;
        }
        self.pending += 1;
        self.set_status(format!("Loading data for {ticker}..."));
        self.loading = Some(ticker);
    }

    pub fn is_loading(&self) -> bool {
        self.pending > 0
    }

    pub fn handle_response(&mut self, resp: WorkerResponse) {
        match resp {
            WorkerResponse::Loaded(outcome) => self.apply_outcome(outcome),
        }
    }

    fn apply_outcome(&mut self, outcome: DashboardOutcome) {
        self.pending = self.pending.saturating_sub(1);
        if self.pending == 0 {
            self.loading = None;
        }
        self.history_scroll = 0;
        self.metrics_scroll = 0;

        let notice = outcome.notice().unwrap_or_default();
        match outcome {
            DashboardOutcome::Ready(dashboard) => {
                if !self.is_loading() {
                    self.set_status(dashboard.footer());
                }
                self.view = View::Ready(dashboard);
            }
            DashboardOutcome::Empty { .. } => {
                if !self.is_loading() {
                    self.set_warning(notice.clone());
                }
                self.view = View::Empty(notice);
            }
            DashboardOutcome::Failed { ticker, .. } => {
                let loading_status = self.status_message.clone();
                self.push_error(ErrorCategory::Fetch, notice.clone(), ticker.to_string());
                if self.is_loading() {
                    self.status_message = loading_status;
                }
                self.view = View::Failed(notice);
            }
        }
    }

    pub fn export_historical(&mut self) {
        self.export_with(export::save_historical, "Historical data");
    }

    pub fn export_metrics(&mut self) {
        self.export_with(export::save_metrics, "Financial metrics");
    }

    fn export_with(
        &mut self,
        save: fn(&Dashboard, &std::path::Path) -> Result<PathBuf, export::ExportError>,
        what: &str,
    ) {
        let Some(dashboard) = self.dashboard() else {
            self.set_warning("Nothing to export yet: load a ticker first");
            return;
        };
        let ticker = dashboard.ticker.to_string();
        match save(dashboard, &self.export_dir) {
            Ok(path) => self.set_status(format!("{what} saved to {}", path.display())),
            Err(e) => {
                warn!(error = %e, "export failed");
                self.push_error(ErrorCategory::Export, format!("Export failed: {e}"), ticker);
            }
        }
    }

    pub fn scroll_down(&mut self) {
        let (rows, scroll) = match self.focus {
            Focus::History => (
                self.dashboard().map_or(0, |d| d.series.len()),
                &mut self.history_scroll,
            ),
            Focus::Metrics => (
                self.dashboard().map_or(0, |d| d.metrics.len()),
                &mut self.metrics_scroll,
            ),
            _ => return,
        };
        if *scroll + 1 < rows {
            *scroll += 1;
        }
    }

    pub fn scroll_up(&mut self) {
        match self.focus {
            Focus::History => self.history_scroll = self.history_scroll.saturating_sub(1),
            Focus::Metrics => self.metrics_scroll = self.metrics_scroll.saturating_sub(1),
            _ => {}
        }
    }

    /// Push an error to the history, capping at 50.
    pub fn push_error(&mut self, category: ErrorCategory, message: String, context: String) {
        let record = ErrorRecord {
            timestamp: chrono::Local::now().naive_local(),
            category,
            message: message.clone(),
            context,
        };
        self.error_history.push_front(record);
        if self.error_history.len() > ERROR_HISTORY_CAP {
            self.error_history.pop_back();
        }
        self.status_message = Some((message, StatusLevel::Error));
    }

    pub fn set_status(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Info));
    }

    pub fn set_warning(&mut self, msg: impl Into<String>) {
        self.status_message = Some((msg.into(), StatusLevel::Warning));
    }
}
