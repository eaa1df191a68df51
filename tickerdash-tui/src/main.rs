//! TickerDash TUI: single-screen stock dashboard.
//!
//! Layout:
//! - top: ticker field and time range tabs
//! - left: quote header, price chart, historical data
//! - right: key metrics, company information
//! - bottom: key hints and status

mod app;
mod input;
mod persistence;
mod theme;
mod ui;
mod worker;

use std::io::{self, stdout};
use std::path::PathBuf;
use std::sync::mpsc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;
use tracing::info;

use tickerdash_core::config::AppConfig;
use tickerdash_core::data::{DataProvider, StaticProvider, YahooProvider};
use tickerdash_core::logging;

use crate::app::AppState;
use crate::worker::WorkerCommand;

#[derive(Parser)]
#[command(name = "tickerdash-tui", version, about = "Terminal stock dashboard")]
struct Args {
    /// Config file. Defaults to {config_dir}/tickerdash/config.toml.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Use the built-in demo data instead of Yahoo Finance.
    #[arg(long, default_value_t = false)]
    demo: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Restore the terminal before the default hook prints the panic.
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stderr(), LeaveAlternateScreen);
        default_hook(info);
    }));

    let config = AppConfig::load_or_default(args.config.as_deref())?;
    let base_dir = AppConfig::config_dir().unwrap_or_else(|| PathBuf::from("."));
    logging::init_file(&config.log_path(&base_dir), &config.logging.level)?;

    let provider: Box<dyn DataProvider> = if args.demo {
        Box::new(StaticProvider::demo())
    } else {
        Box::new(YahooProvider::new(&config.provider).context("failed to build HTTP client")?)
    };
    info!(provider = provider.name(), "starting");

    let state_path = base_dir.join("state.json");
    let persisted = persistence::load(&state_path);

    let (cmd_tx, cmd_rx) = mpsc::channel();
    let (resp_tx, resp_rx) = mpsc::channel();
    let worker_handle = worker::spawn_worker(provider, cmd_rx, resp_tx);

    let mut app = AppState::new(
        cmd_tx.clone(),
        resp_rx,
        &config.default_ticker,
        config.default_range,
        config.export_dir.clone(),
    );
    persistence::apply(&mut app, persisted);
    app.submit();

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    let result = run_app(&mut terminal, &mut app);

    if let Err(e) = persistence::save(&state_path, &persistence::extract(&app)) {
        tracing::warn!(error = %e, "failed to save state");
    }

    let _ = cmd_tx.send(WorkerCommand::Shutdown);
    let _ = worker_handle.join();

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    info!("exited");

    result
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    while app.running {
        terminal.draw(|f| ui::draw(f, app))?;

        while let Ok(resp) = app.worker_rx.try_recv() {
            app.handle_response(resp);
        }

        // ~20 FPS tick
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                input::handle_key(app, key);
            }
        }
    }
    Ok(())
}
