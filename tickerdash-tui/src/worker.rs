//! Background worker thread: every fetch runs here.
//!
//! Communication with the TUI main thread is via `mpsc` channels. Commands
//! are handled strictly one at a time in arrival order; an in-flight fetch
//! is never interrupted, so a burst of range changes produces one response
//! per request, in request order.

use std::sync::mpsc::{Receiver, Sender};
use std::thread::{self, JoinHandle};

use tracing::{debug, info};

use tickerdash_core::data::DataProvider;
use tickerdash_core::{load_dashboard, DashboardOutcome, DashboardRequest};

/// Commands sent from the TUI to the worker.
#[derive(Debug)]
pub enum WorkerCommand {
    Load(DashboardRequest),
    Shutdown,
}

/// Responses sent from the worker back to the TUI.
#[derive(Debug)]
pub enum WorkerResponse {
    Loaded(DashboardOutcome),
}

/// Spawn the background worker thread. The worker owns the provider.
pub fn spawn_worker(
    provider: Box<dyn DataProvider>,
    rx: Receiver<WorkerCommand>,
    tx: Sender<WorkerResponse>,
) -> JoinHandle<()> {
    thread::Builder::new()
        .name("tickerdash-worker".into())
        .spawn(move || worker_loop(provider.as_ref(), rx, tx))
        .expect("failed to spawn worker thread")
}

fn worker_loop(provider: &dyn DataProvider, rx: Receiver<WorkerCommand>, tx: Sender<WorkerResponse>) {
    info!(provider = provider.name(), "worker started");
    loop {
        match rx.recv() {
            Ok(WorkerCommand::Shutdown) | Err(_) => break,
            Ok(WorkerCommand::Load(request)) => {
                debug!(symbol = request.ticker.as_str(), range = request.range.token(), "load");
                let outcome = load_dashboard(provider, &request);
                if tx.send(WorkerResponse::Loaded(outcome)).is_err() {
                    break;
                }
            }
        }
    }
    info!("worker stopped");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::mpsc;
    use std::time::Duration;

    use tickerdash_core::data::StaticProvider;
    use tickerdash_core::domain::{Ticker, TimeRange};

    fn load(symbol: &str, range: TimeRange) -> WorkerCommand {
        WorkerCommand::Load(DashboardRequest::new(Ticker::parse(symbol).unwrap(), range))
    }

    #[test]
    fn responses_arrive_in_request_order() {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (resp_tx, resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(StaticProvider::demo()), cmd_rx, resp_tx);

        cmd_tx.send(load("AAPL", TimeRange::OneMonth)).unwrap();
        cmd_tx.send(load("ZZZZINVALID", TimeRange::OneYear)).unwrap();
        cmd_tx.send(load("MSFT", TimeRange::Max)).unwrap();

        let timeout = Duration::from_secs(10);
        let symbols: Vec<String> = (0..3)
            .map(|_| match resp_rx.recv_timeout(timeout).unwrap() {
                WorkerResponse::Loaded(outcome) => outcome.ticker().to_string(),
            })
            .collect();
        assert_eq!(symbols, ["AAPL", "ZZZZINVALID", "MSFT"]);

        cmd_tx.send(WorkerCommand::Shutdown).unwrap();
        handle.join().unwrap();
    }

    #[test]
    fn stops_when_sender_dropped() {
        let (cmd_tx, cmd_rx) = mpsc::channel::<WorkerCommand>();
        let (resp_tx, _resp_rx) = mpsc::channel();
        let handle = spawn_worker(Box::new(StaticProvider::new()), cmd_rx, resp_tx);
        drop(cmd_tx);
        handle.join().unwrap();
    }
}
