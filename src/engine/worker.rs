use std::sync::mpsc;
use std::thread;

use log::{debug, warn};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::{UnboundedSender, unbounded_channel};

use crate::data::{BarSource, BarStore, FetchDirection, FetchLock, FetchOutcome};
use crate::engine::messages::{EngineCommand, EngineEvent, SessionParams};

/// UI-side handle onto a running chart engine. Commands go in over an
/// unbounded channel; events come back over a std receiver the UI drains
/// once per frame.
pub struct EngineHandle {
    cmd_tx: UnboundedSender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
    fetch_lock: FetchLock,
}

impl EngineHandle {
    pub fn send(&self, cmd: EngineCommand) {
        if self.cmd_tx.send(cmd).is_err() {
            warn!("engine worker is gone; dropping {cmd:?}");
        }
    }

    pub fn try_event(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    pub fn is_fetching(&self) -> bool {
        self.fetch_lock.is_fetching()
    }
}

/// Spawns a worker thread owning the store and the remote source. The
/// worker runs its own runtime; it exits when the handle is dropped.
pub fn spawn<S>(source: S, session: SessionParams) -> EngineHandle
where
    S: BarSource + 'static,
{
    let (cmd_tx, mut cmd_rx) = unbounded_channel::<EngineCommand>();
    let (event_tx, event_rx) = mpsc::channel::<EngineEvent>();

    let mut store = BarStore::new(
        source,
        session.symbol,
        session.timeframe,
        session.start,
        session.end,
    );
    let fetch_lock = store.fetch_lock();

    thread::spawn(move || {
        let rt = Runtime::new().expect("Failed to create runtime");
        rt.block_on(async move {
            while let Some(cmd) = cmd_rx.recv().await {
                let initial = matches!(cmd, EngineCommand::LoadInitial);
                let result = match cmd {
                    EngineCommand::LoadInitial => store.load_initial().await,
                    EngineCommand::Extend {
                        direction: FetchDirection::Backward,
                        amount,
                    } => store.extend_backward(amount, true).await,
                    EngineCommand::Extend {
                        direction: FetchDirection::Forward,
                        amount,
                    } => store.extend_forward(amount).await,
                };

                let event = match result {
                    Ok(FetchOutcome::Loaded { added, adjustment }) => {
                        debug!("merged {added} bars, cursors now {:?}", store.cursors());
                        match store.current_window() {
                            Ok(window) => EngineEvent::Window { window, adjustment, initial },
                            Err(e) => EngineEvent::Failed(format!("{e:#}")),
                        }
                    }
                    Ok(FetchOutcome::Empty) => EngineEvent::Empty,
                    Ok(FetchOutcome::Skipped(reason)) => EngineEvent::Skipped(reason),
                    Err(e) => EngineEvent::Failed(format!("{e:#}")),
                };
                if event_tx.send(event).is_err() {
                    break; // UI went away
                }
            }
        });
    });

    EngineHandle { cmd_tx, event_rx, fetch_lock }
}
