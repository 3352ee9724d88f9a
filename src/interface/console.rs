//! Console rendering of call state

use crate::application::store::CallStore;
use crate::domain::call::event::CallEvent;
use std::sync::Arc;
use tokio::sync::broadcast::error::RecvError;
use tokio::task::JoinHandle;
use tracing::debug;

/// Prints one line per call event
///
/// The thinnest possible presentation layer; anything richer subscribes
/// to the store the same way.
pub struct ConsoleRenderer {
    store: Arc<CallStore>,
}

impl ConsoleRenderer {
    pub fn new(store: Arc<CallStore>) -> Self {
        Self { store }
    }

    /// Subscribe to the store and render until the channel closes
    pub fn spawn(&self) -> JoinHandle<()> {
        let mut events = self.store.subscribe();

        tokio::spawn(async move {
            loop {
                match events.recv().await {
                    Ok(event) => println!("{}", Self::render_line(&event)),
                    Err(RecvError::Lagged(skipped)) => {
                        debug!(skipped, "Renderer fell behind event stream");
                    }
                    Err(RecvError::Closed) => break,
                }
            }
        })
    }

    fn render_line(event: &CallEvent) -> String {
        let id = event.record_id();
        match event {
            CallEvent::Dispatched(_) => format!("  {} ... dialing", id),
            CallEvent::StatusChanged(e) => format!("  {} ... {}", id, e.to),
            CallEvent::Completed(_) => format!("✔ {} completed", id),
            CallEvent::Failed(_) => format!("✘ {} failed", id),
            CallEvent::DispatchRejected(e) => format!("✘ {} rejected: {}", id, e.reason),
        }
    }
}
