//! Status polling

use crate::application::store::CallStore;
use crate::domain::call::backend::CallBackend;
use crate::domain::call::entity::CallRecord;
use crate::domain::call::value_object::CallStatus;
use crate::domain::notification::{Notice, NotificationSink};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::value_objects::RecordId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, warn};

/// How often outstanding calls are checked
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(3000);

/// Poller tuning
#[derive(Debug, Clone)]
pub struct PollerConfig {
    /// Tick period for the shared timer
    pub interval: Duration,
    /// Consecutive transient failures tolerated per record before its
    /// polling is abandoned; `None` retries forever
    pub max_transient_failures: Option<u32>,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            interval: DEFAULT_POLL_INTERVAL,
            max_transient_failures: None,
        }
    }
}

#[derive(Debug, Default)]
struct PollEntry {
    /// A status query for this record is currently outstanding
    in_flight: bool,
    /// Consecutive transient failures
    failures: u32,
}

struct PollerState {
    /// Records currently being polled
    polling: HashMap<RecordId, PollEntry>,
    /// The single shared timer; present only while the set is non-empty
    timer: Option<JoinHandle<()>>,
    /// Bumped on shutdown so late responses are discarded
    generation: u64,
}

/// Polls the backend for outstanding call statuses
///
/// One shared timer serves every registered record. Each tick snapshots
/// the current membership and issues one concurrent status query per
/// record that has none outstanding; a record leaves the set when the
/// backend reports a terminal status. The timer stops as soon as the set
/// empties and restarts on the next registration.
pub struct StatusPoller {
    backend: Arc<dyn CallBackend>,
    store: Arc<CallStore>,
    notifier: Arc<dyn NotificationSink>,
    config: PollerConfig,
    state: Mutex<PollerState>,
    /// Weak handle to self for the timer task, so an abandoned poller
    /// does not keep its own timer alive
    self_ref: Weak<StatusPoller>,
}

enum PollAction {
    Apply { report: CallRecord, terminal: bool },
    Retry { error: DomainError, failures: u32 },
    Abandon { error: DomainError, failures: u32 },
    Discard,
}

impl StatusPoller {
    pub fn new(
        backend: Arc<dyn CallBackend>,
        store: Arc<CallStore>,
        notifier: Arc<dyn NotificationSink>,
        config: PollerConfig,
    ) -> Arc<Self> {
        Arc::new_cyclic(|self_ref| Self {
            backend,
            store,
            notifier,
            config,
            state: Mutex::new(PollerState {
                polling: HashMap::new(),
                timer: None,
                generation: 0,
            }),
            self_ref: self_ref.clone(),
        })
    }

    /// Register a record for status polling
    ///
    /// Starts the shared timer if this is the first record. Registering
    /// a record that is already polling is a no-op; returns whether the
    /// record was newly registered.
    pub fn register(&self, id: RecordId) -> bool {
        let mut state = self.state.lock().unwrap();
        if state.polling.contains_key(&id) {
            debug!(record_id = %id, "Already polling, ignoring duplicate registration");
            return false;
        }

        state.polling.insert(id.clone(), PollEntry::default());
        if state.timer.is_none() {
            state.timer = Some(self.spawn_timer(state.generation));
            debug!(interval = ?self.config.interval, "Status polling timer started");
        }

        info!(record_id = %id, "Polling call status");
        true
    }

    /// Whether a record is currently registered
    pub fn is_polling(&self, id: &RecordId) -> bool {
        self.state.lock().unwrap().polling.contains_key(id)
    }

    /// Number of records currently registered
    pub fn polling_count(&self) -> usize {
        self.state.lock().unwrap().polling.len()
    }

    /// Stop polling entirely (view unmount)
    ///
    /// Clears the set and the timer; responses still in flight observe a
    /// stale generation and are discarded rather than applied.
    pub fn shutdown(&self) {
        let timer = {
            let mut state = self.state.lock().unwrap();
            state.generation += 1;
            state.polling.clear();
            state.timer.take()
        };

        if let Some(handle) = timer {
            handle.abort();
            info!("Status polling stopped");
        }
    }

    fn spawn_timer(&self, generation: u64) -> JoinHandle<()> {
        let weak = self.self_ref.clone();
        let period = self.config.interval;

        tokio::spawn(async move {
            // First fire one full period after registration, matching
            // the web client's cadence
            let mut ticker = time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                ticker.tick().await;
                let Some(poller) = weak.upgrade() else {
                    break;
                };

                for id in poller.snapshot_due(generation) {
                    tokio::spawn(Arc::clone(&poller).poll_one(id, generation));
                }
            }
        })
    }

    /// Snapshot the records due for a query this tick
    ///
    /// Membership is read under the lock and not mutated during
    /// iteration; records with a query still outstanding are skipped so
    /// no record ever has two concurrent queries.
    fn snapshot_due(&self, generation: u64) -> Vec<RecordId> {
        let mut state = self.state.lock().unwrap();
        if state.generation != generation {
            return Vec::new();
        }

        state
            .polling
            .iter_mut()
            .filter(|(_, entry)| !entry.in_flight)
            .map(|(id, entry)| {
                entry.in_flight = true;
                id.clone()
            })
            .collect()
    }

    async fn poll_one(self: Arc<Self>, id: RecordId, generation: u64) {
        let result = self.backend.fetch_status(&id).await;

        let (action, stopped_timer) = {
            let mut state = self.state.lock().unwrap();
            if state.generation != generation {
                (PollAction::Discard, None)
            } else if let Some(entry) = state.polling.get_mut(&id) {
                entry.in_flight = false;

                match result {
                    Ok(report) => {
                        entry.failures = 0;
                        let terminal = report.status().is_terminal();
                        if terminal {
                            state.polling.remove(&id);
                        }
                        let timer = state
                            .polling
                            .is_empty()
                            .then(|| state.timer.take())
                            .flatten();
                        (PollAction::Apply { report, terminal }, timer)
                    }
                    Err(error) => {
                        entry.failures += 1;
                        let failures = entry.failures;

                        match self.config.max_transient_failures {
                            Some(cap) if failures >= cap => {
                                state.polling.remove(&id);
                                let timer = state
                                    .polling
                                    .is_empty()
                                    .then(|| state.timer.take())
                                    .flatten();
                                (PollAction::Abandon { error, failures }, timer)
                            }
                            _ => (PollAction::Retry { error, failures }, None),
                        }
                    }
                }
            } else {
                // Deregistered while the query was outstanding
                (PollAction::Discard, None)
            }
        };

        if let Some(handle) = stopped_timer {
            handle.abort();
            debug!("Polling set empty, timer stopped");
        }

        match action {
            PollAction::Apply { report, terminal } => {
                let status = report.status();
                self.store.apply_report(report);

                if terminal {
                    info!(record_id = %id, status = %status, "Call finished");
                    let notice = match status {
                        CallStatus::Completed => Notice::call_completed(id),
                        _ => Notice::call_failed(id),
                    };
                    self.notifier.publish(notice);
                }
            }
            PollAction::Retry { error, failures } => {
                warn!(
                    record_id = %id,
                    failures,
                    "Status check failed, retrying next tick: {}",
                    error
                );
            }
            PollAction::Abandon { error, failures } => {
                warn!(
                    record_id = %id,
                    failures,
                    "Giving up on status checks: {}",
                    error
                );
                self.notifier.publish(Notice::polling_abandoned(id, failures));
            }
            PollAction::Discard => {}
        }
    }
}
