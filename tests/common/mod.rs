//! Shared test fixtures
//!
//! Not every test binary uses every helper.
#![allow(dead_code)]

use async_trait::async_trait;
use autopulse::application::{CallDispatcher, CallStore, PollerConfig, StatusPoller};
use autopulse::domain::call::{CallBackend, CallDetails, CallRecord, CallStatus};
use autopulse::domain::notification::{Notice, NotificationSink};
use autopulse::domain::shared::error::DomainError;
use autopulse::domain::shared::result::Result;
use autopulse::domain::shared::value_objects::RecordId;
use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::time::Instant;

pub fn record(id: &str, status: CallStatus) -> CallRecord {
    CallRecord::new(RecordId::from(id), status, CallDetails::default())
}

pub fn rid(id: &str) -> RecordId {
    RecordId::from(id)
}

/// Backend double driven by per-record scripts
///
/// Dial outcomes and status sequences are configured up front; every
/// call is logged with its (paused-clock) timestamp so tests can assert
/// on ordering and concurrency.
#[derive(Default)]
pub struct ScriptedBackend {
    dial_outcomes: Mutex<HashMap<RecordId, DomainError>>,
    status_scripts: Mutex<HashMap<RecordId, VecDeque<Result<CallStatus>>>>,
    dial_delay: Mutex<Option<Duration>>,
    fetch_delay: Mutex<Option<Duration>>,
    dial_log: Mutex<Vec<(RecordId, Instant)>>,
    fetch_log: Mutex<Vec<(RecordId, Instant)>>,
    outstanding: Mutex<HashMap<RecordId, u32>>,
    max_overlap: AtomicU32,
}

impl ScriptedBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `dial` fail for a record
    pub fn reject_dial(&self, id: &str, error: DomainError) {
        self.dial_outcomes.lock().unwrap().insert(rid(id), error);
    }

    /// Script the statuses `fetch_status` reports for a record, in
    /// order; the final entry repeats once the script is exhausted
    pub fn script_status(&self, id: &str, steps: Vec<Result<CallStatus>>) {
        assert!(!steps.is_empty(), "status script cannot be empty");
        self.status_scripts
            .lock()
            .unwrap()
            .insert(rid(id), steps.into());
    }

    pub fn set_dial_delay(&self, delay: Duration) {
        *self.dial_delay.lock().unwrap() = Some(delay);
    }

    pub fn set_fetch_delay(&self, delay: Duration) {
        *self.fetch_delay.lock().unwrap() = Some(delay);
    }

    pub fn dial_count(&self) -> usize {
        self.dial_log.lock().unwrap().len()
    }

    pub fn dial_times(&self) -> Vec<Instant> {
        self.dial_log.lock().unwrap().iter().map(|(_, t)| *t).collect()
    }

    pub fn fetch_count(&self, id: &str) -> usize {
        let id = rid(id);
        self.fetch_log
            .lock()
            .unwrap()
            .iter()
            .filter(|(logged, _)| logged == &id)
            .count()
    }

    pub fn total_fetch_count(&self) -> usize {
        self.fetch_log.lock().unwrap().len()
    }

    /// Highest number of concurrent `fetch_status` calls observed for
    /// any single record
    pub fn max_overlap(&self) -> u32 {
        self.max_overlap.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CallBackend for ScriptedBackend {
    async fn dial(&self, id: &RecordId) -> Result<()> {
        self.dial_log
            .lock()
            .unwrap()
            .push((id.clone(), Instant::now()));

        let delay = *self.dial_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        match self.dial_outcomes.lock().unwrap().get(id) {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }

    async fn fetch_status(&self, id: &RecordId) -> Result<CallRecord> {
        self.fetch_log
            .lock()
            .unwrap()
            .push((id.clone(), Instant::now()));

        {
            let mut outstanding = self.outstanding.lock().unwrap();
            let count = outstanding.entry(id.clone()).or_insert(0);
            *count += 1;
            self.max_overlap.fetch_max(*count, Ordering::SeqCst);
        }

        let delay = *self.fetch_delay.lock().unwrap();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        *self
            .outstanding
            .lock()
            .unwrap()
            .get_mut(id)
            .expect("outstanding entry") -= 1;

        let step = {
            let mut scripts = self.status_scripts.lock().unwrap();
            let script = scripts
                .get_mut(id)
                .unwrap_or_else(|| panic!("no status script for {}", id));
            if script.len() > 1 {
                script.pop_front().unwrap()
            } else {
                script.front().unwrap().clone()
            }
        };

        step.map(|status| CallRecord::new(id.clone(), status, CallDetails::default()))
    }

    async fn list_records(&self) -> Result<Vec<CallRecord>> {
        Ok(Vec::new())
    }
}

/// Notification double collecting every published notice
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<Notice>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().unwrap().clone()
    }

    pub fn count_containing(&self, needle: &str) -> usize {
        self.notices
            .lock()
            .unwrap()
            .iter()
            .filter(|notice| notice.message.contains(needle))
            .count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn publish(&self, notice: Notice) {
        self.notices.lock().unwrap().push(notice);
    }
}

/// Fully wired dispatch/polling stack over the scripted backend
pub struct Harness {
    pub backend: Arc<ScriptedBackend>,
    pub store: Arc<CallStore>,
    pub notifier: Arc<RecordingNotifier>,
    pub poller: Arc<StatusPoller>,
    pub dispatcher: CallDispatcher,
}

pub fn harness(records: Vec<CallRecord>, config: PollerConfig) -> Harness {
    let backend = Arc::new(ScriptedBackend::new());
    let store = Arc::new(CallStore::new(64));
    store.load(records);
    let notifier = Arc::new(RecordingNotifier::new());

    let poller = StatusPoller::new(
        backend.clone(),
        store.clone(),
        notifier.clone(),
        config,
    );
    let dispatcher = CallDispatcher::new(
        backend.clone(),
        store.clone(),
        poller.clone(),
        notifier.clone(),
    );

    Harness {
        backend,
        store,
        notifier,
        poller,
        dispatcher,
    }
}
