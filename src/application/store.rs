//! Shared call state

use crate::domain::call::entity::CallRecord;
use crate::domain::call::event::CallEvent;
use crate::domain::call::value_object::CallStatus;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RecordId;
use std::collections::HashMap;
use std::sync::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Framework-independent container for call record state
///
/// The single source of truth the presentation layer subscribes to.
/// Records are rebuilt from the backend on each load; every change is
/// published on a broadcast channel as a [`CallEvent`].
pub struct CallStore {
    records: RwLock<HashMap<RecordId, CallRecord>>,
    events: broadcast::Sender<CallEvent>,
}

impl CallStore {
    /// Create a store with the given event channel capacity
    pub fn new(capacity: usize) -> Self {
        let (events, _) = broadcast::channel(capacity);
        Self {
            records: RwLock::new(HashMap::new()),
            events,
        }
    }

    /// Replace all records (view mount / refresh)
    pub fn load(&self, records: Vec<CallRecord>) {
        let mut map = self.records.write().unwrap();
        map.clear();
        for record in records {
            map.insert(record.id().clone(), record);
        }
    }

    pub fn get(&self, id: &RecordId) -> Option<CallRecord> {
        self.records.read().unwrap().get(id).cloned()
    }

    pub fn status_of(&self, id: &RecordId) -> Option<CallStatus> {
        self.records.read().unwrap().get(id).map(|r| r.status())
    }

    /// All records in stable id order
    pub fn records(&self) -> Vec<CallRecord> {
        let map = self.records.read().unwrap();
        let mut records: Vec<CallRecord> = map.values().cloned().collect();
        records.sort_by(|a, b| a.id().cmp(b.id()));
        records
    }

    /// Records currently eligible for batch selection
    pub fn eligible_records(&self) -> Vec<CallRecord> {
        self.records()
            .into_iter()
            .filter(|record| record.is_eligible())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.records.read().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().unwrap().is_empty()
    }

    /// Optimistically mark a record in progress after an accepted dial
    pub fn mark_dispatched(&self, id: &RecordId) -> Result<()> {
        {
            let mut map = self.records.write().unwrap();
            let record = map
                .get_mut(id)
                .ok_or_else(|| DomainError::NotFound(id.to_string()))?;
            record.mark_dispatched()?;
        }

        self.emit(CallEvent::dispatched(id.clone()));
        Ok(())
    }

    /// Apply a backend status report, upserting unknown records
    ///
    /// Emits `StatusChanged` on any accepted change and additionally
    /// `Completed`/`Failed` when the change enters a terminal status.
    pub fn apply_report(&self, report: CallRecord) {
        let id = report.id().clone();
        let reported = report.status();

        let changed = {
            let mut map = self.records.write().unwrap();
            match map.get_mut(&id) {
                Some(record) => record.apply_status(reported),
                None => {
                    map.insert(id.clone(), report);
                    // Upserted records announce a change only when they
                    // arrive in a non-initial status
                    (reported != CallStatus::Ready).then_some(CallStatus::Ready)
                }
            }
        };

        let Some(previous) = changed else {
            return;
        };

        self.emit(CallEvent::status_changed(id.clone(), previous, reported));

        match reported {
            CallStatus::Completed => self.emit(CallEvent::completed(id)),
            CallStatus::Failed => self.emit(CallEvent::failed(id)),
            _ => {}
        }
    }

    /// Record a per-id dispatch rejection on the event stream
    pub fn record_rejection(&self, id: RecordId, reason: String) {
        self.emit(CallEvent::dispatch_rejected(id, reason));
    }

    /// Subscribe to the event stream
    pub fn subscribe(&self) -> broadcast::Receiver<CallEvent> {
        self.events.subscribe()
    }

    fn emit(&self, event: CallEvent) {
        // Send only fails when no subscriber exists, which is fine for
        // headless use
        if let Err(e) = self.events.send(event) {
            debug!("No subscribers for call event: {}", e);
        }
    }
}
