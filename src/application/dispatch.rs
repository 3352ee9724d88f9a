//! Batch call dispatch

use crate::application::poller::StatusPoller;
use crate::application::store::CallStore;
use crate::domain::call::backend::CallBackend;
use crate::domain::call::selection::SelectionSet;
use crate::domain::notification::{Notice, NotificationSink};
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RecordId;
use futures::future;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, warn};

/// Result of a batch dispatch
///
/// A batch never fails as a whole; each record succeeds or is rejected
/// on its own.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Records whose dial was accepted and which are now polling
    pub dispatched: Vec<RecordId>,
    /// Records the backend declined or that failed the eligibility gate
    pub rejected: Vec<(RecordId, DomainError)>,
}

impl BatchOutcome {
    pub fn dispatched_count(&self) -> usize {
        self.dispatched.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }
}

/// Dispatches calls for selected records
///
/// Owns the selection. Dispatching consumes the whole selection and
/// fans the dial requests out concurrently; one declined record never
/// blocks or rolls back the others.
pub struct CallDispatcher {
    backend: Arc<dyn CallBackend>,
    store: Arc<CallStore>,
    poller: Arc<StatusPoller>,
    notifier: Arc<dyn NotificationSink>,
    selection: Mutex<SelectionSet>,
}

impl CallDispatcher {
    pub fn new(
        backend: Arc<dyn CallBackend>,
        store: Arc<CallStore>,
        poller: Arc<StatusPoller>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        Self {
            backend,
            store,
            poller,
            notifier,
            selection: Mutex::new(SelectionSet::new()),
        }
    }

    /// Select a record for the next batch
    ///
    /// Eligibility is checked against the store now, not at render time;
    /// returns false when the record is unknown, ineligible, or already
    /// selected.
    pub fn select(&self, id: &RecordId) -> bool {
        let Some(record) = self.store.get(id) else {
            debug!(record_id = %id, "Cannot select unknown record");
            return false;
        };

        self.selection.lock().unwrap().select(&record)
    }

    pub fn deselect(&self, id: &RecordId) -> bool {
        self.selection.lock().unwrap().deselect(id)
    }

    /// Select every currently eligible record; returns how many were added
    pub fn select_all(&self) -> usize {
        let eligible = self.store.eligible_records();
        self.selection.lock().unwrap().select_all(&eligible)
    }

    pub fn clear_selection(&self) {
        self.selection.lock().unwrap().clear();
    }

    pub fn is_selected(&self, id: &RecordId) -> bool {
        self.selection.lock().unwrap().contains(id)
    }

    pub fn selected(&self) -> Vec<RecordId> {
        self.selection.lock().unwrap().ids().cloned().collect()
    }

    /// Dispatch a call for every selected record
    ///
    /// The selection is consumed up front, regardless of individual
    /// outcomes. All dials are issued concurrently.
    pub async fn dispatch_batch(&self) -> BatchOutcome {
        let ids = self.selection.lock().unwrap().drain();
        if ids.is_empty() {
            debug!("Dispatch requested with empty selection");
            return BatchOutcome::default();
        }

        info!(batch_size = ids.len(), "Dispatching call batch");

        let dials = ids.into_iter().map(|id| async move {
            let result = self.dial_one(&id).await;
            (id, result)
        });
        let results = future::join_all(dials).await;

        let mut outcome = BatchOutcome::default();
        for (id, result) in results {
            match result {
                Ok(()) => outcome.dispatched.push(id),
                Err(error) => outcome.rejected.push((id, error)),
            }
        }

        self.notifier.publish(Notice::batch_summary(
            outcome.dispatched_count(),
            outcome.rejected_count(),
        ));

        outcome
    }

    /// Dispatch a call for a single record
    ///
    /// The inline per-row action. Also the manual-retry path: a `Failed`
    /// record may be re-dialed here even though it can no longer be
    /// batch-selected.
    pub async fn dispatch(&self, id: &RecordId) -> Result<()> {
        self.dial_one(id).await
    }

    async fn dial_one(&self, id: &RecordId) -> Result<()> {
        // Re-check at dispatch time; the status may have moved since the
        // record was selected
        match self.store.status_of(id) {
            None => {
                let error = DomainError::NotFound(id.to_string());
                self.reject(id, &error);
                return Err(error);
            }
            Some(status) if !status.can_dispatch() => {
                let error =
                    DomainError::NotEligible(format!("Record {} is {}", id, status));
                self.reject(id, &error);
                return Err(error);
            }
            Some(_) => {}
        }

        if self.poller.is_polling(id) {
            let error =
                DomainError::NotEligible(format!("Record {} already has a call in flight", id));
            self.reject(id, &error);
            return Err(error);
        }

        match self.backend.dial(id).await {
            Ok(()) => {
                self.store.mark_dispatched(id)?;
                self.poller.register(id.clone());
                info!(record_id = %id, "Call dispatched");
                Ok(())
            }
            Err(error) => {
                // Record stays as it was, eligible for another attempt
                self.reject(id, &error);
                Err(error)
            }
        }
    }

    fn reject(&self, id: &RecordId, error: &DomainError) {
        warn!(record_id = %id, "Dispatch rejected: {}", error);
        self.store.record_rejection(id.clone(), error.to_string());
        self.notifier
            .publish(Notice::dispatch_rejected(id.clone(), &error.to_string()));
    }
}
