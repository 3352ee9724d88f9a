//! Batch selection tracking

use crate::domain::call::entity::CallRecord;
use crate::domain::shared::value_objects::RecordId;
use std::collections::BTreeSet;

/// Records a user has marked for batch dispatch
///
/// Eligibility is re-checked at select time, not only at render time; a
/// status update landing between render and click must not let an
/// in-flight or finished record slip into a batch. The selection is
/// consumed by `drain` when the batch dispatches, regardless of how the
/// individual dials turn out.
#[derive(Debug, Default)]
pub struct SelectionSet {
    ids: BTreeSet<RecordId>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a record; returns false when the record is not eligible
    /// or was already selected
    pub fn select(&mut self, record: &CallRecord) -> bool {
        if !record.is_eligible() {
            return false;
        }

        self.ids.insert(record.id().clone())
    }

    /// Deselect; returns false when the id was not selected
    pub fn deselect(&mut self, id: &RecordId) -> bool {
        self.ids.remove(id)
    }

    /// Select every eligible record, skipping ineligible ones
    ///
    /// Returns the number of newly selected records.
    pub fn select_all<'a>(&mut self, records: impl IntoIterator<Item = &'a CallRecord>) -> usize {
        records
            .into_iter()
            .filter(|record| self.select(record))
            .count()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    /// Consume the selection for dispatch
    pub fn drain(&mut self) -> Vec<RecordId> {
        std::mem::take(&mut self.ids).into_iter().collect()
    }

    pub fn contains(&self, id: &RecordId) -> bool {
        self.ids.contains(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &RecordId> {
        self.ids.iter()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
