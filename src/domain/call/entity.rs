//! Call record entities

use crate::domain::call::value_object::CallStatus;
use crate::domain::shared::error::DomainError;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RecordId;
use serde::{Deserialize, Serialize};

/// Display attributes attached to a call record
///
/// Opaque to the dispatch and polling core; only the presentation layer
/// reads these.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallDetails {
    /// Customer name
    customer: Option<String>,
    /// Vehicle description
    vehicle: Option<String>,
    /// Assigned service advisor
    advisor: Option<String>,
}

impl CallDetails {
    pub fn new(
        customer: Option<String>,
        vehicle: Option<String>,
        advisor: Option<String>,
    ) -> Self {
        Self {
            customer,
            vehicle,
            advisor,
        }
    }

    pub fn customer(&self) -> Option<&str> {
        self.customer.as_deref()
    }

    pub fn vehicle(&self) -> Option<&str> {
        self.vehicle.as_deref()
    }

    pub fn advisor(&self) -> Option<&str> {
        self.advisor.as_deref()
    }
}

/// Call record
///
/// One customer callback as the backend reports it. Local state may run
/// ahead of the backend only through `mark_dispatched`; every other
/// change comes from `apply_status` with a backend-reported value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallRecord {
    /// Backend-assigned identifier
    id: RecordId,
    /// Last known status
    status: CallStatus,
    /// Display attributes (not interpreted here)
    details: CallDetails,
}

impl CallRecord {
    pub fn new(id: RecordId, status: CallStatus, details: CallDetails) -> Self {
        Self {
            id,
            status,
            details,
        }
    }

    pub fn id(&self) -> &RecordId {
        &self.id
    }

    pub fn status(&self) -> CallStatus {
        self.status
    }

    pub fn details(&self) -> &CallDetails {
        &self.details
    }

    pub fn is_eligible(&self) -> bool {
        self.status.is_eligible()
    }

    pub fn can_dispatch(&self) -> bool {
        self.status.can_dispatch()
    }

    /// Optimistically mark the record in progress after an accepted dial
    ///
    /// The next status report overwrites this.
    pub fn mark_dispatched(&mut self) -> Result<()> {
        if !self.status.can_dispatch() {
            return Err(DomainError::NotEligible(format!(
                "Record {} is {}, cannot dispatch",
                self.id, self.status
            )));
        }

        self.status = CallStatus::InProgress;
        Ok(())
    }

    /// Apply a backend-reported status
    ///
    /// Returns the previous status when the record changed, `None` when
    /// the report matched the local value or was clamped. A record that
    /// reached `Completed` locally never regresses; `Failed` stays open
    /// for the manual re-dial path.
    pub fn apply_status(&mut self, reported: CallStatus) -> Option<CallStatus> {
        if reported == self.status {
            return None;
        }

        if !self.status.can_transition_to(&reported) {
            return None;
        }

        let previous = self.status;
        self.status = reported;
        Some(previous)
    }
}
