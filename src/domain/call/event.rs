//! Call domain events

use crate::domain::call::value_object::CallStatus;
use crate::domain::shared::events::{DomainEvent, EventMetadata};
use crate::domain::shared::value_objects::RecordId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Base struct for all call events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEventBase {
    pub metadata: EventMetadata,
    pub record_id: RecordId,
}

impl CallEventBase {
    fn new(event_type: &str, record_id: RecordId) -> Self {
        Self {
            metadata: EventMetadata::new(event_type.to_string()),
            record_id,
        }
    }
}

/// Dial accepted; record optimistically in progress
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallDispatched {
    pub base: CallEventBase,
}

impl DomainEvent for CallDispatched {
    fn event_type(&self) -> &'static str {
        "call.dispatched"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Backend reported a status different from the local value
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallStatusChanged {
    pub base: CallEventBase,
    pub from: CallStatus,
    pub to: CallStatus,
}

impl DomainEvent for CallStatusChanged {
    fn event_type(&self) -> &'static str {
        "call.status_changed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call reached `Completed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallCompleted {
    pub base: CallEventBase,
}

impl DomainEvent for CallCompleted {
    fn event_type(&self) -> &'static str {
        "call.completed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Call reached `Failed`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallFailed {
    pub base: CallEventBase,
}

impl DomainEvent for CallFailed {
    fn event_type(&self) -> &'static str {
        "call.failed"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Backend declined a dial request; record unchanged
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchRejected {
    pub base: CallEventBase,
    pub reason: String,
}

impl DomainEvent for DispatchRejected {
    fn event_type(&self) -> &'static str {
        "call.dispatch_rejected"
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.base.metadata.occurred_at
    }
}

/// Union of all call events
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum CallEvent {
    Dispatched(CallDispatched),
    StatusChanged(CallStatusChanged),
    Completed(CallCompleted),
    Failed(CallFailed),
    DispatchRejected(DispatchRejected),
}

impl CallEvent {
    pub fn dispatched(record_id: RecordId) -> Self {
        CallEvent::Dispatched(CallDispatched {
            base: CallEventBase::new("call.dispatched", record_id),
        })
    }

    pub fn status_changed(record_id: RecordId, from: CallStatus, to: CallStatus) -> Self {
        CallEvent::StatusChanged(CallStatusChanged {
            base: CallEventBase::new("call.status_changed", record_id),
            from,
            to,
        })
    }

    pub fn completed(record_id: RecordId) -> Self {
        CallEvent::Completed(CallCompleted {
            base: CallEventBase::new("call.completed", record_id),
        })
    }

    pub fn failed(record_id: RecordId) -> Self {
        CallEvent::Failed(CallFailed {
            base: CallEventBase::new("call.failed", record_id),
        })
    }

    pub fn dispatch_rejected(record_id: RecordId, reason: String) -> Self {
        CallEvent::DispatchRejected(DispatchRejected {
            base: CallEventBase::new("call.dispatch_rejected", record_id),
            reason,
        })
    }

    pub fn record_id(&self) -> &RecordId {
        match self {
            CallEvent::Dispatched(e) => &e.base.record_id,
            CallEvent::StatusChanged(e) => &e.base.record_id,
            CallEvent::Completed(e) => &e.base.record_id,
            CallEvent::Failed(e) => &e.base.record_id,
            CallEvent::DispatchRejected(e) => &e.base.record_id,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_id_accessor() {
        let event = CallEvent::completed(RecordId::from("c-9"));
        assert_eq!(event.record_id(), &RecordId::from("c-9"));

        let event = CallEvent::status_changed(
            RecordId::from("c-3"),
            CallStatus::InProgress,
            CallStatus::Ringing,
        );
        assert_eq!(event.record_id(), &RecordId::from("c-3"));
    }

    #[test]
    fn test_event_types() {
        let event = CallCompleted {
            base: CallEventBase::new("call.completed", RecordId::from("c-1")),
        };
        assert_eq!(event.event_type(), "call.completed");
    }
}
