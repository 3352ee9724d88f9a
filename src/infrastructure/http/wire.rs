//! Wire payload normalization
//!
//! The backend has grown several spellings for the same fields over
//! time. All of that variance is absorbed here; the rest of the system
//! only ever sees the canonical [`CallRecord`] shape.

use crate::domain::call::entity::{CallDetails, CallRecord};
use crate::domain::call::value_object::CallStatus;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RecordId;
use serde::Deserialize;

/// One call record as the backend serializes it
#[derive(Debug, Clone, Deserialize)]
pub struct WireCallRecord {
    pub id: String,
    pub status: String,
    #[serde(default, alias = "customerName")]
    pub customer_name: Option<String>,
    #[serde(default, alias = "vehicleModel", alias = "vehicle_model")]
    pub vehicle: Option<String>,
    #[serde(default, alias = "advisorName", alias = "service_advisor")]
    pub advisor: Option<String>,
}

impl WireCallRecord {
    /// Normalize into the canonical record shape
    pub fn into_record(self) -> Result<CallRecord> {
        let status: CallStatus = self.status.parse()?;
        Ok(CallRecord::new(
            RecordId::new(self.id),
            status,
            CallDetails::new(self.customer_name, self.vehicle, self.advisor),
        ))
    }
}

/// Record list, with or without an envelope
///
/// Older backend builds return a bare array from `GET /calls`; newer
/// ones wrap it as `{ "calls": [...] }`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum WireRecordList {
    Plain(Vec<WireCallRecord>),
    Wrapped { calls: Vec<WireCallRecord> },
}

impl WireRecordList {
    pub fn into_records(self) -> Result<Vec<CallRecord>> {
        let wire = match self {
            WireRecordList::Plain(records) => records,
            WireRecordList::Wrapped { calls } => calls,
        };

        wire.into_iter().map(WireCallRecord::into_record).collect()
    }
}
