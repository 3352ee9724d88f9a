//! Call backend interface

use crate::domain::call::entity::CallRecord;
use crate::domain::shared::result::Result;
use crate::domain::shared::value_objects::RecordId;
use async_trait::async_trait;

/// Gateway to the remote call backend
///
/// This is defined in the domain layer as a trait (port),
/// and implemented in the infrastructure layer (adapter).
///
/// `dial` has accept semantics only: it returns once the backend has
/// accepted the request, not once the call is done. Progress is observed
/// through `fetch_status`.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CallBackend: Send + Sync {
    /// Ask the backend to place the outbound call for a record
    ///
    /// `Err(Network)` means the request never reached the backend;
    /// `Err(Rejected)` means the backend declined. Neither outcome may
    /// register the record for polling.
    async fn dial(&self, id: &RecordId) -> Result<()>;

    /// Fetch the current state of one record
    ///
    /// Transient failures mean "try again next tick", never a terminal
    /// failure for the record itself.
    async fn fetch_status(&self, id: &RecordId) -> Result<CallRecord>;

    /// Fetch all records for the calling workspace
    async fn list_records(&self) -> Result<Vec<CallRecord>>;
}
