//! Call value objects

use crate::domain::shared::error::DomainError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Call status
///
/// The backend is authoritative for this value; the local copy may run
/// ahead optimistically (`Ready` -> `InProgress` at dispatch) and is
/// reconciled by the next status report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallStatus {
    /// Eligible for dispatch
    Ready,
    /// Dial accepted, call underway
    InProgress,
    /// Customer's phone is being alerted
    Ringing,
    /// Call finished successfully
    Completed,
    /// Call did not complete
    Failed,
}

impl CallStatus {
    /// Terminal statuses never transition to anything else
    pub fn is_terminal(&self) -> bool {
        matches!(self, CallStatus::Completed | CallStatus::Failed)
    }

    /// Whether the record can be selected for a batch action
    pub fn is_eligible(&self) -> bool {
        matches!(self, CallStatus::Ready)
    }

    /// Whether a dial may be issued for this record
    ///
    /// `Failed` is included so a user can manually retry a failed call;
    /// batch selection stays `Ready`-only.
    pub fn can_dispatch(&self) -> bool {
        matches!(self, CallStatus::Ready | CallStatus::Failed)
    }

    /// Check if a status transition is valid
    pub fn can_transition_to(&self, new_status: &CallStatus) -> bool {
        use CallStatus::*;

        match (self, new_status) {
            // No self-transitions
            (a, b) if a == b => false,

            // Completed is final
            (Completed, _) => false,

            // Failed re-opens only through a manual re-dial
            (Failed, InProgress) => true,
            (Failed, _) => false,

            // Backend owns ordering among the live statuses
            (Ready, _) => true,
            (InProgress, _) => true,
            (Ringing, _) => true,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CallStatus::Ready => "ready",
            CallStatus::InProgress => "in_progress",
            CallStatus::Ringing => "ringing",
            CallStatus::Completed => "completed",
            CallStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for CallStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CallStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "ready" => Ok(CallStatus::Ready),
            "in_progress" | "in-progress" => Ok(CallStatus::InProgress),
            "ringing" => Ok(CallStatus::Ringing),
            "completed" => Ok(CallStatus::Completed),
            "failed" => Ok(CallStatus::Failed),
            other => Err(DomainError::ValidationError(format!(
                "Unknown call status: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_terminal_statuses() {
        assert!(CallStatus::Completed.is_terminal());
        assert!(CallStatus::Failed.is_terminal());
        assert!(!CallStatus::Ready.is_terminal());
        assert!(!CallStatus::InProgress.is_terminal());
        assert!(!CallStatus::Ringing.is_terminal());
    }

    #[test]
    fn test_eligibility() {
        assert!(CallStatus::Ready.is_eligible());
        assert!(!CallStatus::InProgress.is_eligible());
        assert!(!CallStatus::Failed.is_eligible());
    }

    #[test]
    fn test_failed_records_can_be_redialed() {
        assert!(CallStatus::Failed.can_dispatch());
        assert!(CallStatus::Ready.can_dispatch());
        assert!(!CallStatus::Ringing.can_dispatch());
        assert!(!CallStatus::Completed.can_dispatch());
    }

    #[test]
    fn test_valid_transitions() {
        assert!(CallStatus::Ready.can_transition_to(&CallStatus::InProgress));
        assert!(CallStatus::InProgress.can_transition_to(&CallStatus::Ringing));
        assert!(CallStatus::Ringing.can_transition_to(&CallStatus::Completed));
        assert!(CallStatus::InProgress.can_transition_to(&CallStatus::Failed));
        assert!(CallStatus::Failed.can_transition_to(&CallStatus::InProgress));
    }

    #[test]
    fn test_completed_is_final() {
        assert!(!CallStatus::Completed.can_transition_to(&CallStatus::Ready));
        assert!(!CallStatus::Completed.can_transition_to(&CallStatus::InProgress));
        assert!(!CallStatus::Failed.can_transition_to(&CallStatus::Ready));
    }

    #[test]
    fn test_parse_wire_spellings() {
        assert_eq!("ready".parse::<CallStatus>().unwrap(), CallStatus::Ready);
        assert_eq!(
            "in_progress".parse::<CallStatus>().unwrap(),
            CallStatus::InProgress
        );
        assert_eq!(
            "in-progress".parse::<CallStatus>().unwrap(),
            CallStatus::InProgress
        );
        assert!("dialing".parse::<CallStatus>().is_err());
    }
}
