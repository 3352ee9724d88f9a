//! User notifications
//!
//! Fire-and-forget messages surfaced to the user (toasts in the web
//! client). The core publishes and moves on; sinks are never awaited
//! and never queried.

use crate::domain::shared::value_objects::RecordId;
use serde::{Deserialize, Serialize};

/// Notice severity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A message for the user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub record_id: Option<RecordId>,
    pub message: String,
}

impl Notice {
    pub fn call_completed(record_id: RecordId) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: format!("Call {} completed", record_id),
            record_id: Some(record_id),
        }
    }

    pub fn call_failed(record_id: RecordId) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("Call {} failed", record_id),
            record_id: Some(record_id),
        }
    }

    pub fn dispatch_rejected(record_id: RecordId, reason: &str) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!("Could not start call {}: {}", record_id, reason),
            record_id: Some(record_id),
        }
    }

    pub fn polling_abandoned(record_id: RecordId, attempts: u32) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: format!(
                "Stopped checking call {} after {} failed status checks",
                record_id, attempts
            ),
            record_id: Some(record_id),
        }
    }

    pub fn batch_summary(dispatched: usize, rejected: usize) -> Self {
        Self {
            level: if rejected == 0 {
                NoticeLevel::Info
            } else {
                NoticeLevel::Error
            },
            record_id: None,
            message: format!("{} calls started, {} rejected", dispatched, rejected),
        }
    }
}

/// Sink for user notifications
#[cfg_attr(test, mockall::automock)]
pub trait NotificationSink: Send + Sync {
    /// Publish a notice; must not block or fail
    fn publish(&self, notice: Notice);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_summary_level_follows_rejections() {
        assert_eq!(Notice::batch_summary(3, 0).level, NoticeLevel::Info);
        assert_eq!(Notice::batch_summary(2, 1).level, NoticeLevel::Error);
        assert_eq!(
            Notice::batch_summary(2, 1).message,
            "2 calls started, 1 rejected"
        );
    }

    #[test]
    fn test_notice_constructors_carry_record_id() {
        let notice = Notice::call_completed(RecordId::from("c-7"));
        assert_eq!(notice.record_id, Some(RecordId::from("c-7")));
        assert_eq!(notice.level, NoticeLevel::Info);

        let notice = Notice::call_failed(RecordId::from("c-8"));
        assert_eq!(notice.level, NoticeLevel::Error);
    }
}
