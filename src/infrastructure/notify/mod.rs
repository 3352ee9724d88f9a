//! Notification adapters

use crate::domain::notification::{Notice, NoticeLevel, NotificationSink};
use tracing::{info, warn};

/// Publishes notices through the tracing pipeline
///
/// The headless stand-in for the web client's toast stack.
#[derive(Debug, Default)]
pub struct TracingNotifier;

impl TracingNotifier {
    pub fn new() -> Self {
        Self
    }
}

impl NotificationSink for TracingNotifier {
    fn publish(&self, notice: Notice) {
        let record_id = notice
            .record_id
            .as_ref()
            .map(|id| id.to_string())
            .unwrap_or_default();

        match notice.level {
            NoticeLevel::Info => info!(%record_id, "{}", notice.message),
            NoticeLevel::Error => warn!(%record_id, "{}", notice.message),
        }
    }
}
