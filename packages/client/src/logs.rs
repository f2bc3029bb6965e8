use std::sync::Arc;

use common::webhook::WebhookLog;
use tracing::error;

use crate::backend::RecordStore;
use crate::session::Session;

/// Rows shown by the log viewer.
pub const RECENT_LOG_LIMIT: u64 = 10;

/// The most recent webhook log rows for the signed-in user.
pub struct WebhookLogFeed {
    records: Arc<dyn RecordStore>,
    entries: Vec<WebhookLog>,
}

impl WebhookLogFeed {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self {
            records,
            entries: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[WebhookLog] {
        &self.entries
    }

    /// Reload the feed. Errors are logged and keep the previous entries.
    pub async fn refresh(&mut self, session: &Session) {
        match self.records.recent_logs(session, RECENT_LOG_LIMIT).await {
            Ok(entries) => self.entries = entries,
            Err(e) => error!("Error fetching webhook logs: {}", e),
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
