use common::webhook::{LogStatus, WebhookLog};
use serde::Deserialize;
use utoipa::IntoParams;

use crate::entity::webhook_log;

/// Most rows the log feed returns.
pub const MAX_LOG_LIMIT: u64 = 10;

#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct WebhookLogQuery {
    /// Number of rows, clamped to 1-10 (default 10).
    pub limit: Option<u64>,
}

impl WebhookLogQuery {
    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(MAX_LOG_LIMIT).clamp(1, MAX_LOG_LIMIT)
    }
}

impl From<webhook_log::Model> for WebhookLog {
    fn from(m: webhook_log::Model) -> Self {
        Self {
            id: m.id,
            event_type: m.event_type,
            user_id: m.user_id,
            payload: m.payload,
            // Unknown tags read back as failures.
            status: m.status.parse().unwrap_or(LogStatus::Failure),
            created_at: m.created_at,
        }
    }
}
