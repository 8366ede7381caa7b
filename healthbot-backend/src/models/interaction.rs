use chrono::{DateTime, Utc};
use serde::Serialize;

/// One logged conversational exchange. Append-only; written by the
/// conversational front-end, read only by the dashboard.
#[derive(Debug, Clone, Serialize)]
pub struct Interaction {
    pub id: i64,
    pub user_id: String,
    pub channel: String,
    pub intent: String,
    pub message: String,
    pub response: String,
    pub created_at: DateTime<Utc>,
}
