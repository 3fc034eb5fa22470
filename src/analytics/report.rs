use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::session::{LogEntry, Session};

use super::aggregate::{compute_metrics, SessionMetrics};
use super::config::AggregationConfig;

/// Everything a document renderer needs for one session.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionReport {
    pub practitioner_id: String,
    pub session_id: Option<Uuid>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_minutes: f64,
    pub entries: Vec<LogEntry>,
    /// `None` when nothing was logged.
    pub metrics: Option<SessionMetrics>,
}

impl SessionReport {
    /// Build from a session snapshot. For a session still running, the
    /// duration runs up to `now`.
    pub fn from_session(session: &Session, config: &AggregationConfig, now: DateTime<Utc>) -> Self {
        let duration_minutes = match session.start_time {
            Some(start) => {
                let end = session.end_time.unwrap_or(now);
                (end - start).num_milliseconds().max(0) as f64 / 60_000.0
            }
            None => 0.0,
        };

        Self {
            practitioner_id: session.practitioner_id.clone(),
            session_id: session.session_id,
            start_time: session.start_time,
            end_time: session.end_time,
            duration_minutes,
            metrics: compute_metrics(&session.entries, config),
            entries: session.entries.clone(),
        }
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
