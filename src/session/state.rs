use chrono::{DateTime, Utc};
use log::warn;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::MonitorError;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "camelCase")]
pub enum SessionStatus {
    #[default]
    Idle,
    Active,
    Ended,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Idle => "Idle",
            SessionStatus::Active => "Active",
            SessionStatus::Ended => "Ended",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogEntry {
    pub pose_name: String,
    pub confidence: f32,
    pub timestamp: DateTime<Utc>,
}

/// Most recent classification, for live displays.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LivePose {
    pub pose_name: String,
    pub confidence: f32,
}

impl Default for LivePose {
    fn default() -> Self {
        Self {
            pose_name: "Waiting...".into(),
            confidence: 0.0,
        }
    }
}

/// One practitioner-monitoring interval. At most one is active per instance;
/// entries are appended in arrival order and never rewritten.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub status: SessionStatus,
    pub session_id: Option<Uuid>,
    pub practitioner_id: String,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub entries: Vec<LogEntry>,
    pub frame_count: u64,
    pub live_pose: LivePose,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    pub fn start(
        &mut self,
        practitioner_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Uuid, MonitorError> {
        if self.is_active() {
            return Err(MonitorError::InvalidState(
                "a session is already active".into(),
            ));
        }

        let session_id = Uuid::new_v4();
        *self = Self {
            status: SessionStatus::Active,
            session_id: Some(session_id),
            practitioner_id: practitioner_id.into(),
            start_time: Some(now),
            end_time: None,
            entries: Vec::new(),
            frame_count: 0,
            live_pose: LivePose::default(),
        };
        Ok(session_id)
    }

    pub fn end(&mut self, now: DateTime<Utc>) -> Result<DateTime<Utc>, MonitorError> {
        if !self.is_active() {
            return Err(MonitorError::InvalidState(format!(
                "no active session to end (session is {})",
                self.status.as_str()
            )));
        }

        let end_time = match self.start_time {
            Some(start) if now < start => {
                warn!("end time {now} precedes session start {start}; clamping");
                start
            }
            _ => now,
        };

        self.status = SessionStatus::Ended;
        self.end_time = Some(end_time);
        Ok(end_time)
    }

    pub fn log_pose(
        &mut self,
        pose_name: impl Into<String>,
        confidence: f32,
        now: DateTime<Utc>,
    ) -> Result<&LogEntry, MonitorError> {
        if !self.is_active() {
            return Err(MonitorError::InvalidState(format!(
                "cannot log a pose while the session is {}",
                self.status.as_str()
            )));
        }

        let timestamp = match self.entries.last() {
            Some(last) if now < last.timestamp => {
                warn!(
                    "pose timestamp {now} precedes previous entry {}; clamping",
                    last.timestamp
                );
                last.timestamp
            }
            _ => now,
        };

        let entry = LogEntry {
            pose_name: pose_name.into(),
            confidence,
            timestamp,
        };
        self.frame_count += 1;
        self.live_pose = LivePose {
            pose_name: entry.pose_name.clone(),
            confidence,
        };
        self.entries.push(entry);
        Ok(&self.entries[self.entries.len() - 1])
    }

    /// Like [`Session::log_pose`], but only for the session `session_id`
    /// names. Results that outlive their session land here and are refused.
    pub fn log_pose_for(
        &mut self,
        session_id: Uuid,
        pose_name: impl Into<String>,
        confidence: f32,
        now: DateTime<Utc>,
    ) -> Result<&LogEntry, MonitorError> {
        if self.session_id != Some(session_id) {
            return Err(MonitorError::InvalidState(format!(
                "result for session {session_id} does not belong to the current session"
            )));
        }
        self.log_pose(pose_name, confidence, now)
    }

    pub fn reset(&mut self) -> Result<(), MonitorError> {
        if self.is_active() {
            return Err(MonitorError::InvalidState(
                "cannot reset while a session is active".into(),
            ));
        }
        *self = Self::default();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use chrono::Duration;

    fn t0() -> DateTime<Utc> {
        DateTime::parse_from_rfc3339("2025-03-01T07:00:00Z")
            .unwrap()
            .with_timezone(&Utc)
    }

    #[test]
    fn log_before_start_is_rejected() {
        let mut session = Session::new();
        assert_matches!(
            session.log_pose("Tadasana", 0.9, t0()),
            Err(MonitorError::InvalidState(_))
        );
        assert!(session.entries.is_empty());
        assert_eq!(session.frame_count, 0);
    }

    #[test]
    fn double_start_is_rejected() {
        let mut session = Session::new();
        session.start("asha", t0()).unwrap();
        assert_matches!(
            session.start("asha", t0()),
            Err(MonitorError::InvalidState(_))
        );
    }

    #[test]
    fn end_without_start_is_rejected() {
        let mut session = Session::new();
        assert_matches!(
            session.end(t0()),
            Err(MonitorError::InvalidState(msg)) if msg.contains("Idle")
        );
    }

    #[test]
    fn rejection_names_the_current_status() {
        let mut session = Session::new();
        session.start("asha", t0()).unwrap();
        session.end(t0()).unwrap();
        assert_matches!(
            session.log_pose("Tadasana", 0.9, t0()),
            Err(MonitorError::InvalidState(msg)) if msg.contains("Ended")
        );
    }

    #[test]
    fn lifecycle_records_entries_and_timestamps() {
        let mut session = Session::new();
        let id = session.start("asha", t0()).unwrap();
        assert_eq!(session.session_id, Some(id));
        assert_eq!(session.start_time, Some(t0()));
        assert_eq!(session.end_time, None);

        session
            .log_pose("Tadasana", 0.9, t0() + Duration::milliseconds(100))
            .unwrap();
        session
            .log_pose("Unknown", 0.0, t0() + Duration::milliseconds(200))
            .unwrap();
        assert_eq!(session.frame_count, 2);
        assert_eq!(session.live_pose.pose_name, "Unknown");

        let end = session.end(t0() + Duration::seconds(5)).unwrap();
        assert_eq!(session.end_time, Some(end));
        assert_eq!(session.status, SessionStatus::Ended);

        assert_matches!(
            session.log_pose("Tadasana", 0.9, t0() + Duration::seconds(6)),
            Err(MonitorError::InvalidState(_))
        );
        assert_eq!(session.entries.len(), 2);
    }

    #[test]
    fn restart_clears_previous_entries() {
        let mut session = Session::new();
        session.start("asha", t0()).unwrap();
        session.log_pose("Savasana", 0.9, t0()).unwrap();
        session.end(t0()).unwrap();

        let later = t0() + Duration::minutes(10);
        session.start("asha", later).unwrap();
        assert!(session.entries.is_empty());
        assert_eq!(session.frame_count, 0);
        assert_eq!(session.start_time, Some(later));
    }

    #[test]
    fn out_of_order_clock_keeps_timestamps_monotonic() {
        let mut session = Session::new();
        session.start("asha", t0()).unwrap();
        session
            .log_pose("Tadasana", 0.9, t0() + Duration::seconds(2))
            .unwrap();
        let entry = session
            .log_pose("Tadasana", 0.9, t0() + Duration::seconds(1))
            .unwrap();
        assert_eq!(entry.timestamp, t0() + Duration::seconds(2));
    }

    #[test]
    fn end_before_start_is_clamped() {
        let mut session = Session::new();
        session.start("asha", t0()).unwrap();
        let end = session.end(t0() - Duration::seconds(3)).unwrap();
        assert_eq!(end, t0());
    }

    #[test]
    fn stale_session_id_is_refused() {
        let mut session = Session::new();
        let old = session.start("asha", t0()).unwrap();
        session.end(t0()).unwrap();
        session.start("asha", t0()).unwrap();

        assert_matches!(
            session.log_pose_for(old, "Tadasana", 0.9, t0()),
            Err(MonitorError::InvalidState(_))
        );
        assert!(session.entries.is_empty());
    }

    #[test]
    fn reset_only_when_inactive() {
        let mut session = Session::new();
        session.start("asha", t0()).unwrap();
        assert_matches!(session.reset(), Err(MonitorError::InvalidState(_)));

        session.log_pose("Tadasana", 0.9, t0()).unwrap();
        session.end(t0()).unwrap();
        session.reset().unwrap();
        assert_eq!(session.status, SessionStatus::Idle);
        assert!(session.entries.is_empty());
        assert_eq!(session.live_pose, LivePose::default());
    }
}
