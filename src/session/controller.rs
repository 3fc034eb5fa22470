use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::info;
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::error::MonitorError;

use super::{LivePose, Session};

/// Shared handle to the single session of a monitor instance.
///
/// Cloning is cheap; every clone sees the same session. The host calls the
/// lifecycle methods, the scheduler's result consumer is the only writer of
/// entries.
#[derive(Clone)]
pub struct SessionController {
    state: Arc<Mutex<Session>>,
    live_pose: Arc<watch::Sender<LivePose>>,
}

impl Default for SessionController {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionController {
    pub fn new() -> Self {
        let (live_pose, _) = watch::channel(LivePose::default());
        Self {
            state: Arc::new(Mutex::new(Session::new())),
            live_pose: Arc::new(live_pose),
        }
    }

    pub async fn start_session(
        &self,
        practitioner_id: impl Into<String>,
        now: DateTime<Utc>,
    ) -> Result<Uuid, MonitorError> {
        let practitioner_id = practitioner_id.into();
        let session_id = {
            let mut state = self.state.lock().await;
            state.start(practitioner_id.clone(), now)?
        };
        self.live_pose.send_replace(LivePose::default());
        info!("Session {session_id} started for {practitioner_id}");
        Ok(session_id)
    }

    pub async fn end_session(&self, now: DateTime<Utc>) -> Result<Session, MonitorError> {
        let snapshot = {
            let mut state = self.state.lock().await;
            state.end(now)?;
            state.clone()
        };
        info!(
            "Session {} ended with {} logged frames",
            snapshot.session_id.map(|id| id.to_string()).unwrap_or_default(),
            snapshot.frame_count
        );
        Ok(snapshot)
    }

    pub async fn log_pose(
        &self,
        pose_name: impl Into<String>,
        confidence: f32,
        now: DateTime<Utc>,
    ) -> Result<(), MonitorError> {
        let live = {
            let mut state = self.state.lock().await;
            state.log_pose(pose_name, confidence, now)?;
            state.live_pose.clone()
        };
        self.live_pose.send_replace(live);
        Ok(())
    }

    /// Append only if `session_id` is still the active session.
    pub async fn log_pose_for(
        &self,
        session_id: Uuid,
        pose_name: impl Into<String>,
        confidence: f32,
        now: DateTime<Utc>,
    ) -> Result<(), MonitorError> {
        let live = {
            let mut state = self.state.lock().await;
            state.log_pose_for(session_id, pose_name, confidence, now)?;
            state.live_pose.clone()
        };
        self.live_pose.send_replace(live);
        Ok(())
    }

    pub async fn reset(&self) -> Result<(), MonitorError> {
        self.state.lock().await.reset()?;
        self.live_pose.send_replace(LivePose::default());
        Ok(())
    }

    pub async fn is_active(&self) -> bool {
        self.state.lock().await.is_active()
    }

    pub async fn active_session_id(&self) -> Option<Uuid> {
        let state = self.state.lock().await;
        if state.is_active() {
            state.session_id
        } else {
            None
        }
    }

    pub async fn snapshot(&self) -> Session {
        self.state.lock().await.clone()
    }

    pub fn current_pose(&self) -> LivePose {
        self.live_pose.borrow().clone()
    }

    pub fn subscribe_live_pose(&self) -> watch::Receiver<LivePose> {
        self.live_pose.subscribe()
    }
}
