use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::Utc;
use log::{info, warn};
use tokio::sync::{watch, Mutex};
use uuid::Uuid;

use crate::analytics::{AggregationConfig, SessionReport};
use crate::capture::FrameSource;
use crate::estimation::PoseEstimator;
use crate::scheduler::{SchedulerConfig, SchedulerController};
use crate::session::{LivePose, SessionController};
use crate::settings::MonitorSettings;

/// One practitioner-facing monitor: a session, the scheduler feeding it and
/// the backend/frame source the scheduler polls.
pub struct PoseMonitor {
    session: SessionController,
    scheduler: Mutex<SchedulerController>,
    estimator: Arc<dyn PoseEstimator>,
    frames: Arc<dyn FrameSource>,
    scheduler_config: SchedulerConfig,
    aggregation_config: AggregationConfig,
}

impl PoseMonitor {
    pub fn new(
        estimator: Arc<dyn PoseEstimator>,
        frames: Arc<dyn FrameSource>,
        settings: &MonitorSettings,
    ) -> Self {
        Self {
            session: SessionController::new(),
            scheduler: Mutex::new(SchedulerController::new()),
            estimator,
            frames,
            scheduler_config: settings.scheduler_config(),
            aggregation_config: settings.aggregation_config(),
        }
    }

    pub fn session(&self) -> &SessionController {
        &self.session
    }

    /// Start a session and begin scheduling inference against it.
    pub async fn start(&self, practitioner_id: &str) -> Result<Uuid> {
        let session_id = self
            .session
            .start_session(practitioner_id, Utc::now())
            .await?;

        let mut scheduler = self.scheduler.lock().await;
        if scheduler.is_running() {
            // Left over from a session ended through the session handle.
            warn!("Scheduler from a previous session still running; stopping it");
            if let Err(err) = scheduler.stop().await {
                self.session.end_session(Utc::now()).await?;
                return Err(err.context("failed to stop previous scheduler"));
            }
        }
        if let Err(err) = scheduler.start(
            self.session.clone(),
            session_id,
            Arc::clone(&self.estimator),
            Arc::clone(&self.frames),
            self.scheduler_config.clone(),
        ) {
            warn!("Scheduler failed to start, closing session {session_id}: {err}");
            self.session.end_session(Utc::now()).await?;
            return Err(err.context("failed to start scheduler"));
        }

        Ok(session_id)
    }

    /// End the session, stop scheduling and return the final report.
    ///
    /// The session is closed before the scheduler is torn down, so anything
    /// still in flight at that point is refused rather than logged. The
    /// scheduler is stopped even when there was no active session to end.
    pub async fn stop(&self) -> Result<SessionReport> {
        let ended = self.session.end_session(Utc::now()).await;

        self.scheduler
            .lock()
            .await
            .stop()
            .await
            .context("failed to stop scheduler")?;

        let ended = ended?;

        let report = SessionReport::from_session(&ended, &self.aggregation_config, Utc::now());
        info!(
            "Session {} report ready: {} entries over {:.2} min",
            ended
                .session_id
                .map(|id| id.to_string())
                .unwrap_or_default(),
            report.entries.len(),
            report.duration_minutes
        );
        Ok(report)
    }

    /// Report for the current session state; works mid-session too.
    pub async fn report(&self) -> SessionReport {
        let snapshot = self.session.snapshot().await;
        SessionReport::from_session(&snapshot, &self.aggregation_config, Utc::now())
    }

    pub async fn reset(&self) -> Result<()> {
        self.session.reset().await?;
        Ok(())
    }

    pub async fn is_active(&self) -> bool {
        self.session.is_active().await
    }

    pub fn current_pose(&self) -> LivePose {
        self.session.current_pose()
    }

    pub fn subscribe_live_pose(&self) -> watch::Receiver<LivePose> {
        self.session.subscribe_live_pose()
    }
}
