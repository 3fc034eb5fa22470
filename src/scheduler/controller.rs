use std::sync::Arc;

use anyhow::{bail, Context, Result};
use log::info;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::capture::FrameSource;
use crate::estimation::{estimation_worker, PoseEstimator};
use crate::session::SessionController;

use super::config::SchedulerConfig;
use super::consumer::result_consumer;
use super::loop_worker::{tick_loop, DispatchGate};

/// Owns the three tasks of one scheduling run: tick loop, estimation
/// worker and result consumer. They share a single cancellation token.
pub struct SchedulerController {
    handles: Vec<JoinHandle<()>>,
    cancel_token: Option<CancellationToken>,
}

impl Default for SchedulerController {
    fn default() -> Self {
        Self::new()
    }
}

impl SchedulerController {
    pub fn new() -> Self {
        Self {
            handles: Vec::new(),
            cancel_token: None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.cancel_token.is_some()
    }

    pub fn start(
        &mut self,
        session: SessionController,
        session_id: Uuid,
        estimator: Arc<dyn PoseEstimator>,
        frames: Arc<dyn FrameSource>,
        config: SchedulerConfig,
    ) -> Result<()> {
        if self.is_running() {
            bail!("scheduler already running");
        }

        let cancel_token = CancellationToken::new();
        // Single-slot mailbox: at most one request waits behind the one the
        // worker is running.
        let (request_tx, request_rx) = mpsc::channel(1);
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();

        let gate = DispatchGate {
            session: session.clone(),
            session_id,
            estimator: Arc::clone(&estimator),
            frames,
        };

        self.handles = vec![
            tokio::spawn(tick_loop(gate, config, request_tx, cancel_token.clone())),
            tokio::spawn(estimation_worker(
                estimator,
                request_rx,
                outcome_tx,
                cancel_token.clone(),
            )),
            tokio::spawn(result_consumer(session, outcome_rx, cancel_token.clone())),
        ];
        self.cancel_token = Some(cancel_token);

        info!("Scheduler started for session {session_id}");
        Ok(())
    }

    /// Stop dispatching, drop whatever is in flight and wait for all tasks.
    pub async fn stop(&mut self) -> Result<()> {
        let Some(token) = self.cancel_token.take() else {
            return Ok(());
        };
        token.cancel();

        for handle in self.handles.drain(..) {
            handle.await.context("scheduler task failed to join")?;
        }
        info!("Scheduler stopped");
        Ok(())
    }
}

impl Drop for SchedulerController {
    fn drop(&mut self) {
        if let Some(token) = self.cancel_token.take() {
            token.cancel();
        }
    }
}
