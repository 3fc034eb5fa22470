use std::sync::Arc;

use tokio::sync::mpsc::{error::TrySendError, Sender};
use tokio::time::{Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::capture::{Frame, FrameSource};
use crate::estimation::{EstimationRequest, PoseEstimator};
use crate::session::SessionController;

use super::config::SchedulerConfig;
use super::throttle::DispatchThrottle;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::{log_debug, log_info};

/// Everything the tick loop polls to decide whether a dispatch may happen.
#[derive(Clone)]
pub struct DispatchGate {
    pub session: SessionController,
    pub session_id: Uuid,
    pub estimator: Arc<dyn PoseEstimator>,
    pub frames: Arc<dyn FrameSource>,
}

impl DispatchGate {
    /// The current frame, if the source has one, the backend is loaded and
    /// this loop's session is still the active one.
    async fn ready_frame(&self) -> Option<Frame> {
        if !self.estimator.is_ready() {
            return None;
        }
        if self.session.active_session_id().await != Some(self.session_id) {
            return None;
        }
        self.frames.current_frame()
    }
}

/// Drive the refresh cadence into a rate-limited stream of inference
/// requests. Never waits on estimation: requests are posted and forgotten.
///
/// `requests` is the worker's mailbox. While it is full the tick is skipped
/// without touching the throttle, so the next tick after the worker frees
/// the slot may dispatch straight away.
pub async fn tick_loop(
    gate: DispatchGate,
    config: SchedulerConfig,
    requests: Sender<EstimationRequest>,
    cancel_token: CancellationToken,
) {
    let mut ticker = tokio::time::interval(config.tick_interval);
    // A late refresh is gone, not owed.
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    let mut throttle = DispatchThrottle::new(config.dispatch_interval);
    let mut sequence: u64 = 0;

    loop {
        tokio::select! {
            biased;
            _ = cancel_token.cancelled() => {
                log_info!("scheduler tick loop shutting down after {sequence} dispatches");
                break;
            }
            _ = ticker.tick() => {
                let Some(frame) = gate.ready_frame().await else {
                    continue;
                };
                let permit = match requests.try_reserve() {
                    Ok(permit) => permit,
                    Err(TrySendError::Full(())) => continue,
                    Err(TrySendError::Closed(())) => {
                        log_debug!("estimation worker gone; stopping tick loop");
                        break;
                    }
                };
                let now = Instant::now();
                if !throttle.try_acquire(now) {
                    continue;
                }

                permit.send(EstimationRequest {
                    session_id: gate.session_id,
                    sequence,
                    frame,
                    dispatched_at: now,
                });
                sequence += 1;
            }
        }
    }
}
