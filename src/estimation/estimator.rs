use tokio::time::Instant;
use uuid::Uuid;

use crate::capture::Frame;
use crate::error::EstimationError;
use crate::pose::Skeleton;

/// The pose-estimation model, seen from the outside.
///
/// `estimate` is CPU-bound and may take far longer than a scheduler tick;
/// it is only ever called from the estimation worker, on a blocking thread.
pub trait PoseEstimator: Send + Sync + 'static {
    /// Whether the backend has finished loading.
    fn is_ready(&self) -> bool;

    /// One skeleton per detected person, possibly none.
    fn estimate(&self, frame: &Frame) -> Result<Vec<Skeleton>, EstimationError>;
}

/// One dispatched inference, scheduler to worker.
#[derive(Debug, Clone)]
pub struct EstimationRequest {
    pub session_id: Uuid,
    pub sequence: u64,
    pub frame: Frame,
    pub dispatched_at: Instant,
}

/// The worker's answer to one request, worker to consumer.
#[derive(Debug)]
pub struct EstimationOutcome {
    pub session_id: Uuid,
    pub sequence: u64,
    pub result: Result<Vec<Skeleton>, EstimationError>,
}
