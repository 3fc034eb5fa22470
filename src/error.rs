#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MonitorError {
    #[error("Invalid state: {0}")]
    InvalidState(String),
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EstimationError {
    #[error("Estimator not ready")]
    NotReady,

    #[error("Estimation failed: {0}")]
    Backend(String),

    #[error("Estimation worker failed: {0}")]
    Worker(String),

    #[error("Malformed skeleton: expected {expected} keypoints, got {actual}")]
    MalformedSkeleton { expected: usize, actual: usize },
}
