pub mod estimator;
pub mod worker;

pub use estimator::{EstimationOutcome, EstimationRequest, PoseEstimator};
pub use worker::estimation_worker;
