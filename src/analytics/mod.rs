pub mod aggregate;
pub mod config;
pub mod holds;
pub mod narrative;
pub mod report;

pub use aggregate::{compute_metrics, PoseStat, SessionMetrics, TopPose};
pub use config::AggregationConfig;
pub use narrative::Narrative;
pub use report::SessionReport;
