pub mod analytics;
pub mod capture;
pub mod error;
pub mod estimation;
pub mod geometry;
pub mod monitor;
pub mod pose;
pub mod scheduler;
pub mod session;
pub mod settings;
pub mod utils;

pub use analytics::{compute_metrics, AggregationConfig, SessionMetrics, SessionReport};
pub use capture::{Frame, FrameSource, SharedFrameSource};
pub use error::{EstimationError, MonitorError};
pub use estimation::PoseEstimator;
pub use geometry::{angle_degrees, Point};
pub use monitor::PoseMonitor;
pub use pose::{classify, Classification, Landmark, Pose, Skeleton};
pub use session::{LivePose, LogEntry, Session, SessionController, SessionStatus};
pub use settings::{MonitorSettings, SettingsStore};
pub use utils::init_logging;
