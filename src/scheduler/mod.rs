pub mod config;
pub mod consumer;
pub mod controller;
pub mod loop_worker;
pub mod throttle;

pub use config::SchedulerConfig;
pub use controller::SchedulerController;
pub use throttle::DispatchThrottle;
