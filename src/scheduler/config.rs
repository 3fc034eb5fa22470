use std::time::Duration;

/// Timing knobs for the inference scheduler.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    /// Host refresh cadence; one readiness check per tick.
    pub tick_interval: Duration,

    /// Minimum gap between two dispatched inference requests. Rounded up to
    /// a whole number of ticks in practice.
    pub dispatch_interval: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            tick_interval: Duration::from_millis(16),
            dispatch_interval: Duration::from_millis(100),
        }
    }
}
