use std::time::Duration;

use tokio::time::Instant;

/// Rate gate for inference dispatch: at most one acquisition per
/// `min_interval`, measured from the last successful acquisition.
///
/// Acquisitions only happen on ticks, so the real gap is `min_interval`
/// rounded up to the next tick. With 16 ms ticks and a 100 ms interval
/// that is every 7th tick (112 ms), about 8.9 dispatches a second. The
/// interval is a ceiling on the rate, not a target.
#[derive(Debug, Clone)]
pub struct DispatchThrottle {
    min_interval: Duration,
    last_dispatch: Option<Instant>,
}

impl DispatchThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: None,
        }
    }

    /// Claim a dispatch slot at `now`. Refused attempts leave no trace.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        match self.last_dispatch {
            Some(last) if now.saturating_duration_since(last) < self.min_interval => false,
            _ => {
                self.last_dispatch = Some(now);
                true
            }
        }
    }

    pub fn last_dispatch(&self) -> Option<Instant> {
        self.last_dispatch
    }
}
