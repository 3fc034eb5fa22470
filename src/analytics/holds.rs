use chrono::{DateTime, Utc};

use crate::session::LogEntry;

/// A run of consecutive log entries with the same pose.
#[derive(Debug, Clone, PartialEq)]
pub struct PoseHold {
    pub pose_name: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub frame_count: usize,
}

impl PoseHold {
    /// Wall-clock span from first to last entry of the run.
    pub fn duration_secs(&self) -> f64 {
        (self.end_time - self.start_time).num_milliseconds() as f64 / 1000.0
    }
}

/// Split the log into holds, in log order.
pub fn group_holds(entries: &[LogEntry]) -> Vec<PoseHold> {
    let mut holds: Vec<PoseHold> = Vec::new();

    for entry in entries {
        match holds.last_mut() {
            Some(hold) if hold.pose_name == entry.pose_name => {
                hold.end_time = entry.timestamp;
                hold.frame_count += 1;
            }
            _ => holds.push(PoseHold {
                pose_name: entry.pose_name.clone(),
                start_time: entry.timestamp,
                end_time: entry.timestamp,
                frame_count: 1,
            }),
        }
    }

    holds
}

/// Longest single hold of `pose_name`, in seconds.
pub fn longest_hold_secs(holds: &[PoseHold], pose_name: &str) -> f64 {
    holds
        .iter()
        .filter(|hold| hold.pose_name == pose_name)
        .map(PoseHold::duration_secs)
        .fold(0.0, f64::max)
}
