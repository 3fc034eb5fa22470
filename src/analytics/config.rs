/// Tunables for post-session aggregation.
#[derive(Debug, Clone)]
pub struct AggregationConfig {
    /// Frames per second assumed when turning frame counts into seconds.
    /// Entries are not evenly spaced, so this is an approximation.
    pub assumed_frame_rate: f64,

    /// How many recognised poses make the "top" list.
    pub top_pose_count: usize,
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            assumed_frame_rate: 30.0,
            top_pose_count: 3,
        }
    }
}
