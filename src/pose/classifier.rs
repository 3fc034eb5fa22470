use serde::{Deserialize, Serialize};

use super::features::PoseFeatures;
use super::rules::{Pose, RULES};
use super::skeleton::Skeleton;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Classification {
    pub pose: Pose,
    pub confidence: f32,
}

impl Classification {
    pub const UNKNOWN: Classification = Classification {
        pose: Pose::Unknown,
        confidence: 0.0,
    };

    pub fn pose_name(&self) -> &'static str {
        self.pose.as_str()
    }

    pub fn is_unknown(&self) -> bool {
        self.pose == Pose::Unknown
    }
}

/// Label a skeleton with the first pose rule it satisfies.
pub fn classify(skeleton: &Skeleton) -> Classification {
    let features = PoseFeatures::from_skeleton(skeleton);
    RULES
        .iter()
        .find(|rule| (rule.matches)(&features))
        .map(|rule| Classification {
            pose: rule.pose,
            confidence: rule.confidence,
        })
        .unwrap_or(Classification::UNKNOWN)
}
