use serde::{Deserialize, Serialize};

use super::features::{below, gt, lt, PoseFeatures};

pub const UNKNOWN_POSE: &str = "Unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pose {
    /// Prayer stance.
    Pranamasana,
    /// Mountain stance.
    Tadasana,
    /// Tree, one-leg balance.
    Vrikshasana,
    /// Plank.
    Phalakasana,
    /// Downward-facing dog.
    #[serde(rename = "Adho Mukha Svanasana")]
    AdhoMukhaSvanasana,
    /// Warrior II.
    #[serde(rename = "Virabhadrasana II")]
    VirabhadrasanaII,
    /// Corpse, lying flat.
    Savasana,
    /// Low lunge.
    #[serde(rename = "Ashwa Sanchalanasana")]
    AshwaSanchalanasana,
    Unknown,
}

impl Pose {
    pub fn as_str(&self) -> &'static str {
        match self {
            Pose::Pranamasana => "Pranamasana",
            Pose::Tadasana => "Tadasana",
            Pose::Vrikshasana => "Vrikshasana",
            Pose::Phalakasana => "Phalakasana",
            Pose::AdhoMukhaSvanasana => "Adho Mukha Svanasana",
            Pose::VirabhadrasanaII => "Virabhadrasana II",
            Pose::Savasana => "Savasana",
            Pose::AshwaSanchalanasana => "Ashwa Sanchalanasana",
            Pose::Unknown => UNKNOWN_POSE,
        }
    }
}

impl std::fmt::Display for Pose {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A geometric signature and the label it earns. Confidence is a fixed
/// property of the rule, not a measure of fit.
pub struct PoseRule {
    pub pose: Pose,
    pub confidence: f32,
    pub matches: fn(&PoseFeatures) -> bool,
}

/// Evaluated top to bottom; the first matching rule decides.
pub static RULES: [PoseRule; 8] = [
    PoseRule {
        pose: Pose::Pranamasana,
        confidence: 0.85,
        matches: prayer,
    },
    PoseRule {
        pose: Pose::Tadasana,
        confidence: 0.9,
        matches: mountain,
    },
    PoseRule {
        pose: Pose::Vrikshasana,
        confidence: 0.85,
        matches: tree,
    },
    PoseRule {
        pose: Pose::Phalakasana,
        confidence: 0.8,
        matches: plank,
    },
    PoseRule {
        pose: Pose::AdhoMukhaSvanasana,
        confidence: 0.9,
        matches: downward_dog,
    },
    PoseRule {
        pose: Pose::VirabhadrasanaII,
        confidence: 0.85,
        matches: warrior_two,
    },
    PoseRule {
        pose: Pose::Savasana,
        confidence: 0.9,
        matches: corpse,
    },
    PoseRule {
        pose: Pose::AshwaSanchalanasana,
        confidence: 0.8,
        matches: low_lunge,
    },
];

fn prayer(f: &PoseFeatures) -> bool {
    f.upright_legs()
        && lt(f.left.elbow, 160.0)
        && lt(f.right.elbow, 160.0)
        && lt(f.wrist_gap, 50.0)
}

fn mountain(f: &PoseFeatures) -> bool {
    f.upright_legs() && lt(f.left.shoulder, 30.0) && lt(f.right.shoulder, 30.0)
}

fn tree(f: &PoseFeatures) -> bool {
    f.one_knee_bent(100.0, 160.0) && (gt(f.left.hip, 150.0) || gt(f.right.hip, 150.0))
}

fn plank(f: &PoseFeatures) -> bool {
    gt(f.left.elbow, 160.0) && gt(f.right.elbow, 160.0) && f.upright_legs() && f.horizontal()
}

fn downward_dog(f: &PoseFeatures) -> bool {
    below(f.left_hip_y, f.left_shoulder_y)
        && below(f.left_hip_y, f.left_ankle_y)
        && lt(f.left.hip, 100.0)
        && lt(f.right.hip, 100.0)
        && gt(f.left.knee, 150.0)
        && gt(f.right.knee, 150.0)
}

fn warrior_two(f: &PoseFeatures) -> bool {
    let arm_level = |angle: Option<f32>| angle.is_some_and(|a| (a - 90.0).abs() < 30.0);
    arm_level(f.left.shoulder) && arm_level(f.right.shoulder) && f.one_knee_bent(110.0, 150.0)
}

fn corpse(f: &PoseFeatures) -> bool {
    f.upright_legs() && f.horizontal()
}

fn low_lunge(f: &PoseFeatures) -> bool {
    // Larger Y is lower in the frame: hands below shoulders.
    f.one_knee_bent(100.0, 120.0) && below(f.left_shoulder_y, f.left_wrist_y)
}
