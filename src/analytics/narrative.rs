use serde::{Deserialize, Serialize};

use super::aggregate::PoseStat;

pub const HOLD_FEEDBACK: &str = "Focus on maintaining steady breathing and core engagement.";

const GENERAL_ADVICE: &str = "Listen to your body. Yoga is not about touching your toes, \
it is about what you learn on the way down.";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Narrative {
    pub strength: String,
    pub growth: String,
    pub advice: String,
}

/// Fixed-template summary. `best` is the longest-held recognised pose,
/// `weakest` the shortest; both `None` when nothing was recognised.
pub fn compose(best: Option<&PoseStat>, weakest: Option<&PoseStat>) -> Narrative {
    let strength = match best {
        Some(stat) => format!(
            "You showed great endurance in {}, holding it for {:.1}s with {:.0}% confidence.",
            stat.pose_name,
            stat.estimated_seconds,
            stat.avg_confidence * 100.0
        ),
        None => "No recognised poses were held long enough to assess this session.".to_string(),
    };

    let growth = match weakest {
        Some(stat) => format!(
            "{} was fleeting. Practice holding it for 5 deep breaths.",
            stat.pose_name
        ),
        None => "Hold each pose steadily in view of the camera so it can be recognised.".to_string(),
    };

    Narrative {
        strength,
        growth,
        advice: GENERAL_ADVICE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stat(name: &str, seconds: f64, confidence: f64) -> PoseStat {
        PoseStat {
            pose_name: name.into(),
            frame_count: (seconds * 30.0) as usize,
            estimated_seconds: seconds,
            avg_confidence: confidence,
        }
    }

    #[test]
    fn cites_best_and_weakest() {
        let best = stat("Tadasana", 12.34, 0.9);
        let weakest = stat("Savasana", 0.2, 0.9);
        let narrative = compose(Some(&best), Some(&weakest));

        assert_eq!(
            narrative.strength,
            "You showed great endurance in Tadasana, holding it for 12.3s with 90% confidence."
        );
        assert_eq!(
            narrative.growth,
            "Savasana was fleeting. Practice holding it for 5 deep breaths."
        );
        assert!(narrative.advice.starts_with("Listen to your body."));
    }

    #[test]
    fn neutral_without_recognised_poses() {
        let narrative = compose(None, None);
        assert!(!narrative.strength.contains("endurance"));
        assert!(!narrative.growth.contains("fleeting"));
    }
}
