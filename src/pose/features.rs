use crate::geometry::angle_degrees;

use super::skeleton::{Landmark, Skeleton};

/// Angle at `vertex`, or `None` unless all three landmarks are visible.
fn joint(skeleton: &Skeleton, a: Landmark, vertex: Landmark, c: Landmark) -> Option<f32> {
    let a = skeleton.visible(a)?;
    let b = skeleton.visible(vertex)?;
    let c = skeleton.visible(c)?;
    Some(angle_degrees(Some(a), Some(b), Some(c)))
}

/// Joint angles for one side of the body.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SideAngles {
    /// shoulder-elbow-wrist
    pub elbow: Option<f32>,
    /// hip-shoulder-elbow (arm abduction)
    pub shoulder: Option<f32>,
    /// shoulder-hip-knee
    pub hip: Option<f32>,
    /// hip-knee-ankle
    pub knee: Option<f32>,
}

/// Everything the pose rules look at, derived once per skeleton.
///
/// Comparisons go through [`gt`]/[`lt`] so an unmeasurable value never
/// satisfies a predicate, whichever way it points.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PoseFeatures {
    pub left: SideAngles,
    pub right: SideAngles,
    /// Horizontal distance between the wrists.
    pub wrist_gap: Option<f32>,
    /// Left shoulder to left ankle span, `(width, height)`.
    pub body_span: Option<(f32, f32)>,
    pub left_shoulder_y: Option<f32>,
    pub left_hip_y: Option<f32>,
    pub left_ankle_y: Option<f32>,
    pub left_wrist_y: Option<f32>,
}

impl PoseFeatures {
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        use Landmark::*;

        let left = SideAngles {
            elbow: joint(skeleton, LeftShoulder, LeftElbow, LeftWrist),
            shoulder: joint(skeleton, LeftHip, LeftShoulder, LeftElbow),
            hip: joint(skeleton, LeftShoulder, LeftHip, LeftKnee),
            knee: joint(skeleton, LeftHip, LeftKnee, LeftAnkle),
        };
        let right = SideAngles {
            elbow: joint(skeleton, RightShoulder, RightElbow, RightWrist),
            shoulder: joint(skeleton, RightHip, RightShoulder, RightElbow),
            hip: joint(skeleton, RightShoulder, RightHip, RightKnee),
            knee: joint(skeleton, RightHip, RightKnee, RightAnkle),
        };

        let wrist_gap = skeleton
            .visible(LeftWrist)
            .zip(skeleton.visible(RightWrist))
            .map(|(l, r)| (l.x - r.x).abs());

        let shoulder = skeleton.visible(LeftShoulder);
        let ankle = skeleton.visible(LeftAnkle);
        let body_span = shoulder
            .zip(ankle)
            .map(|(s, a)| ((s.x - a.x).abs(), (s.y - a.y).abs()));

        Self {
            left,
            right,
            wrist_gap,
            body_span,
            left_shoulder_y: shoulder.map(|p| p.y),
            left_hip_y: skeleton.visible(LeftHip).map(|p| p.y),
            left_ankle_y: ankle.map(|p| p.y),
            left_wrist_y: skeleton.visible(LeftWrist).map(|p| p.y),
        }
    }

    /// Legs straight and hips open on both sides.
    pub fn upright_legs(&self) -> bool {
        gt(self.left.knee, 160.0)
            && gt(self.right.knee, 160.0)
            && gt(self.left.hip, 160.0)
            && gt(self.right.hip, 160.0)
    }

    /// Body laid out more horizontally than vertically.
    pub fn horizontal(&self) -> bool {
        self.body_span.is_some_and(|(width, height)| width > height)
    }

    /// One knee below `bent`, the other above `straight`, either side.
    pub fn one_knee_bent(&self, bent: f32, straight: f32) -> bool {
        (lt(self.left.knee, bent) && gt(self.right.knee, straight))
            || (lt(self.right.knee, bent) && gt(self.left.knee, straight))
    }
}

pub fn gt(value: Option<f32>, threshold: f32) -> bool {
    value.is_some_and(|v| v > threshold)
}

pub fn lt(value: Option<f32>, threshold: f32) -> bool {
    value.is_some_and(|v| v < threshold)
}

/// True when both values are known and `lhs < rhs`.
pub fn below(lhs: Option<f32>, rhs: Option<f32>) -> bool {
    matches!((lhs, rhs), (Some(l), Some(r)) if l < r)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_values_fail_both_directions() {
        assert!(!gt(None, 160.0));
        assert!(!lt(None, 160.0));
        assert!(!below(None, Some(1.0)));
        assert!(!below(Some(1.0), None));
        assert!(below(Some(1.0), Some(2.0)));
    }

    #[test]
    fn occluded_ankle_drops_knee_angle_and_span() {
        let mut rows = vec![[100.0, 100.0, 0.9]; 17];
        rows[Landmark::LeftHip.index()] = [100.0, 200.0, 0.9];
        rows[Landmark::LeftKnee.index()] = [100.0, 300.0, 0.9];
        rows[Landmark::LeftAnkle.index()] = [100.0, 400.0, 0.1];
        let skeleton = Skeleton::from_rows(&rows).unwrap();

        let features = PoseFeatures::from_skeleton(&skeleton);
        assert_eq!(features.left.knee, None);
        assert_eq!(features.body_span, None);
        assert_eq!(features.left_ankle_y, None);
        assert!(features.left.hip.is_some());
    }
}
