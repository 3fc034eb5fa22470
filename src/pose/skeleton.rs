use serde::{Deserialize, Serialize};

use crate::error::EstimationError;
use crate::geometry::Point;

/// Keypoints scoring at or below this are treated as undetected.
pub const VISIBILITY_THRESHOLD: f32 = 0.3;

pub const LANDMARK_COUNT: usize = 17;

/// COCO body landmarks, in the order pose estimators emit them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Landmark {
    Nose = 0,
    LeftEye = 1,
    RightEye = 2,
    LeftEar = 3,
    RightEar = 4,
    LeftShoulder = 5,
    RightShoulder = 6,
    LeftElbow = 7,
    RightElbow = 8,
    LeftWrist = 9,
    RightWrist = 10,
    LeftHip = 11,
    RightHip = 12,
    LeftKnee = 13,
    RightKnee = 14,
    LeftAnkle = 15,
    RightAnkle = 16,
}

impl Landmark {
    pub const ALL: [Landmark; LANDMARK_COUNT] = [
        Landmark::Nose,
        Landmark::LeftEye,
        Landmark::RightEye,
        Landmark::LeftEar,
        Landmark::RightEar,
        Landmark::LeftShoulder,
        Landmark::RightShoulder,
        Landmark::LeftElbow,
        Landmark::RightElbow,
        Landmark::LeftWrist,
        Landmark::RightWrist,
        Landmark::LeftHip,
        Landmark::RightHip,
        Landmark::LeftKnee,
        Landmark::RightKnee,
        Landmark::LeftAnkle,
        Landmark::RightAnkle,
    ];

    pub const fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Keypoint {
    pub landmark: Landmark,
    pub x: f32,
    pub y: f32,
    pub score: f32,
}

impl Keypoint {
    pub fn is_visible(&self) -> bool {
        self.score > VISIBILITY_THRESHOLD
    }

    pub fn position(&self) -> Point {
        Point::new(self.x, self.y)
    }
}

/// One person's landmarks for one frame. Always holds all 17 landmarks,
/// slot `i` belonging to `Landmark::ALL[i]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Skeleton {
    keypoints: [Keypoint; LANDMARK_COUNT],
}

impl Skeleton {
    /// Build from `(x, y, score)` rows in COCO order, the layout most
    /// estimator backends produce.
    pub fn from_rows(rows: &[[f32; 3]]) -> Result<Self, EstimationError> {
        if rows.len() != LANDMARK_COUNT {
            return Err(EstimationError::MalformedSkeleton {
                expected: LANDMARK_COUNT,
                actual: rows.len(),
            });
        }

        let keypoints = std::array::from_fn(|i| {
            let [x, y, score] = rows[i];
            Keypoint {
                landmark: Landmark::ALL[i],
                x,
                y,
                score,
            }
        });

        Ok(Self { keypoints })
    }

    /// Build from keypoints in any order. Every landmark must appear exactly once.
    pub fn from_keypoints(points: Vec<Keypoint>) -> Result<Self, EstimationError> {
        let actual = points.len();
        let mut slots: [Option<Keypoint>; LANDMARK_COUNT] = [None; LANDMARK_COUNT];
        for point in points {
            slots[point.landmark.index()] = Some(point);
        }

        let filled = slots.iter().flatten().count();
        if actual != LANDMARK_COUNT || filled != LANDMARK_COUNT {
            return Err(EstimationError::MalformedSkeleton {
                expected: LANDMARK_COUNT,
                actual: filled.min(actual),
            });
        }

        let keypoints = std::array::from_fn(|i| {
            slots[i].unwrap_or(Keypoint {
                landmark: Landmark::ALL[i],
                x: 0.0,
                y: 0.0,
                score: 0.0,
            })
        });
        Ok(Self { keypoints })
    }

    pub fn keypoint(&self, landmark: Landmark) -> &Keypoint {
        &self.keypoints[landmark.index()]
    }

    pub fn keypoints(&self) -> &[Keypoint; LANDMARK_COUNT] {
        &self.keypoints
    }

    /// Position of `landmark` if it was detected with enough confidence.
    pub fn visible(&self, landmark: Landmark) -> Option<Point> {
        let keypoint = self.keypoint(landmark);
        keypoint.is_visible().then(|| keypoint.position())
    }

    pub fn visible_count(&self) -> usize {
        self.keypoints.iter().filter(|k| k.is_visible()).count()
    }
}
