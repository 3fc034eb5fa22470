pub mod classifier;
pub mod features;
pub mod rules;
pub mod skeleton;

pub use classifier::{classify, Classification};
pub use rules::{Pose, UNKNOWN_POSE};
pub use skeleton::{Keypoint, Landmark, Skeleton, VISIBILITY_THRESHOLD};
