//! Pose model
//!
//! Joint identities, per-frame keypoints, and the injectable table that maps
//! wire keys to joints.

pub mod types;
pub mod joint_map;

pub use types::{joint_samples, Joint, KeypointFrame, Sequence, Side};
pub use joint_map::{JointBinding, JointMap};
