//! Core pose types
//!
//! Defines the joints the engine tracks and the per-frame keypoint layout.
//! Joint identity is a closed enum; how a joint is keyed on the wire lives in
//! [`JointMap`](super::joint_map::JointMap), never here.

use crate::geometry::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Body side
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    /// Lead side for a player's handedness
    pub fn from_right_handed(right_handed: bool) -> Self {
        if right_handed {
            Side::Right
        } else {
            Side::Left
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

/// Tracked anatomical landmark
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[repr(u8)]
pub enum Joint {
    LeftShoulder = 0,
    RightShoulder = 1,
    LeftElbow = 2,
    RightElbow = 3,
    LeftWrist = 4,
    RightWrist = 5,
    LeftHip = 6,
    RightHip = 7,
}

impl Joint {
    /// Number of tracked joints
    pub const COUNT: usize = 8;

    /// Every tracked joint, in slot order
    pub const ALL: [Joint; Joint::COUNT] = [
        Joint::LeftShoulder,
        Joint::RightShoulder,
        Joint::LeftElbow,
        Joint::RightElbow,
        Joint::LeftWrist,
        Joint::RightWrist,
        Joint::LeftHip,
        Joint::RightHip,
    ];

    /// Slot of this joint inside a [`KeypointFrame`]
    pub fn slot(self) -> usize {
        self as usize
    }

    pub fn shoulder(side: Side) -> Self {
        match side {
            Side::Left => Joint::LeftShoulder,
            Side::Right => Joint::RightShoulder,
        }
    }

    pub fn elbow(side: Side) -> Self {
        match side {
            Side::Left => Joint::LeftElbow,
            Side::Right => Joint::RightElbow,
        }
    }

    pub fn wrist(side: Side) -> Self {
        match side {
            Side::Left => Joint::LeftWrist,
            Side::Right => Joint::RightWrist,
        }
    }

    pub fn hip(side: Side) -> Self {
        match side {
            Side::Left => Joint::LeftHip,
            Side::Right => Joint::RightHip,
        }
    }

    pub fn side(self) -> Side {
        match self {
            Joint::LeftShoulder | Joint::LeftElbow | Joint::LeftWrist | Joint::LeftHip => {
                Side::Left
            }
            Joint::RightShoulder | Joint::RightElbow | Joint::RightWrist | Joint::RightHip => {
                Side::Right
            }
        }
    }

    /// Canonical snake_case name
    pub fn as_str(self) -> &'static str {
        match self {
            Joint::LeftShoulder => "left_shoulder",
            Joint::RightShoulder => "right_shoulder",
            Joint::LeftElbow => "left_elbow",
            Joint::RightElbow => "right_elbow",
            Joint::LeftWrist => "left_wrist",
            Joint::RightWrist => "right_wrist",
            Joint::LeftHip => "left_hip",
            Joint::RightHip => "right_hip",
        }
    }
}

impl fmt::Display for Joint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Joint positions detected at one time instant.
///
/// Joints the detector did not report are absent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct KeypointFrame {
    slots: [Option<Point2>; Joint::COUNT],
}

impl KeypointFrame {
    /// Frame with no detected joints
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert
    pub fn with(mut self, joint: Joint, point: Point2) -> Self {
        self.set(joint, point);
        self
    }

    pub fn set(&mut self, joint: Joint, point: Point2) {
        self.slots[joint.slot()] = Some(point);
    }

    pub fn remove(&mut self, joint: Joint) -> Option<Point2> {
        self.slots[joint.slot()].take()
    }

    pub fn get(&self, joint: Joint) -> Option<Point2> {
        self.slots[joint.slot()]
    }

    /// Number of detected joints
    pub fn len(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(|s| s.is_none())
    }

    /// Detected joints with their positions
    pub fn iter(&self) -> impl Iterator<Item = (Joint, Point2)> + '_ {
        Joint::ALL
            .iter()
            .filter_map(move |&joint| self.get(joint).map(|p| (joint, p)))
    }
}

impl FromIterator<(Joint, Point2)> for KeypointFrame {
    fn from_iter<I: IntoIterator<Item = (Joint, Point2)>>(iter: I) -> Self {
        let mut frame = KeypointFrame::new();
        for (joint, point) in iter {
            frame.set(joint, point);
        }
        frame
    }
}

/// Time-ordered keypoint frames. Index is the frame number.
pub type Sequence = Vec<KeypointFrame>;

/// Raw positions of one joint across a sequence
pub fn joint_samples(frames: &[KeypointFrame], joint: Joint) -> Vec<Option<Point2>> {
    frames.iter().map(|f| f.get(joint)).collect()
}
