//! Feature Bundle
//!
//! Output record of one feature computation. Sub-records that could not be
//! computed (empty input) serialize as `{}` so the shape stays fixed for
//! downstream consumers.

use super::phase_anchors::PhaseAnchors;
use serde::{Deserialize, Serialize};

/// Measurements at the contact anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ContactFeatures {
    /// Horizontal lead wrist to lead hip distance, in forearm lengths
    pub forward_offset_norm: f64,
    /// Magnitude of the shoulder-line heading (degrees)
    pub torso_rotation_deg: f64,
    /// Lead elbow angle (degrees); `None` when the arm geometry is degenerate
    pub elbow_flex_deg: Option<f64>,
}

/// Measurements at the follow-through anchor
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FollowThroughFeatures {
    /// Lead wrist height above the lead shoulder, in upper-arm lengths
    pub hand_height_norm: f64,
}

/// Phase timing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimingFeatures {
    pub unit_turn_to_contact_frames: usize,
}

/// Segment lengths used as normalization denominators, in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormSegments {
    pub forearm: f64,
    pub upperarm: f64,
}

/// Invocation metadata
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureMeta {
    pub fps: f64,
    pub right_handed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub norm_segments_px: Option<NormSegments>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub anchors: Option<PhaseAnchors>,
}

/// Normalized kinematic descriptors for one stroke
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureBundle {
    #[serde(with = "section")]
    pub contact: Option<ContactFeatures>,
    #[serde(with = "section")]
    pub follow_through: Option<FollowThroughFeatures>,
    #[serde(with = "section")]
    pub timing: Option<TimingFeatures>,
    pub meta: FeatureMeta,
}

impl FeatureBundle {
    /// Neutral bundle: metadata only
    pub fn empty(fps: f64, right_handed: bool) -> Self {
        Self {
            contact: None,
            follow_through: None,
            timing: None,
            meta: FeatureMeta {
                fps,
                right_handed,
                norm_segments_px: None,
                anchors: None,
            },
        }
    }

    /// True when no measurement was taken
    pub fn is_empty(&self) -> bool {
        self.contact.is_none() && self.follow_through.is_none() && self.timing.is_none()
    }
}

/// `Option<T>` as either `T` or an empty object
mod section {
    use serde::ser::SerializeMap;
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S, T>(value: &Option<T>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
        T: Serialize,
    {
        match value {
            Some(inner) => inner.serialize(serializer),
            None => serializer.serialize_map(Some(0))?.end(),
        }
    }

    pub fn deserialize<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
    where
        D: Deserializer<'de>,
        T: Deserialize<'de>,
    {
        #[derive(Deserialize)]
        #[serde(deny_unknown_fields)]
        struct Empty {}

        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Section<T> {
            Filled(T),
            Empty(Empty),
        }

        Ok(match Section::<T>::deserialize(deserializer)? {
            Section::Filled(inner) => Some(inner),
            Section::Empty(_) => None,
        })
    }
}
