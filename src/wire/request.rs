//! Feature Request Decoding
//!
//! JSON request body for a feature computation and its decoding into typed
//! frames. Joint keys are resolved through a caller-supplied [`JointMap`], so
//! the engine never sees raw names or landmark indices.
//!
//! Two frame layouts are accepted:
//! - named: `{"left_wrist": {"x": 1.0, "y": 2.0, "confidence": 0.9}, ...}`
//! - indexed: `[[x, y], null, [x, y], ...]`, position = landmark index

use crate::analysis::PhaseMark;
use crate::geometry::Point2;
use crate::pose::{Joint, JointMap, KeypointFrame, Sequence};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use tracing::warn;

/// Frame rate assumed when a request omits it
pub const DEFAULT_FPS: f64 = 30.0;

/// Stroke type assumed when a request omits it
pub const DEFAULT_STROKE_TYPE: &str = "forehand";

/// What to do with a named key the joint map does not know
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnmappedJointPolicy {
    /// Fail the whole request
    #[default]
    Reject,
    /// Drop the key and log a warning
    Ignore,
}

/// Keypoint as sent by pose estimators.
///
/// Coordinates are optional on the wire so that a keypoint missing one is
/// reported against its frame and key instead of failing the whole parse.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WireKeypoint {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl WireKeypoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            confidence: None,
        }
    }

    /// Both coordinates, when present
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        Some((self.x?, self.y?))
    }
}

/// Entry of an index-keyed frame
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum IndexedKeypoint {
    /// `[x, y]` or `[x, y, confidence]`
    Array(Vec<f64>),
    /// `{"x": .., "y": ..}`
    Object(WireKeypoint),
}

/// One frame on the wire
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireFrame {
    Named(BTreeMap<String, WireKeypoint>),
    Indexed(Vec<Option<IndexedKeypoint>>),
}

/// Request body for a feature computation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureRequest {
    #[serde(default = "default_fps")]
    pub fps: f64,
    /// Echoed back only; the engine does not depend on it
    #[serde(default = "default_stroke_type")]
    pub stroke_type: String,
    #[serde(default = "default_right_handed")]
    pub right_handed: bool,
    #[serde(default)]
    pub frames: Vec<WireFrame>,
    #[serde(default)]
    pub phases: Vec<PhaseMark>,
}

fn default_fps() -> f64 {
    DEFAULT_FPS
}

fn default_stroke_type() -> String {
    DEFAULT_STROKE_TYPE.to_string()
}

fn default_right_handed() -> bool {
    true
}

impl FeatureRequest {
    /// Parse a request from JSON text
    pub fn from_json(json: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a request from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save the request as pretty JSON
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Number of frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Validate phase marks and decode frames with `decoder`
    pub fn decode(&self, decoder: &FrameDecoder<'_>) -> crate::Result<DecodedRequest> {
        if let Some(mark) = self.phases.iter().find(|m| m.label.trim().is_empty()) {
            return Err(crate::Error::InvalidInput(format!(
                "phase mark at frame {} has an empty label",
                mark.frame
            )));
        }

        Ok(DecodedRequest {
            frames: decoder.decode(&self.frames)?,
            phases: self.phases.clone(),
            fps: self.fps,
            right_handed: self.right_handed,
        })
    }
}

/// Engine inputs decoded from a request
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedRequest {
    pub frames: Sequence,
    pub phases: Vec<PhaseMark>,
    pub fps: f64,
    pub right_handed: bool,
}

/// Decoding options
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DecodeOptions {
    /// Policy for named keys missing from the joint map
    pub unmapped: UnmappedJointPolicy,
    /// Keypoints reporting a lower confidence count as not detected
    pub min_confidence: Option<f64>,
}

/// Resolves wire frames into [`KeypointFrame`]s
#[derive(Debug, Clone)]
pub struct FrameDecoder<'a> {
    map: &'a JointMap,
    options: DecodeOptions,
}

impl<'a> FrameDecoder<'a> {
    pub fn new(map: &'a JointMap) -> Self {
        Self {
            map,
            options: DecodeOptions::default(),
        }
    }

    pub fn with_options(map: &'a JointMap, options: DecodeOptions) -> Self {
        Self { map, options }
    }

    /// Decode frames in order. Frames without any usable joint are kept as
    /// empty frames so frame indices stay aligned with the video.
    pub fn decode(&self, frames: &[WireFrame]) -> crate::Result<Sequence> {
        let mut ignored = BTreeSet::new();

        let decoded = frames
            .iter()
            .enumerate()
            .map(|(index, frame)| match frame {
                WireFrame::Named(keypoints) => self.decode_named(index, keypoints, &mut ignored),
                WireFrame::Indexed(entries) => self.decode_indexed(index, entries),
            })
            .collect::<crate::Result<Sequence>>()?;

        if !ignored.is_empty() {
            warn!(
                keys = ?ignored,
                "Ignored keypoint names missing from the joint map"
            );
        }

        Ok(decoded)
    }

    fn decode_named(
        &self,
        index: usize,
        keypoints: &BTreeMap<String, WireKeypoint>,
        ignored: &mut BTreeSet<String>,
    ) -> crate::Result<KeypointFrame> {
        let mut frame = KeypointFrame::new();
        let mut seen = [false; Joint::COUNT];

        for (key, keypoint) in keypoints {
            let joint = match self.map.resolve_name(key) {
                Some(joint) => joint,
                None => match self.options.unmapped {
                    UnmappedJointPolicy::Reject => {
                        return Err(crate::Error::UnmappedJoint(format!(
                            "'{}' in frame {}",
                            key, index
                        )))
                    }
                    UnmappedJointPolicy::Ignore => {
                        ignored.insert(key.clone());
                        continue;
                    }
                },
            };

            if std::mem::replace(&mut seen[joint.slot()], true) {
                return Err(crate::Error::InvalidInput(format!(
                    "frame {} has more than one keypoint for {}",
                    index, joint
                )));
            }

            let (x, y) = keypoint.coordinates().ok_or_else(|| {
                crate::Error::InvalidInput(format!(
                    "frame {} keypoint '{}' is missing x or y",
                    index, key
                ))
            })?;

            if let Some(point) = self.accept(index, joint, x, y, keypoint.confidence)? {
                frame.set(joint, point);
            }
        }

        Ok(frame)
    }

    fn decode_indexed(
        &self,
        index: usize,
        entries: &[Option<IndexedKeypoint>],
    ) -> crate::Result<KeypointFrame> {
        let mut frame = KeypointFrame::new();

        for binding in self.map.bindings() {
            let Some(landmark) = binding.index else {
                if self.options.unmapped == UnmappedJointPolicy::Reject {
                    return Err(crate::Error::UnmappedJoint(format!(
                        "no landmark index bound for {} (frame {} is index-keyed)",
                        binding.joint, index
                    )));
                }
                continue;
            };

            let (x, y, confidence) = match entries.get(landmark) {
                None | Some(None) => continue,
                Some(Some(IndexedKeypoint::Object(kp))) => match kp.coordinates() {
                    Some((x, y)) => (x, y, kp.confidence),
                    None => {
                        return Err(crate::Error::InvalidInput(format!(
                            "frame {} landmark {} is missing x or y",
                            index, landmark
                        )))
                    }
                },
                Some(Some(IndexedKeypoint::Array(values))) => match values.as_slice() {
                    [x, y] => (*x, *y, None),
                    [x, y, c] => (*x, *y, Some(*c)),
                    _ => {
                        return Err(crate::Error::InvalidInput(format!(
                            "frame {} landmark {} must be [x, y] or [x, y, confidence], \
                             got {} values",
                            index,
                            landmark,
                            values.len()
                        )))
                    }
                },
            };

            if let Some(point) = self.accept(index, binding.joint, x, y, confidence)? {
                frame.set(binding.joint, point);
            }
        }

        Ok(frame)
    }

    /// Validate coordinates and apply the confidence gate
    fn accept(
        &self,
        index: usize,
        joint: Joint,
        x: f64,
        y: f64,
        confidence: Option<f64>,
    ) -> crate::Result<Option<Point2>> {
        let point = Point2::new(x, y);
        if !point.is_finite() {
            return Err(crate::Error::InvalidInput(format!(
                "frame {} has a non-finite position for {}",
                index, joint
            )));
        }

        if let (Some(min), Some(c)) = (self.options.min_confidence, confidence) {
            if c < min {
                return Ok(None);
            }
        }

        Ok(Some(point))
    }
}
