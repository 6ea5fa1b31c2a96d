//! Phase-Anchored Feature Extraction
//!
//! Smooths every joint track, resolves the phase anchors, then measures the
//! lead arm at contact and follow-through. Pixel measurements are divided by
//! an arm segment length taken at the contact frame, so results compare
//! across players and camera distances.
//!
//! Extraction is a pure function of its inputs: no state survives a call and
//! a single extractor can be shared across threads.

use super::bundle::{
    ContactFeatures, FeatureBundle, FeatureMeta, FollowThroughFeatures, NormSegments,
    TimingFeatures,
};
use super::phase_anchors::{PhaseMark, PhaseResolver};
use crate::geometry::{angle_at, distance, line_heading, Point2};
use crate::pose::{joint_samples, Joint, KeypointFrame, Side};
use crate::smoothing::{smooth_track, Track, DEFAULT_WINDOW};
use tracing::debug;

/// Segment lengths at or below this are treated as zero
pub const DEFAULT_NORM_EPSILON: f64 = 1e-6;

/// Tunable extraction parameters
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtractorParams {
    /// Moving-average window (frames)
    pub smoothing_window: usize,
    /// Anchor fallbacks
    pub phases: PhaseResolver,
    /// Degenerate segment-length threshold (pixels)
    pub norm_epsilon: f64,
}

impl Default for ExtractorParams {
    fn default() -> Self {
        Self {
            smoothing_window: DEFAULT_WINDOW,
            phases: PhaseResolver::new(),
            norm_epsilon: DEFAULT_NORM_EPSILON,
        }
    }
}

/// Feature extraction engine
#[derive(Debug, Clone, Default)]
pub struct FeatureExtractor {
    params: ExtractorParams,
}

impl FeatureExtractor {
    /// Create with default parameters
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: ExtractorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ExtractorParams {
        &self.params
    }

    /// Compute the feature bundle for one stroke.
    ///
    /// `fps` is only carried into the metadata. An empty sequence yields a
    /// neutral bundle; a lead-arm joint missing at a measured frame is an
    /// error rather than a silently wrong number.
    pub fn compute(
        &self,
        frames: &[KeypointFrame],
        phases: &[PhaseMark],
        fps: f64,
        right_handed: bool,
    ) -> crate::Result<FeatureBundle> {
        if !fps.is_finite() || fps <= 0.0 {
            return Err(crate::Error::InvalidInput(format!(
                "fps must be a positive number, got {}",
                fps
            )));
        }

        let anchors = match self.params.phases.resolve(phases, frames.len()) {
            Some(anchors) => anchors,
            None => {
                debug!("Empty keypoint sequence, returning neutral feature bundle");
                return Ok(FeatureBundle::empty(fps, right_handed));
            }
        };
        debug!(
            frames = frames.len(),
            unit_turn = anchors.unit_turn,
            contact = anchors.contact,
            follow_through = anchors.follow_through,
            "Resolved phase anchors"
        );

        let tracks = JointTracks::smooth(frames, self.params.smoothing_window);
        let lead = Side::from_right_handed(right_handed);

        // Contact
        let contact = anchors.contact;
        let wrist = tracks.require(Joint::wrist(lead), contact)?;
        let elbow = tracks.require(Joint::elbow(lead), contact)?;
        let shoulder = tracks.require(Joint::shoulder(lead), contact)?;
        let lead_hip = tracks.require(Joint::hip(lead.opposite()), contact)?;
        let left_shoulder = tracks.require(Joint::LeftShoulder, contact)?;
        let right_shoulder = tracks.require(Joint::RightShoulder, contact)?;

        let forearm = distance(elbow, wrist);
        let upperarm = distance(shoulder, elbow);

        let forward_offset_norm = self.normalize((wrist.x - lead_hip.x).abs(), forearm, "forearm");
        let torso_rotation_deg = line_heading(left_shoulder, right_shoulder).abs();
        let elbow_flex_deg = angle_at(elbow, shoulder, wrist);
        if elbow_flex_deg.is_none() {
            debug!(frame = contact, "Elbow angle undefined at contact (coincident joints)");
        }

        // Follow-through, normalized by the upper arm measured at contact
        let follow = anchors.follow_through;
        let wrist_follow = tracks.require(Joint::wrist(lead), follow)?;
        let shoulder_follow = tracks.require(Joint::shoulder(lead), follow)?;
        // y grows downward, so height above the shoulder is the negated delta
        let hand_rise = -(wrist_follow.y - shoulder_follow.y);
        let hand_height_norm = self.normalize(hand_rise, upperarm, "upperarm");

        Ok(FeatureBundle {
            contact: Some(ContactFeatures {
                forward_offset_norm,
                torso_rotation_deg,
                elbow_flex_deg,
            }),
            follow_through: Some(FollowThroughFeatures { hand_height_norm }),
            timing: Some(TimingFeatures {
                unit_turn_to_contact_frames: anchors.unit_turn_to_contact(),
            }),
            meta: FeatureMeta {
                fps,
                right_handed,
                norm_segments_px: Some(NormSegments { forearm, upperarm }),
                anchors: Some(anchors),
            },
        })
    }

    /// Divide by a segment length, falling back to 1.0 when it is degenerate.
    ///
    /// With the fallback the result is the raw pixel magnitude.
    fn normalize(&self, value: f64, segment_len: f64, segment: &str) -> f64 {
        if segment_len > self.params.norm_epsilon {
            value / segment_len
        } else {
            debug!(segment, segment_len, "Degenerate segment length, using raw magnitude");
            value
        }
    }
}

/// Compute features with default parameters
pub fn compute_features(
    frames: &[KeypointFrame],
    phases: &[PhaseMark],
    fps: f64,
    right_handed: bool,
) -> crate::Result<FeatureBundle> {
    FeatureExtractor::new().compute(frames, phases, fps, right_handed)
}

/// Smoothed tracks for every joint of one sequence
struct JointTracks {
    tracks: [Track; Joint::COUNT],
}

impl JointTracks {
    fn smooth(frames: &[KeypointFrame], window: usize) -> Self {
        Self {
            tracks: std::array::from_fn(|slot| {
                smooth_track(&joint_samples(frames, Joint::ALL[slot]), window)
            }),
        }
    }

    fn require(&self, joint: Joint, frame: usize) -> crate::Result<Point2> {
        self.tracks[joint.slot()]
            .at(frame)
            .ok_or(crate::Error::MissingJoint { joint, frame })
    }
}
