//! Kinematic feature analysis
//!
//! This module turns a keypoint sequence into phase-anchored,
//! scale-invariant stroke descriptors:
//! - Phase anchor resolution with contact-relative fallbacks
//! - Lead-arm measurements at contact and follow-through
//! - The fixed-shape feature bundle returned to callers

pub mod phase_anchors;
pub mod bundle;
pub mod features;

pub use phase_anchors::{resolve_anchors, PhaseAnchors, PhaseMark, PhaseResolver};
pub use bundle::{
    ContactFeatures, FeatureBundle, FeatureMeta, FollowThroughFeatures, NormSegments,
    TimingFeatures,
};
pub use features::{compute_features, ExtractorParams, FeatureExtractor};
