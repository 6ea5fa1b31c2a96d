//! # Stroke Kinematics
//!
//! Kinematic feature extraction for racquet-sport strokes. Takes the 2D
//! body keypoints a pose estimator produced for a video and derives a small
//! set of normalized descriptors anchored to named motion phases.
//!
//! ## Quick Start
//!
//! ```
//! use stroke_kinematics::{compute_features, Joint, KeypointFrame, PhaseMark, Point2};
//!
//! let frame = KeypointFrame::new()
//!     .with(Joint::LeftShoulder, Point2::new(80.0, 150.0))
//!     .with(Joint::RightShoulder, Point2::new(120.0, 150.0))
//!     .with(Joint::RightElbow, Point2::new(120.0, 210.0))
//!     .with(Joint::RightWrist, Point2::new(150.0, 250.0))
//!     .with(Joint::LeftHip, Point2::new(110.0, 300.0));
//! let frames = vec![frame; 60];
//! let phases = vec![PhaseMark::new(30, "contact")];
//!
//! let bundle = compute_features(&frames, &phases, 30.0, true).unwrap();
//! let contact = bundle.contact.unwrap();
//! assert!((contact.forward_offset_norm - 0.8).abs() < 1e-9);
//! ```
//!
//! ## Architecture
//!
//! - [`geometry`]: distance, vertex angle and line heading
//! - [`smoothing`]: centered moving average over joint tracks
//! - [`pose`]: joints, keypoint frames and the joint mapping table
//! - [`analysis`]: phase anchors and the feature extractor
//! - [`wire`]: JSON request decoding and response envelope
//! - [`app`]: CLI and configuration management
//!
//! ## Pipeline
//!
//! ```text
//! ┌─────────────┐    ┌─────────────┐    ┌─────────────┐    ┌─────────────┐
//! │  Keypoint   │───▶│  Smoothed   │───▶│   Phase     │───▶│  Feature    │
//! │   frames    │    │   tracks    │    │  anchors    │    │   bundle    │
//! └─────────────┘    └─────────────┘    └─────────────┘    └─────────────┘
//! ```

pub mod geometry;
pub mod smoothing;
pub mod pose;
pub mod analysis;
pub mod wire;
pub mod app;

// Re-export commonly used types
pub use analysis::{compute_features, FeatureBundle, FeatureExtractor, PhaseAnchors, PhaseMark};
pub use geometry::Point2;
pub use pose::{Joint, JointMap, KeypointFrame, Sequence, Side};
pub use wire::{FeatureRequest, FeatureResponse};

/// Result type alias for the feature engine
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the feature engine
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Joint {joint} is not available at frame {frame}")]
    MissingJoint { joint: Joint, frame: usize },

    #[error("Unmapped joint key: {0}")]
    UnmappedJoint(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True for errors caused by the request contents rather than the
    /// environment, so callers can report them as client errors
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidInput(_)
                | Error::MissingJoint { .. }
                | Error::UnmappedJoint(_)
                | Error::Serialization(_)
        )
    }
}
