//! Wire boundary
//!
//! JSON request decoding and the response envelope. Everything past this
//! module works on typed joints and frames only.

pub mod request;
pub mod response;

pub use request::{
    DecodeOptions, DecodedRequest, FeatureRequest, FrameDecoder, IndexedKeypoint,
    UnmappedJointPolicy, WireFrame, WireKeypoint,
};
pub use response::FeatureResponse;
