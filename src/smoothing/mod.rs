//! Temporal smoothing of joint tracks

pub mod moving_average;

pub use moving_average::{moving_average, smooth_track, Track, DEFAULT_WINDOW};
