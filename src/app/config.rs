//! Configuration Management
//!
//! Every section is optional; missing keys take the engine defaults.

use crate::analysis::phase_anchors::{DEFAULT_FOLLOW_THROUGH_OFFSET, DEFAULT_UNIT_TURN_OFFSET};
use crate::analysis::{ExtractorParams, PhaseResolver};
use crate::analysis::features::DEFAULT_NORM_EPSILON;
use crate::pose::JointMap;
use crate::smoothing::DEFAULT_WINDOW;
use crate::wire::{DecodeOptions, UnmappedJointPolicy};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted smoothing window (frames)
pub const MAX_SMOOTHING_WINDOW: usize = 99;

/// Main configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Track smoothing settings
    pub smoothing: SmoothingConfig,
    /// Phase anchor fallbacks
    pub phases: PhaseConfig,
    /// Segment-length normalization
    pub normalization: NormalizationConfig,
    /// Wire input handling
    pub input: InputConfig,
    /// Joint name/index table shared with the pose producer
    pub joints: JointMap,
}

/// Smoothing configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SmoothingConfig {
    /// Moving-average window (frames, 1 = off)
    pub window: usize,
}

/// Phase anchor configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseConfig {
    /// Frames after contact used when no follow_through mark exists
    pub follow_through_offset: usize,
    /// Frames before contact used when no unit_turn mark exists
    pub unit_turn_offset: usize,
}

/// Normalization configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizationConfig {
    /// Segment lengths at or below this (pixels) fall back to 1.0
    pub epsilon: f64,
}

/// Input decoding configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct InputConfig {
    /// Policy for keypoint names missing from the joint table
    #[serde(default)]
    pub unmapped_joints: UnmappedJointPolicy,
    /// Drop keypoints whose reported confidence is lower than this
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_confidence: Option<f64>,
}

impl Default for SmoothingConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
        }
    }
}

impl Default for PhaseConfig {
    fn default() -> Self {
        Self {
            follow_through_offset: DEFAULT_FOLLOW_THROUGH_OFFSET,
            unit_turn_offset: DEFAULT_UNIT_TURN_OFFSET,
        }
    }
}

impl Default for NormalizationConfig {
    fn default() -> Self {
        Self {
            epsilon: DEFAULT_NORM_EPSILON,
        }
    }
}

impl Config {
    /// Check ranges and the joint table; reports the first offending field
    pub fn validate(&self) -> Result<(), crate::Error> {
        if self.smoothing.window == 0 || self.smoothing.window > MAX_SMOOTHING_WINDOW {
            return Err(crate::Error::Config(format!(
                "smoothing window must be in [1, {}], got {}",
                MAX_SMOOTHING_WINDOW, self.smoothing.window
            )));
        }
        if !self.normalization.epsilon.is_finite() || self.normalization.epsilon <= 0.0 {
            return Err(crate::Error::Config(format!(
                "normalization epsilon must be > 0, got {}",
                self.normalization.epsilon
            )));
        }
        if let Some(min) = self.input.min_confidence {
            if !(0.0..=1.0).contains(&min) {
                return Err(crate::Error::Config(format!(
                    "min_confidence must be in [0, 1], got {}",
                    min
                )));
            }
        }
        self.joints.validate()
    }

    /// Engine parameters described by this config
    pub fn extractor_params(&self) -> ExtractorParams {
        ExtractorParams {
            smoothing_window: self.smoothing.window,
            phases: PhaseResolver::with_offsets(
                self.phases.follow_through_offset,
                self.phases.unit_turn_offset,
            ),
            norm_epsilon: self.normalization.epsilon,
        }
    }

    /// Wire decoding options described by this config
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            unmapped: self.input.unmapped_joints,
            min_confidence: self.input.min_confidence,
        }
    }

    /// Read and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, crate::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: Self =
            toml::from_str(&content).map_err(|e| crate::Error::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Config at `path`, or defaults when no file exists there
    pub fn load_or_default(path: &Path) -> Result<Self, crate::Error> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Config at [`Config::default_path`], or defaults when absent
    pub fn load_default() -> Result<Self, crate::Error> {
        Self::load_or_default(&Self::default_path())
    }

    /// An explicitly given file must exist; otherwise fall back to
    /// [`Config::load_default`]
    pub fn load_from(explicit: Option<&Path>) -> Result<Self, crate::Error> {
        match explicit {
            Some(path) => Self::load(path),
            None => Self::load_default(),
        }
    }

    /// The explicitly given path, or [`Config::default_path`]
    pub fn resolve_path(explicit: Option<&Path>) -> PathBuf {
        explicit
            .map(Path::to_path_buf)
            .unwrap_or_else(Self::default_path)
    }

    /// Write as TOML, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), crate::Error> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Write to [`Config::default_path`]
    pub fn save_default(&self) -> Result<(), crate::Error> {
        self.save(&Self::default_path())
    }

    /// `~/.stroke_kinematics/config.toml`
    pub fn default_path() -> PathBuf {
        dirs::home_dir()
            .map(|h| h.join(".stroke_kinematics").join("config.toml"))
            .unwrap_or_else(|| PathBuf::from("config.toml"))
    }

    pub fn to_toml(&self) -> Result<String, crate::Error> {
        toml::to_string_pretty(self).map_err(|e| crate::Error::Config(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pose::{Joint, JointBinding};
    use tempfile::TempDir;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.smoothing.window, 5);
        assert_eq!(config.phases.follow_through_offset, 12);
        assert_eq!(config.phases.unit_turn_offset, 24);
        assert_eq!(config.normalization.epsilon, 1e-6);
        assert_eq!(config.input.unmapped_joints, UnmappedJointPolicy::Reject);
        assert!(config.input.min_confidence.is_none());
        assert_eq!(config.joints, JointMap::mediapipe());
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml = config.to_toml().unwrap();
        assert!(toml.contains("[smoothing]"));
        assert!(toml.contains("[phases]"));
        assert!(toml.contains("[normalization]"));
        assert!(toml.contains("[[joints]]"));
        assert!(toml.contains("unmapped_joints = \"reject\""));
    }

    #[test]
    fn test_default_path() {
        let path = Config::default_path();
        assert!(path.to_string_lossy().contains("config.toml"));
    }

    #[test]
    fn test_config_roundtrip_serialization() {
        let mut original = Config::default();
        original.input.min_confidence = Some(0.4);
        original.input.unmapped_joints = UnmappedJointPolicy::Ignore;

        let toml_str = original.to_toml().unwrap();
        let deserialized: Config = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(deserialized, original);
    }

    #[test]
    fn test_config_save_and_load() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("nested").join("config.toml");

        let mut original = Config::default();
        original.smoothing.window = 7;
        original.phases.unit_turn_offset = 30;
        original.normalization.epsilon = 0.5;

        original.save(&config_path).expect("Failed to save config");
        assert!(config_path.exists());

        let loaded = Config::load(&config_path).expect("Failed to load config");
        assert_eq!(loaded.smoothing.window, 7);
        assert_eq!(loaded.phases.unit_turn_offset, 30);
        assert_eq!(loaded.normalization.epsilon, 0.5);
    }

    #[test]
    fn test_resolve_path_prefers_explicit() {
        let explicit = PathBuf::from("/tmp/alt_stroke_config.toml");
        assert_eq!(Config::resolve_path(Some(explicit.as_path())), explicit);
        assert_eq!(Config::resolve_path(None), Config::default_path());
    }

    #[test]
    fn test_load_from_explicit_path() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("alt.toml");

        let mut original = Config::default();
        original.phases.follow_through_offset = 3;
        original.save(&config_path).expect("Failed to save config");

        let loaded = Config::load_from(Some(config_path.as_path())).expect("Failed to load config");
        assert_eq!(loaded, original);

        let missing = temp_dir.path().join("missing.toml");
        assert!(Config::load_from(Some(missing.as_path())).is_err());
    }

    #[test]
    fn test_load_or_default_for_missing_file() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let missing = temp_dir.path().join("missing.toml");
        assert_eq!(Config::load_or_default(&missing).unwrap(), Config::default());
    }

    #[test]
    fn test_load_nonexistent_file() {
        let nonexistent_path = PathBuf::from("/tmp/nonexistent_stroke_config_12345.toml");
        assert!(Config::load(&nonexistent_path).is_err());
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: Config = toml::from_str("[smoothing]\nwindow = 3\n").expect("partial config");
        assert_eq!(config.smoothing.window, 3);
        assert_eq!(config.phases.follow_through_offset, 12);
        assert_eq!(config.joints, JointMap::default());
    }

    #[test]
    fn test_custom_joint_table_from_toml() {
        let mut toml_str = String::new();
        for (i, joint) in Joint::ALL.iter().enumerate() {
            toml_str.push_str(&format!(
                "[[joints]]\njoint = \"{}\"\nname = \"kp_{}\"\nindex = {}\n\n",
                joint, i, i
            ));
        }
        let config: Config = toml::from_str(&toml_str).expect("custom joints");
        assert_eq!(config.joints.resolve_name("kp_5"), Some(Joint::RightWrist));
        assert_eq!(config.joints.index_of(Joint::LeftShoulder), Some(0));
    }

    #[test]
    fn test_incomplete_joint_table_rejected() {
        let toml_str = "[[joints]]\njoint = \"left_hip\"\nname = \"lh\"\n";
        let result: Result<Config, _> = toml::from_str(toml_str);
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_toml_parsing() {
        let result: Result<Config, _> = toml::from_str("this is not valid toml {{{}}}");
        assert!(result.is_err());
    }

    #[test]
    fn test_validate_default_config() {
        assert!(Config::default().validate().is_ok());
    }

    #[test]
    fn test_validate_window_bounds() {
        let mut config = Config::default();
        config.smoothing.window = 0;
        assert!(config.validate().is_err());
        config.smoothing.window = MAX_SMOOTHING_WINDOW + 1;
        assert!(config.validate().is_err());
        config.smoothing.window = 1;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_epsilon() {
        let mut config = Config::default();
        config.normalization.epsilon = 0.0;
        assert!(config.validate().is_err());
        config.normalization.epsilon = f64::NAN;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_min_confidence() {
        let mut config = Config::default();
        config.input.min_confidence = Some(1.5);
        assert!(config.validate().is_err());
        config.input.min_confidence = Some(0.0);
        assert!(config.validate().is_ok());
        config.input.min_confidence = Some(1.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_invalid_values() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let config_path = temp_dir.path().join("bad_config.toml");
        std::fs::write(&config_path, "[smoothing]\nwindow = 0\n").expect("Failed to write config");
        assert!(Config::load(&config_path).is_err());
    }

    #[test]
    fn test_extractor_params_follow_config() {
        let mut config = Config::default();
        config.smoothing.window = 9;
        config.phases.follow_through_offset = 6;
        config.phases.unit_turn_offset = 18;
        config.normalization.epsilon = 0.01;

        let params = config.extractor_params();
        assert_eq!(params.smoothing_window, 9);
        assert_eq!(params.phases, PhaseResolver::with_offsets(6, 18));
        assert_eq!(params.norm_epsilon, 0.01);
    }

    #[test]
    fn test_decode_options_follow_config() {
        let mut config = Config::default();
        config.input.unmapped_joints = UnmappedJointPolicy::Ignore;
        config.input.min_confidence = Some(0.3);

        let options = config.decode_options();
        assert_eq!(options.unmapped, UnmappedJointPolicy::Ignore);
        assert_eq!(options.min_confidence, Some(0.3));
    }

    #[test]
    fn test_joint_binding_without_index_roundtrips() {
        let mut config = Config::default();
        let bindings = Joint::ALL
            .iter()
            .map(|&j| JointBinding::new(j, j.as_str(), None))
            .collect();
        config.joints = JointMap::new(bindings).unwrap();

        let toml_str = config.to_toml().unwrap();
        assert!(!toml_str.contains("index"));
        let back: Config = toml::from_str(&toml_str).unwrap();
        assert_eq!(back.joints, config.joints);
    }
}
