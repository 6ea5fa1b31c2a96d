//! Joint Mapping Table
//!
//! Resolves wire-level joint keys (a landmark name or a landmark index) into
//! [`Joint`]. The table is supplied by the caller, normally from the
//! `[[joints]]` section of the config, and has to match whatever produced
//! the keypoints upstream.

use super::types::Joint;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Wire keys bound to one joint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JointBinding {
    /// Joint being bound
    pub joint: Joint,
    /// Key used by name-keyed frames
    pub name: String,
    /// Position used by index-keyed frames
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub index: Option<usize>,
}

impl JointBinding {
    pub fn new(joint: Joint, name: impl Into<String>, index: Option<usize>) -> Self {
        Self {
            joint,
            name: name.into(),
            index,
        }
    }
}

/// Validated name/index → joint table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<JointBinding>", into = "Vec<JointBinding>")]
pub struct JointMap {
    bindings: Vec<JointBinding>,
}

impl JointMap {
    /// Build a table, rejecting incomplete or ambiguous bindings
    pub fn new(bindings: Vec<JointBinding>) -> crate::Result<Self> {
        let map = Self { bindings };
        map.validate()?;
        Ok(map)
    }

    /// MediaPipe Pose landmark names and indices
    pub fn mediapipe() -> Self {
        let table = [
            (Joint::LeftShoulder, 11),
            (Joint::RightShoulder, 12),
            (Joint::LeftElbow, 13),
            (Joint::RightElbow, 14),
            (Joint::LeftWrist, 15),
            (Joint::RightWrist, 16),
            (Joint::LeftHip, 23),
            (Joint::RightHip, 24),
        ];
        Self {
            bindings: table
                .iter()
                .map(|&(joint, index)| JointBinding::new(joint, joint.as_str(), Some(index)))
                .collect(),
        }
    }

    /// Check that every joint is bound exactly once and keys are unambiguous
    pub fn validate(&self) -> crate::Result<()> {
        let mut joints = HashSet::new();
        let mut names = HashSet::new();
        let mut indices = HashSet::new();

        for binding in &self.bindings {
            if !joints.insert(binding.joint) {
                return Err(crate::Error::Config(format!(
                    "joint {} is bound more than once",
                    binding.joint
                )));
            }
            let name = normalize_key(&binding.name);
            if name.is_empty() {
                return Err(crate::Error::Config(format!(
                    "joint {} has an empty name",
                    binding.joint
                )));
            }
            if !names.insert(name) {
                return Err(crate::Error::Config(format!(
                    "joint name '{}' is bound more than once",
                    binding.name
                )));
            }
            if let Some(index) = binding.index {
                if !indices.insert(index) {
                    return Err(crate::Error::Config(format!(
                        "landmark index {} is bound more than once",
                        index
                    )));
                }
            }
        }

        if let Some(missing) = Joint::ALL.iter().find(|j| !joints.contains(*j)) {
            return Err(crate::Error::Config(format!("joint {} is not bound", missing)));
        }

        Ok(())
    }

    /// Resolve a name key (case-insensitive, surrounding whitespace ignored)
    pub fn resolve_name(&self, key: &str) -> Option<Joint> {
        let key = normalize_key(key);
        self.bindings
            .iter()
            .find(|b| normalize_key(&b.name) == key)
            .map(|b| b.joint)
    }

    /// Resolve a landmark index
    pub fn resolve_index(&self, index: usize) -> Option<Joint> {
        self.bindings
            .iter()
            .find(|b| b.index == Some(index))
            .map(|b| b.joint)
    }

    /// Landmark index bound to a joint
    pub fn index_of(&self, joint: Joint) -> Option<usize> {
        self.binding(joint).and_then(|b| b.index)
    }

    /// Name bound to a joint
    pub fn name_of(&self, joint: Joint) -> Option<&str> {
        self.binding(joint).map(|b| b.name.as_str())
    }

    pub fn bindings(&self) -> &[JointBinding] {
        &self.bindings
    }

    fn binding(&self, joint: Joint) -> Option<&JointBinding> {
        self.bindings.iter().find(|b| b.joint == joint)
    }
}

impl Default for JointMap {
    fn default() -> Self {
        Self::mediapipe()
    }
}

impl TryFrom<Vec<JointBinding>> for JointMap {
    type Error = crate::Error;

    fn try_from(bindings: Vec<JointBinding>) -> Result<Self, Self::Error> {
        Self::new(bindings)
    }
}

impl From<JointMap> for Vec<JointBinding> {
    fn from(map: JointMap) -> Self {
        map.bindings
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_ascii_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn renamed(prefix: &str) -> Vec<JointBinding> {
        Joint::ALL
            .iter()
            .enumerate()
            .map(|(i, &j)| JointBinding::new(j, format!("{}{}", prefix, i), Some(i)))
            .collect()
    }

    #[test]
    fn test_mediapipe_table_is_valid() {
        let map = JointMap::mediapipe();
        assert!(map.validate().is_ok());
        assert_eq!(map.bindings().len(), Joint::COUNT);
    }

    #[test]
    fn test_mediapipe_indices() {
        let map = JointMap::default();
        assert_eq!(map.index_of(Joint::LeftShoulder), Some(11));
        assert_eq!(map.index_of(Joint::RightWrist), Some(16));
        assert_eq!(map.index_of(Joint::RightHip), Some(24));
        assert_eq!(map.resolve_index(23), Some(Joint::LeftHip));
        assert_eq!(map.resolve_index(0), None);
    }

    #[test]
    fn test_resolve_name_case_insensitive() {
        let map = JointMap::default();
        assert_eq!(map.resolve_name("left_elbow"), Some(Joint::LeftElbow));
        assert_eq!(map.resolve_name("  RIGHT_Hip "), Some(Joint::RightHip));
        assert_eq!(map.resolve_name("nose"), None);
    }

    #[test]
    fn test_alternate_table() {
        let map = JointMap::new(renamed("kp")).unwrap();
        assert_eq!(map.resolve_name("kp4"), Some(Joint::LeftWrist));
        assert_eq!(map.name_of(Joint::RightHip), Some("kp7"));
        assert_eq!(map.resolve_name("left_wrist"), None);
    }

    #[test]
    fn test_rejects_missing_joint() {
        let mut bindings = renamed("kp");
        bindings.pop();
        assert!(JointMap::new(bindings).is_err());
    }

    #[test]
    fn test_rejects_duplicate_joint() {
        let mut bindings = renamed("kp");
        bindings[7].joint = Joint::LeftShoulder;
        assert!(JointMap::new(bindings).is_err());
    }

    #[test]
    fn test_rejects_duplicate_name_ignoring_case() {
        let mut bindings = renamed("kp");
        bindings[1].name = "KP0".to_string();
        assert!(JointMap::new(bindings).is_err());
    }

    #[test]
    fn test_rejects_duplicate_index() {
        let mut bindings = renamed("kp");
        bindings[3].index = Some(0);
        assert!(JointMap::new(bindings).is_err());
    }

    #[test]
    fn test_rejects_empty_name() {
        let mut bindings = renamed("kp");
        bindings[2].name = "   ".to_string();
        assert!(JointMap::new(bindings).is_err());
    }

    #[test]
    fn test_index_is_optional() {
        let bindings: Vec<JointBinding> = Joint::ALL
            .iter()
            .map(|&j| JointBinding::new(j, j.as_str(), None))
            .collect();
        let map = JointMap::new(bindings).unwrap();
        assert_eq!(map.index_of(Joint::LeftHip), None);
        assert_eq!(map.resolve_index(23), None);
    }

    #[test]
    fn test_deserialize_validates() {
        let json = r#"[{"joint": "left_hip", "name": "lh"}]"#;
        let result: Result<JointMap, _> = serde_json::from_str(json);
        assert!(result.is_err());
    }
}
