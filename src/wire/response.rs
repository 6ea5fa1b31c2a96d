//! Feature Response Envelope

use crate::analysis::FeatureBundle;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Successful feature computation, as returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureResponse {
    pub ok: bool,
    pub fps: f64,
    pub stroke_type: String,
    pub features: FeatureBundle,
    /// RFC 3339 time the response was produced
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generated_at: Option<String>,
}

impl FeatureResponse {
    pub fn new(stroke_type: impl Into<String>, features: FeatureBundle) -> Self {
        Self {
            ok: true,
            fps: features.meta.fps,
            stroke_type: stroke_type.into(),
            features,
            generated_at: None,
        }
    }

    /// Stamp with the current UTC time
    pub fn stamped(mut self) -> Self {
        self.generated_at = Some(chrono::Utc::now().to_rfc3339());
        self
    }

    pub fn to_json_pretty(&self) -> crate::Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as pretty JSON, creating parent directories
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, self.to_json_pretty()?)?;
        Ok(())
    }

    pub fn load(path: &Path) -> crate::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}
