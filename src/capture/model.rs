//! Capture data model — picker options and the asset reference it returns.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Crop aspect ratio handed to the picker's editor, `width:height`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AspectRatio {
    pub width: u32,
    pub height: u32,
}

impl AspectRatio {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl Default for AspectRatio {
    fn default() -> Self {
        Self::new(4, 3)
    }
}

impl std::fmt::Display for AspectRatio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.width, self.height)
    }
}

/// Parameters passed through to the platform picker unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CaptureOptions {
    /// Let the user crop before returning.
    pub editable: bool,
    pub aspect: AspectRatio,
    /// Compression quality, 0.0 (smallest) to 1.0 (best).
    pub quality: f32,
}

impl Default for CaptureOptions {
    fn default() -> Self {
        Self {
            editable: true,
            aspect: AspectRatio::default(),
            quality: 1.0,
        }
    }
}

impl CaptureOptions {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.quality) {
            return Err(ConfigError::InvalidValue {
                key: "capture.quality".to_string(),
                message: format!("{} is outside 0.0..=1.0", self.quality),
            });
        }
        if self.aspect.width == 0 || self.aspect.height == 0 {
            return Err(ConfigError::InvalidValue {
                key: "capture.aspect".to_string(),
                message: format!("{} has a zero component", self.aspect),
            });
        }
        Ok(())
    }
}

/// Opaque reference to a captured or selected image. Never the bytes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetRef(String);

impl AssetRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self(uri.into())
    }

    /// Build a `file://` reference for a local path.
    pub fn from_path(path: &Path) -> Self {
        Self(format!("file://{}", path.display()))
    }

    pub fn uri(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for AssetRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a picker launch that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    /// The user backed out without choosing anything.
    Cancelled,
    Asset(AssetRef),
}
