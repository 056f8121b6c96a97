//! Configuration types.

use std::path::PathBuf;

use crate::capture::CaptureOptions;
use crate::error::ConfigError;
use crate::store::settings_keys;

/// Controller configuration.
#[derive(Debug, Clone)]
pub struct ControllerConfig {
    /// Settings key of the first-launch flag.
    pub launch_flag_key: String,
    /// Options passed to every picker launch.
    pub capture: CaptureOptions,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            launch_flag_key: settings_keys::HAS_LAUNCHED.to_string(),
            capture: CaptureOptions::default(),
        }
    }
}

/// Console host configuration, read from `CAPTURE_ONBOARDING_*` variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    /// Directory the simulated photo library lists.
    pub gallery_dir: PathBuf,
    /// Where simulated camera shots are written.
    pub output_dir: PathBuf,
    pub controller: ControllerConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            db_path: PathBuf::from("./data/capture-onboarding.db"),
            gallery_dir: PathBuf::from("./gallery"),
            output_dir: PathBuf::from("./data/captures"),
            controller: ControllerConfig::default(),
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unset keys keep defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(path) = lookup("CAPTURE_ONBOARDING_DB_PATH") {
            config.db_path = PathBuf::from(path);
        }
        if let Some(dir) = lookup("CAPTURE_ONBOARDING_GALLERY_DIR") {
            config.gallery_dir = PathBuf::from(dir);
        }
        if let Some(dir) = lookup("CAPTURE_ONBOARDING_OUTPUT_DIR") {
            config.output_dir = PathBuf::from(dir);
        }
        if let Some(raw) = lookup("CAPTURE_ONBOARDING_QUALITY") {
            config.controller.capture.quality =
                raw.trim()
                    .parse()
                    .map_err(|e| ConfigError::InvalidValue {
                        key: "CAPTURE_ONBOARDING_QUALITY".to_string(),
                        message: format!("{raw:?}: {e}"),
                    })?;
        }

        config.controller.capture.validate()?;
        Ok(config)
    }
}
