//! Advisories — the prompts the controller raises for the user.

use async_trait::async_trait;
use serde::Serialize;

use crate::permissions::MediaSource;

/// A prompt the presentation layer must show.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Advisory {
    /// First-launch explanation shown before the permission prompts.
    Welcome,
    /// Both permissions were granted during onboarding.
    OnboardingComplete,
    /// A capture was attempted without the permission it needs.
    PermissionNeeded { media: MediaSource },
    /// The picker failed outright (not a cancel).
    CaptureFailed { media: MediaSource, reason: String },
}

impl Advisory {
    pub fn title(&self) -> &'static str {
        match self {
            Self::Welcome => "Welcome",
            Self::OnboardingComplete => "All set",
            Self::PermissionNeeded { .. } => "Permission needed",
            Self::CaptureFailed { .. } => "Something went wrong",
        }
    }

    pub fn message(&self) -> String {
        match self {
            Self::Welcome => {
                "This app needs access to your camera and photo library. \
                 You'll be asked for each permission next."
                    .to_string()
            }
            Self::OnboardingComplete => {
                "Camera and photo library access granted. You're ready to go.".to_string()
            }
            Self::PermissionNeeded { media: MediaSource::Camera } => {
                "Camera access is required to take a photo. \
                 You can enable it in Settings."
                    .to_string()
            }
            Self::PermissionNeeded { media: MediaSource::Gallery } => {
                "Photo library access is required to choose a photo. \
                 You can enable it in Settings."
                    .to_string()
            }
            Self::CaptureFailed { media, .. } => {
                format!("Could not get a photo from the {media}. Please try again.")
            }
        }
    }

    /// Whether the prompt offers a link to the platform settings.
    pub fn offers_settings(&self) -> bool {
        matches!(self, Self::PermissionNeeded { .. })
    }
}

/// How the user answered an advisory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdvisoryResponse {
    Acknowledged,
    Dismissed,
    OpenSettings,
}

/// Renders advisories and waits for the user's answer.
#[async_trait]
pub trait AdvisoryPresenter: Send + Sync {
    async fn present(&self, advisory: Advisory) -> AdvisoryResponse;
}
