//! Platform permissions — the camera/gallery permission model and the
//! gateway trait the controller consults before any capture.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::PermissionError;

/// Where an image comes from. Each source is gated by its own permission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MediaSource {
    Camera,
    Gallery,
}

impl MediaSource {
    pub const ALL: [MediaSource; 2] = [MediaSource::Camera, MediaSource::Gallery];
}

impl std::fmt::Display for MediaSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Camera => write!(f, "camera"),
            Self::Gallery => write!(f, "gallery"),
        }
    }
}

/// Answer the platform gives to a permission query or request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionStatus {
    Granted,
    Denied,
}

impl PermissionStatus {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// What the controller knows about one permission in this session.
///
/// `Unknown` only until the first query or request completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PermissionState {
    #[default]
    Unknown,
    Granted,
    Denied,
}

impl PermissionState {
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

impl From<PermissionStatus> for PermissionState {
    fn from(status: PermissionStatus) -> Self {
        match status {
            PermissionStatus::Granted => Self::Granted,
            PermissionStatus::Denied => Self::Denied,
        }
    }
}

impl std::fmt::Display for PermissionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unknown => write!(f, "unknown"),
            Self::Granted => write!(f, "granted"),
            Self::Denied => write!(f, "denied"),
        }
    }
}

/// Platform permission capability.
///
/// `query` must never prompt the user; `request` may show the native dialog.
#[async_trait]
pub trait PermissionGateway: Send + Sync {
    /// Read the current permission without prompting.
    async fn query(&self, media: MediaSource) -> Result<PermissionStatus, PermissionError>;

    /// Ask the user for the permission.
    async fn request(&self, media: MediaSource) -> Result<PermissionStatus, PermissionError>;

    /// Navigate to the platform settings page. Fire-and-forget.
    fn open_platform_settings(&self);

    async fn query_camera(&self) -> Result<PermissionStatus, PermissionError> {
        self.query(MediaSource::Camera).await
    }

    async fn request_camera(&self) -> Result<PermissionStatus, PermissionError> {
        self.request(MediaSource::Camera).await
    }

    async fn query_gallery(&self) -> Result<PermissionStatus, PermissionError> {
        self.query(MediaSource::Gallery).await
    }

    async fn request_gallery(&self) -> Result<PermissionStatus, PermissionError> {
        self.request(MediaSource::Gallery).await
    }
}
