//! Image acquisition — options, results, and the picker gateway.

pub mod model;

pub use model::{AspectRatio, AssetRef, CaptureOptions, CaptureResult};

use async_trait::async_trait;

use crate::error::CaptureError;
use crate::permissions::MediaSource;

/// Platform image picker (camera or photo library).
#[async_trait]
pub trait CaptureGateway: Send + Sync {
    /// Open the camera and wait for a shot or a cancel.
    async fn launch_camera(&self, options: &CaptureOptions) -> Result<CaptureResult, CaptureError>;

    /// Open the photo library and wait for a selection or a cancel.
    async fn launch_gallery(&self, options: &CaptureOptions)
        -> Result<CaptureResult, CaptureError>;

    /// Dispatch to the launcher for `media`.
    async fn launch(
        &self,
        media: MediaSource,
        options: &CaptureOptions,
    ) -> Result<CaptureResult, CaptureError> {
        match media {
            MediaSource::Camera => self.launch_camera(options).await,
            MediaSource::Gallery => self.launch_gallery(options).await,
        }
    }
}
