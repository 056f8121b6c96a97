//! File-backed picker — a directory stands in for the photo library and a
//! file copy stands in for the camera shutter.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;
use uuid::Uuid;

use crate::capture::{AssetRef, CaptureGateway, CaptureOptions, CaptureResult};
use crate::channels::cli::Console;
use crate::error::CaptureError;
use crate::permissions::MediaSource;

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "heic", "gif", "webp"];

/// Picker that works on local files, prompting on the console.
pub struct FileCaptureGateway {
    console: Arc<Console>,
    gallery_dir: PathBuf,
    output_dir: PathBuf,
}

impl FileCaptureGateway {
    pub fn new(console: Arc<Console>, gallery_dir: PathBuf, output_dir: PathBuf) -> Self {
        Self {
            console,
            gallery_dir,
            output_dir,
        }
    }

    /// Image files in the gallery directory, sorted by name.
    pub async fn list_gallery(&self) -> Result<Vec<PathBuf>, CaptureError> {
        let mut entries = tokio::fs::read_dir(&self.gallery_dir).await.map_err(|e| {
            CaptureError::Unavailable {
                media: MediaSource::Gallery,
                reason: format!("{}: {e}", self.gallery_dir.display()),
            }
        })?;

        let mut photos = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if entry.file_type().await?.is_file() && is_image(&path) {
                photos.push(path);
            }
        }
        photos.sort();
        Ok(photos)
    }
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

#[async_trait]
impl CaptureGateway for FileCaptureGateway {
    async fn launch_camera(&self, options: &CaptureOptions) -> Result<CaptureResult, CaptureError> {
        debug!(
            editable = options.editable,
            aspect = %options.aspect,
            quality = options.quality,
            "Camera opened"
        );

        let Some(answer) = self
            .console
            .read_line("📷 Image file to shoot (Enter to cancel): ")
            .await
        else {
            return Ok(CaptureResult::Cancelled);
        };
        if answer.is_empty() {
            return Ok(CaptureResult::Cancelled);
        }

        let source = PathBuf::from(&answer);
        if !is_image(&source) {
            return Err(CaptureError::Failed {
                media: MediaSource::Camera,
                reason: format!("{answer} is not an image file"),
            });
        }

        tokio::fs::create_dir_all(&self.output_dir).await?;
        let extension = source
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("jpg")
            .to_ascii_lowercase();
        let target = self
            .output_dir
            .join(format!("{}.{extension}", Uuid::new_v4()));
        tokio::fs::copy(&source, &target)
            .await
            .map_err(|e| CaptureError::Failed {
                media: MediaSource::Camera,
                reason: format!("{answer}: {e}"),
            })?;

        Ok(CaptureResult::Asset(AssetRef::from_path(&target)))
    }

    async fn launch_gallery(
        &self,
        options: &CaptureOptions,
    ) -> Result<CaptureResult, CaptureError> {
        debug!(
            editable = options.editable,
            aspect = %options.aspect,
            quality = options.quality,
            "Gallery opened"
        );

        let photos = self.list_gallery().await?;
        if photos.is_empty() {
            eprintln!("No photos in {}", self.gallery_dir.display());
            return Ok(CaptureResult::Cancelled);
        }
        for (i, photo) in photos.iter().enumerate() {
            let name = photo.file_name().unwrap_or_default().to_string_lossy();
            eprintln!("  [{}] {}", i + 1, name);
        }

        let Some(answer) = self
            .console
            .read_line("🖼  Choose a photo (Enter to cancel): ")
            .await
        else {
            return Ok(CaptureResult::Cancelled);
        };
        if answer.is_empty() {
            return Ok(CaptureResult::Cancelled);
        }

        let chosen = answer
            .parse::<usize>()
            .ok()
            .and_then(|n| n.checked_sub(1))
            .and_then(|i| photos.get(i))
            .ok_or_else(|| CaptureError::Failed {
                media: MediaSource::Gallery,
                reason: format!("no photo numbered {answer}"),
            })?;

        Ok(CaptureResult::Asset(AssetRef::from_path(chosen)))
    }
}
