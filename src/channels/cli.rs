//! CLI channel — stdin/stdout stand-ins for the platform dialogs.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tokio::sync::Mutex;

use crate::error::PermissionError;
use crate::onboarding::{Advisory, AdvisoryPresenter, AdvisoryResponse};
use crate::permissions::{MediaSource, PermissionGateway, PermissionStatus};
use crate::store::LibSqlBackend;

type LineSource = Lines<Box<dyn AsyncBufRead + Unpin + Send>>;

/// Line-oriented terminal shared by every console component.
pub struct Console {
    lines: Mutex<LineSource>,
}

impl Console {
    pub fn stdin() -> Self {
        Self::from_reader(BufReader::new(tokio::io::stdin()))
    }

    pub fn from_reader(reader: impl AsyncBufRead + Unpin + Send + 'static) -> Self {
        let boxed: Box<dyn AsyncBufRead + Unpin + Send> = Box::new(reader);
        Self {
            lines: Mutex::new(boxed.lines()),
        }
    }

    /// Print `prompt` and read one trimmed line. `None` on EOF or read error.
    pub async fn read_line(&self, prompt: &str) -> Option<String> {
        eprint!("{prompt}");
        match self.lines.lock().await.next_line().await {
            Ok(Some(line)) => Some(line.trim().to_string()),
            Ok(None) => None,
            Err(e) => {
                tracing::error!("Error reading stdin: {}", e);
                None
            }
        }
    }
}

/// Prints advisories and reads the user's choice.
pub struct ConsolePresenter {
    console: Arc<Console>,
}

impl ConsolePresenter {
    pub fn new(console: Arc<Console>) -> Self {
        Self { console }
    }
}

#[async_trait]
impl AdvisoryPresenter for ConsolePresenter {
    async fn present(&self, advisory: Advisory) -> AdvisoryResponse {
        eprintln!("\n── {} ──", advisory.title());
        eprintln!("{}", advisory.message());

        if advisory.offers_settings() {
            match self
                .console
                .read_line("[s] open settings, [Enter] dismiss: ")
                .await
            {
                Some(answer) if answer.eq_ignore_ascii_case("s") => AdvisoryResponse::OpenSettings,
                _ => AdvisoryResponse::Dismissed,
            }
        } else {
            match self.console.read_line("[Enter] OK: ").await {
                Some(_) => AdvisoryResponse::Acknowledged,
                None => AdvisoryResponse::Dismissed,
            }
        }
    }
}

/// Asks y/n for each permission and keeps the answer in the database, so
/// a relaunch finds it the way a device keeps its permission grants.
pub struct ConsolePermissionGateway {
    console: Arc<Console>,
    decisions: Arc<LibSqlBackend>,
}

impl ConsolePermissionGateway {
    pub fn new(console: Arc<Console>, decisions: Arc<LibSqlBackend>) -> Self {
        Self { console, decisions }
    }
}

#[async_trait]
impl PermissionGateway for ConsolePermissionGateway {
    async fn query(&self, media: MediaSource) -> Result<PermissionStatus, PermissionError> {
        let decision = self
            .decisions
            .permission_decision(media)
            .await
            .map_err(|e| PermissionError::QueryFailed {
                media,
                reason: e.to_string(),
            })?;
        // Never asked means not granted.
        Ok(decision.unwrap_or(PermissionStatus::Denied))
    }

    async fn request(&self, media: MediaSource) -> Result<PermissionStatus, PermissionError> {
        let answer = self
            .console
            .read_line(&format!("Allow access to your {media}? [y/N] "))
            .await
            .ok_or_else(|| PermissionError::RequestFailed {
                media,
                reason: "input closed".to_string(),
            })?;

        let status = if matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes") {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        };
        self.decisions
            .record_permission_decision(media, status)
            .await
            .map_err(|e| PermissionError::RequestFailed {
                media,
                reason: e.to_string(),
            })?;
        Ok(status)
    }

    fn open_platform_settings(&self) {
        eprintln!("⚙️  Settings: type `onboard` to be asked for camera and gallery access again.");
    }
}
