//! OnboardingController — first-launch detection, sequential permission
//! requests, and permission-gated capture.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use crate::capture::{AssetRef, CaptureGateway, CaptureResult};
use crate::config::ControllerConfig;
use crate::permissions::{MediaSource, PermissionGateway, PermissionState};
use crate::store::FlagStore;

use super::advisory::{Advisory, AdvisoryPresenter, AdvisoryResponse};
use super::state::{ControllerSnapshot, SessionPhase, SessionState};

/// How `initialize()` resolved the launch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchKind {
    /// No flag existed; onboarding ran.
    FirstLaunch,
    /// Flag found; permissions were refreshed.
    Returning,
    /// Flag store failed; Ready with unknown permissions.
    Degraded,
    /// `initialize()` had already been called this session.
    AlreadyInitialized,
}

/// Result of a user-triggered capture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureOutcome {
    Captured(AssetRef),
    Cancelled,
    /// Permission not granted; the picker was not opened.
    PermissionNeeded,
    /// Another capture is still in flight.
    Busy,
    Failed { reason: String },
}

/// Owns the session state and mediates every call to the platform.
///
/// Operations never return errors: collaborator failures end up as a
/// degraded state or an advisory.
pub struct OnboardingController {
    flags: Arc<dyn FlagStore>,
    permissions: Arc<dyn PermissionGateway>,
    capture: Arc<dyn CaptureGateway>,
    presenter: Arc<dyn AdvisoryPresenter>,
    config: ControllerConfig,
    started: AtomicBool,
    state: Mutex<SessionState>,
}

impl OnboardingController {
    pub fn new(
        flags: Arc<dyn FlagStore>,
        permissions: Arc<dyn PermissionGateway>,
        capture: Arc<dyn CaptureGateway>,
        presenter: Arc<dyn AdvisoryPresenter>,
        config: ControllerConfig,
    ) -> Self {
        Self {
            flags,
            permissions,
            capture,
            presenter,
            config,
            started: AtomicBool::new(false),
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Current state for rendering.
    pub fn snapshot(&self) -> ControllerSnapshot {
        self.state().snapshot()
    }

    pub fn phase(&self) -> SessionPhase {
        self.state().phase
    }

    /// Resolve first launch vs. returning launch. Call once on mount.
    pub async fn initialize(&self) -> LaunchKind {
        if self.started.swap(true, Ordering::SeqCst) {
            debug!("initialize() called again; ignoring");
            return LaunchKind::AlreadyInitialized;
        }

        let key = self.config.launch_flag_key.as_str();
        let existing = match self.flags.get_flag(key).await {
            Ok(existing) => existing,
            Err(e) => {
                warn!(key, error = %e, "Flag store unavailable; skipping onboarding");
                self.enter(SessionPhase::Ready);
                return LaunchKind::Degraded;
            }
        };

        if existing.is_some() {
            self.enter(SessionPhase::Ready);
            self.refresh_permission_state().await;
            return LaunchKind::Returning;
        }

        // Written before onboarding runs so an interrupted flow is not replayed.
        if let Err(e) = self.flags.set_flag(key, true).await {
            warn!(key, error = %e, "Failed to persist launch flag; skipping onboarding");
            self.enter(SessionPhase::Ready);
            return LaunchKind::Degraded;
        }
        info!(key, "First launch recorded");

        self.enter(SessionPhase::Onboarding);
        match self.presenter.present(Advisory::Welcome).await {
            AdvisoryResponse::Acknowledged => {
                self.request_permissions_sequentially().await;
            }
            response => {
                info!(?response, "Welcome not acknowledged; reading current permissions");
                self.refresh_permission_state().await;
            }
        }
        self.enter(SessionPhase::Ready);

        LaunchKind::FirstLaunch
    }

    /// Ask for camera, then gallery. The gallery request always runs.
    ///
    /// Safe to call again; the platform decides whether it re-prompts.
    pub async fn request_permissions_sequentially(&self) -> (PermissionState, PermissionState) {
        let camera = self.request_permission(MediaSource::Camera).await;
        let gallery = self.request_permission(MediaSource::Gallery).await;

        if camera.is_granted() && gallery.is_granted() {
            self.presenter.present(Advisory::OnboardingComplete).await;
        }
        (camera, gallery)
    }

    /// Query both permissions without prompting.
    pub async fn refresh_permission_state(&self) {
        for media in MediaSource::ALL {
            match self.permissions.query(media).await {
                Ok(status) => {
                    let state = PermissionState::from(status);
                    self.state().set_permission(media, state);
                    debug!(%media, %state, "Permission queried");
                }
                Err(e) => {
                    warn!(%media, error = %e, "Permission query failed; keeping last known value");
                }
            }
        }
    }

    /// Take or pick a photo, if the matching permission is granted.
    pub async fn attempt_capture(&self, media: MediaSource) -> CaptureOutcome {
        let busy = {
            let mut state = self.state();
            if state.busy {
                debug!(%media, "Capture already in flight");
                return CaptureOutcome::Busy;
            }
            if state.permission(media).is_granted() {
                state.busy = true;
                Some(BusyGuard { state: &self.state })
            } else {
                None
            }
        };

        let Some(busy) = busy else {
            info!(%media, "Capture blocked on permission");
            let response = self
                .presenter
                .present(Advisory::PermissionNeeded { media })
                .await;
            if response == AdvisoryResponse::OpenSettings {
                self.permissions.open_platform_settings();
            }
            return CaptureOutcome::PermissionNeeded;
        };

        debug!(%media, options = ?self.config.capture, "Launching picker");
        let outcome = match self.capture.launch(media, &self.config.capture).await {
            Ok(CaptureResult::Asset(asset)) => {
                info!(%media, asset = %asset, "Asset captured");
                self.state().captured_asset = Some(asset.clone());
                CaptureOutcome::Captured(asset)
            }
            Ok(CaptureResult::Cancelled) => {
                debug!(%media, "Capture cancelled");
                CaptureOutcome::Cancelled
            }
            Err(e) => {
                warn!(%media, error = %e, "Capture failed");
                CaptureOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        };
        drop(busy);

        if let CaptureOutcome::Failed { reason } = &outcome {
            self.presenter
                .present(Advisory::CaptureFailed {
                    media,
                    reason: reason.clone(),
                })
                .await;
        }
        outcome
    }

    async fn request_permission(&self, media: MediaSource) -> PermissionState {
        match self.permissions.request(media).await {
            Ok(status) => {
                let state = PermissionState::from(status);
                self.state().set_permission(media, state);
                info!(%media, %state, "Permission requested");
                state
            }
            Err(e) => {
                warn!(%media, error = %e, "Permission request failed; keeping last known value");
                self.state().permission(media)
            }
        }
    }

    fn enter(&self, target: SessionPhase) {
        let mut state = self.state();
        match state.transition(target) {
            Ok(phase) => info!(%phase, "Session phase changed"),
            Err(e) => warn!(error = %e, "Ignoring phase transition"),
        }
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Clears `busy` when dropped, so every exit from a capture releases it.
struct BusyGuard<'a> {
    state: &'a Mutex<SessionState>,
}

impl Drop for BusyGuard<'_> {
    fn drop(&mut self) {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .busy = false;
    }
}
