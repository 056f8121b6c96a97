//! Session state machine — the single record the controller owns.

use serde::{Deserialize, Serialize};

use crate::capture::AssetRef;
use crate::error::StateError;
use crate::permissions::{MediaSource, PermissionState};

/// Phases of a screen session.
///
/// Initializing → Onboarding → Ready, or Initializing → Ready directly.
/// Ready is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    #[default]
    Initializing,
    Onboarding,
    Ready,
}

impl SessionPhase {
    /// Check if a transition from `self` to `target` is valid.
    pub fn can_transition_to(&self, target: SessionPhase) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (Initializing, Onboarding) | (Initializing, Ready) | (Onboarding, Ready)
        )
    }
}

impl std::fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Initializing => "initializing",
            Self::Onboarding => "onboarding",
            Self::Ready => "ready",
        };
        write!(f, "{s}")
    }
}

/// Everything the screen knows during one session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionState {
    pub phase: SessionPhase,
    pub camera: PermissionState,
    pub gallery: PermissionState,
    pub captured_asset: Option<AssetRef>,
    /// A capture is in flight.
    pub busy: bool,
}

impl SessionState {
    /// Move to `target`, rejecting anything the phase graph doesn't allow.
    pub fn transition(&mut self, target: SessionPhase) -> Result<SessionPhase, StateError> {
        if !self.phase.can_transition_to(target) {
            return Err(StateError::InvalidTransition {
                current: self.phase,
                target,
            });
        }
        self.phase = target;
        Ok(target)
    }

    pub fn permission(&self, media: MediaSource) -> PermissionState {
        match media {
            MediaSource::Camera => self.camera,
            MediaSource::Gallery => self.gallery,
        }
    }

    pub fn set_permission(&mut self, media: MediaSource, state: PermissionState) {
        match media {
            MediaSource::Camera => self.camera = state,
            MediaSource::Gallery => self.gallery = state,
        }
    }

    pub fn snapshot(&self) -> ControllerSnapshot {
        ControllerSnapshot {
            phase: self.phase,
            camera_granted: self.camera.is_granted(),
            gallery_granted: self.gallery.is_granted(),
            captured_asset: self.captured_asset.clone(),
            busy: self.busy,
        }
    }
}

/// Read-only view handed to the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControllerSnapshot {
    pub phase: SessionPhase,
    pub camera_granted: bool,
    pub gallery_granted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub captured_asset: Option<AssetRef>,
    pub busy: bool,
}
