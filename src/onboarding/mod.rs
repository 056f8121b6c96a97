//! Onboarding — first-launch permission flow and permission-gated capture.
//!
//! On first launch the controller writes the launch flag, explains what it
//! needs, and asks for camera then gallery access. Later launches only read
//! the current permission state. Capture actions are refused with an
//! advisory until the matching permission is granted.

pub mod advisory;
pub mod controller;
pub mod state;

pub use advisory::{Advisory, AdvisoryPresenter, AdvisoryResponse};
pub use controller::{CaptureOutcome, LaunchKind, OnboardingController};
pub use state::{ControllerSnapshot, SessionPhase, SessionState};
