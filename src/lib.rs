//! Capture Onboarding — first-launch permission flow and photo acquisition.

pub mod capture;
pub mod channels;
pub mod config;
pub mod error;
pub mod onboarding;
pub mod permissions;
pub mod store;
