//! Error types for capture-onboarding.

use crate::onboarding::state::SessionPhase;
use crate::permissions::MediaSource;

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },
}

/// Database-related errors. Any of these means the flag store is unavailable.
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("Connection pool error: {0}")]
    Pool(String),

    #[error("Query failed: {0}")]
    Query(String),

    #[error("Migration failed: {0}")]
    Migration(String),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Failures from the platform permission gateway.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("Permission query for {media} failed: {reason}")]
    QueryFailed { media: MediaSource, reason: String },

    #[error("Permission request for {media} failed: {reason}")]
    RequestFailed { media: MediaSource, reason: String },
}

/// Failures from the capture gateway. Cancellation is not an error.
#[derive(Debug, thiserror::Error)]
pub enum CaptureError {
    #[error("{media} picker is unavailable: {reason}")]
    Unavailable { media: MediaSource, reason: String },

    #[error("{media} capture failed: {reason}")]
    Failed { media: MediaSource, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Session state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    #[error("Cannot transition from {current} to {target}")]
    InvalidTransition {
        current: SessionPhase,
        target: SessionPhase,
    },
}
