//! `FlagStore` trait — the durable key/value contract the controller reads
//! once per session.

use async_trait::async_trait;

use crate::error::DatabaseError;

/// Settings keys used for launch persistence.
pub mod settings_keys {
    /// Key of the first-launch flag.
    pub const HAS_LAUNCHED: &str = "hasLaunched";
    /// Default user ID (single-user device).
    pub const DEFAULT_USER: &str = "default";
}

/// Durable boolean flags keyed by name.
///
/// Any `Err` means the store is unavailable; callers treat it as non-fatal.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Read a flag. `Ok(None)` when it was never written.
    async fn get_flag(&self, key: &str) -> Result<Option<bool>, DatabaseError>;

    /// Write a flag, replacing any previous value.
    async fn set_flag(&self, key: &str, value: bool) -> Result<(), DatabaseError>;
}
