//! In-memory `FlagStore` for tests and throwaway sessions.

use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::error::DatabaseError;
use crate::store::traits::FlagStore;

/// Flags held in a map. Nothing survives the process.
#[derive(Debug, Default)]
pub struct MemoryFlagStore {
    flags: RwLock<HashMap<String, bool>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with `key` already written, as on a returning launch.
    pub fn with_flag(key: &str, value: bool) -> Self {
        let mut flags = HashMap::new();
        flags.insert(key.to_string(), value);
        Self {
            flags: RwLock::new(flags),
        }
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    async fn get_flag(&self, key: &str) -> Result<Option<bool>, DatabaseError> {
        Ok(self.flags.read().await.get(key).copied())
    }

    async fn set_flag(&self, key: &str, value: bool) -> Result<(), DatabaseError> {
        self.flags.write().await.insert(key.to_string(), value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::settings_keys::HAS_LAUNCHED;

    #[tokio::test]
    async fn missing_flag_reads_none() {
        let store = MemoryFlagStore::new();
        assert_eq!(store.get_flag(HAS_LAUNCHED).await.unwrap(), None);
    }

    #[tokio::test]
    async fn set_then_get() {
        let store = MemoryFlagStore::new();
        store.set_flag(HAS_LAUNCHED, true).await.unwrap();
        assert_eq!(store.get_flag(HAS_LAUNCHED).await.unwrap(), Some(true));
    }

    #[tokio::test]
    async fn with_flag_seeds_value() {
        let store = MemoryFlagStore::with_flag(HAS_LAUNCHED, true);
        assert_eq!(store.get_flag(HAS_LAUNCHED).await.unwrap(), Some(true));
        assert_eq!(store.get_flag("other").await.unwrap(), None);
    }
}
