//! libSQL backend — durable settings, the `FlagStore` built on them, and
//! the permission answers the console host remembers between launches.
//!
//! Flags are ordinary JSON-valued rows in the `settings` table, keyed by
//! `(user_id, key)`. Supports local file and in-memory databases.

use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use libsql::{Connection, params};
use tracing::{debug, info};

use crate::error::DatabaseError;
use crate::permissions::{MediaSource, PermissionStatus};
use crate::store::migrations;
use crate::store::traits::{FlagStore, settings_keys};

/// libSQL database backend.
///
/// Stores a single connection that is reused for all operations.
pub struct LibSqlBackend {
    conn: Connection,
}

impl LibSqlBackend {
    /// Open (or create) a local database file and run migrations.
    pub async fn new_local(path: &Path) -> Result<Self, DatabaseError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                DatabaseError::Pool(format!("Failed to create database directory: {e}"))
            })?;
        }

        let db = libsql::Builder::new_local(path)
            .build()
            .await
            .map_err(|e| DatabaseError::Pool(format!("Failed to open libSQL database: {e}")))?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        migrations::migrate(&conn).await?;
        info!(path = %path.display(), "Database opened");
        Ok(Self { conn })
    }

    /// Create an in-memory database (for tests).
    pub async fn new_memory() -> Result<Self, DatabaseError> {
        let db = libsql::Builder::new_local(":memory:")
            .build()
            .await
            .map_err(|e| {
                DatabaseError::Pool(format!("Failed to create in-memory database: {e}"))
            })?;

        let conn = db
            .connect()
            .map_err(|e| DatabaseError::Pool(format!("Failed to create connection: {e}")))?;

        migrations::migrate(&conn).await?;
        Ok(Self { conn })
    }

    fn conn(&self) -> &Connection {
        &self.conn
    }

    /// Read a JSON setting, `None` if the row doesn't exist.
    pub async fn get_setting(
        &self,
        user_id: &str,
        key: &str,
    ) -> Result<Option<serde_json::Value>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT value FROM settings WHERE user_id = ?1 AND key = ?2",
                params![user_id, key],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;

        match rows.next().await {
            Ok(Some(row)) => {
                let value_str: String = row
                    .get(0)
                    .map_err(|e| DatabaseError::Query(format!("get_setting: {e}")))?;
                let value = serde_json::from_str(&value_str)
                    .map_err(|e| DatabaseError::Serialization(format!("{key}: {e}")))?;
                Ok(Some(value))
            }
            Ok(None) => Ok(None),
            Err(e) => Err(DatabaseError::Query(format!("get_setting: {e}"))),
        }
    }

    /// Insert or replace a JSON setting.
    pub async fn set_setting(
        &self,
        user_id: &str,
        key: &str,
        value: &serde_json::Value,
    ) -> Result<(), DatabaseError> {
        let now = Utc::now().to_rfc3339();
        let value_str = serde_json::to_string(value)
            .map_err(|e| DatabaseError::Serialization(e.to_string()))?;

        self.conn()
            .execute(
                "INSERT INTO settings (user_id, key, value, updated_at) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT (user_id, key) DO UPDATE SET value = ?3, updated_at = ?4",
                params![user_id, key, value_str, now],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("set_setting: {e}")))?;

        debug!(user_id, key, "Setting written");
        Ok(())
    }

    /// Last answer recorded for `media`, if it was ever asked.
    pub async fn permission_decision(
        &self,
        media: MediaSource,
    ) -> Result<Option<PermissionStatus>, DatabaseError> {
        let mut rows = self
            .conn()
            .query(
                "SELECT status FROM permission_decisions WHERE media = ?1",
                params![media.to_string()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("permission_decision: {e}")))?;

        let Some(row) = rows
            .next()
            .await
            .map_err(|e| DatabaseError::Query(format!("permission_decision: {e}")))?
        else {
            return Ok(None);
        };
        let status: String = row
            .get(0)
            .map_err(|e| DatabaseError::Query(format!("permission_decision: {e}")))?;
        match status.as_str() {
            "granted" => Ok(Some(PermissionStatus::Granted)),
            "denied" => Ok(Some(PermissionStatus::Denied)),
            other => Err(DatabaseError::Serialization(format!(
                "{media} permission holds unknown status {other:?}"
            ))),
        }
    }

    /// Store the user's answer for `media`, replacing any earlier one.
    pub async fn record_permission_decision(
        &self,
        media: MediaSource,
        status: PermissionStatus,
    ) -> Result<(), DatabaseError> {
        let status_str = match status {
            PermissionStatus::Granted => "granted",
            PermissionStatus::Denied => "denied",
        };
        self.conn()
            .execute(
                "INSERT INTO permission_decisions (media, status, decided_at) VALUES (?1, ?2, ?3)
                 ON CONFLICT (media) DO UPDATE SET status = ?2, decided_at = ?3",
                params![media.to_string(), status_str, Utc::now().to_rfc3339()],
            )
            .await
            .map_err(|e| DatabaseError::Query(format!("record_permission_decision: {e}")))?;

        debug!(%media, status = status_str, "Permission decision recorded");
        Ok(())
    }
}

#[async_trait]
impl FlagStore for LibSqlBackend {
    async fn get_flag(&self, key: &str) -> Result<Option<bool>, DatabaseError> {
        match self.get_setting(settings_keys::DEFAULT_USER, key).await? {
            None => Ok(None),
            Some(serde_json::Value::Bool(b)) => Ok(Some(b)),
            Some(other) => Err(DatabaseError::Serialization(format!(
                "flag {key} holds non-boolean value {other}"
            ))),
        }
    }

    async fn set_flag(&self, key: &str, value: bool) -> Result<(), DatabaseError> {
        self.set_setting(
            settings_keys::DEFAULT_USER,
            key,
            &serde_json::Value::Bool(value),
        )
        .await
    }
}
