//! Schema for the libSQL store.
//!
//! The applied version lives in SQLite's `user_version` header field. Each
//! step runs in its own transaction together with the version bump, so a
//! failed step leaves the database at the previous version.

use libsql::Connection;
use tracing::{debug, info};

use crate::error::DatabaseError;

/// Schema steps, applied in order. Step `i` brings the database to version `i + 1`.
const STEPS: &[(&str, &str)] = &[
    (
        "settings",
        "CREATE TABLE IF NOT EXISTS settings (
            user_id TEXT NOT NULL,
            key TEXT NOT NULL,
            value TEXT NOT NULL,
            updated_at TEXT NOT NULL,
            PRIMARY KEY (user_id, key)
        );",
    ),
    (
        "permission_decisions",
        "CREATE TABLE IF NOT EXISTS permission_decisions (
            media TEXT PRIMARY KEY CHECK (media IN ('camera', 'gallery')),
            status TEXT NOT NULL CHECK (status IN ('granted', 'denied')),
            decided_at TEXT NOT NULL
        );",
    ),
];

/// Version a fully migrated database reports.
pub const SCHEMA_VERSION: i64 = STEPS.len() as i64;

/// Bring the database up to [`SCHEMA_VERSION`].
pub async fn migrate(conn: &Connection) -> Result<(), DatabaseError> {
    let from = schema_version(conn).await?;
    if from > SCHEMA_VERSION {
        return Err(DatabaseError::Migration(format!(
            "database is at version {from}, newer than this build ({SCHEMA_VERSION})"
        )));
    }

    for (version, (name, sql)) in (1..).zip(STEPS).skip(from as usize) {
        let tx = conn
            .transaction()
            .await
            .map_err(|e| DatabaseError::Migration(format!("begin V{version}: {e}")))?;
        tx.execute_batch(&format!("{sql}\nPRAGMA user_version = {version};"))
            .await
            .map_err(|e| DatabaseError::Migration(format!("V{version} ({name}): {e}")))?;
        tx.commit()
            .await
            .map_err(|e| DatabaseError::Migration(format!("commit V{version}: {e}")))?;
        info!(version, name, "Schema upgraded");
    }

    debug!(from, to = SCHEMA_VERSION, "Schema up to date");
    Ok(())
}

/// Version recorded in the database header; 0 for a new file.
pub async fn schema_version(conn: &Connection) -> Result<i64, DatabaseError> {
    let mut rows = conn
        .query("PRAGMA user_version", ())
        .await
        .map_err(|e| DatabaseError::Migration(format!("read user_version: {e}")))?;
    match rows
        .next()
        .await
        .map_err(|e| DatabaseError::Migration(format!("read user_version: {e}")))?
    {
        Some(row) => row
            .get::<i64>(0)
            .map_err(|e| DatabaseError::Migration(format!("parse user_version: {e}"))),
        None => Ok(0),
    }
}
