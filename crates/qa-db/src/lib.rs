//! # qa-db
//!
//! Storage engines and the backup/restore core for QA Lab.
//!
//! Two engines are supported:
//! - the **file engine**: one local SQLite database file, opened through
//!   `libsql`, backed up and restored as a raw byte copy;
//! - the **networked engine**: a PostgreSQL server reached through `sqlx`,
//!   backed up and restored as a versioned JSON [`qa_core::Snapshot`].
//!
//! The exporter and restorer are generic over [`store::SnapshotStore`], so the
//! same delete/insert ordering runs against either engine (and against an
//! in-memory libSQL store in tests).

pub mod backup;
pub mod error;
pub mod helpers;
mod migrations;
pub mod store;

#[cfg(test)]
pub(crate) mod test_support;

use std::path::Path;

use libsql::Builder;

pub use backup::{
    BackupArtifact, BackupFormat, BackupService, RestoreOutcome, RestoreRequest,
};
pub use error::{BackupError, BackupErrorKind, DatabaseError, RestoreStep};

use crate::store::sqlite::LibsqlStore;

/// Handle on a file-engine database.
///
/// Wraps a libSQL database and connection. Dropping the handle releases the
/// file, which must happen before a raw restore overwrites it.
pub struct QaDb {
    #[allow(dead_code)]
    db: libsql::Database,
    conn: libsql::Connection,
}

impl QaDb {
    /// Open (or create) a local database at the given path.
    ///
    /// Enables foreign keys and runs migrations.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the database cannot be opened or
    /// migrations fail.
    pub async fn open_local(path: impl AsRef<Path>) -> Result<Self, DatabaseError> {
        let db = Builder::new_local(path.as_ref()).build().await?;
        let conn = db.connect()?;

        // Enable foreign keys (must be per-connection in SQLite)
        conn.execute("PRAGMA foreign_keys = ON", ())
            .await
            .map_err(|e| DatabaseError::Migration(format!("PRAGMA foreign_keys: {e}")))?;

        let qa_db = Self { db, conn };
        qa_db.run_migrations().await?;
        Ok(qa_db)
    }

    /// Open a private in-memory database with the full schema.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if migrations fail.
    pub async fn open_in_memory() -> Result<Self, DatabaseError> {
        Self::open_local(":memory:").await
    }

    /// Access the underlying libSQL connection for direct queries.
    #[must_use]
    pub const fn conn(&self) -> &libsql::Connection {
        &self.conn
    }

    /// A snapshot store sharing this handle's connection.
    #[must_use]
    pub fn store(&self) -> LibsqlStore {
        LibsqlStore::new(self.conn.clone())
    }

    /// Count rows in one table.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError` if the query fails or returns no rows.
    pub async fn count_rows(&self, kind: qa_core::EntityKind) -> Result<u64, DatabaseError> {
        let sql = format!("SELECT COUNT(*) FROM {}", helpers::quote_ident(kind.as_str()));
        let mut rows = self.conn.query(&sql, ()).await?;
        let row = rows
            .next()
            .await?
            .ok_or_else(|| DatabaseError::Query(format!("COUNT on {kind} returned no row")))?;
        let count = row.get::<i64>(0)?;
        u64::try_from(count).map_err(|e| DatabaseError::Query(format!("negative count: {e}")))
    }
}
