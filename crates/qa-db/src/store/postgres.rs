//! Networked-engine snapshot store over a PostgreSQL pool.
//!
//! Rows never pass through Rust types column by column: the server renders
//! each table with `json_agg` on the way out and re-types each record with
//! `json_populate_recordset` on the way in. Column names and types therefore
//! stay whatever the application's schema says they are.

use std::time::Duration;

use qa_core::{EntityKind, Record};
use sqlx::postgres::{PgPool, PgPoolOptions};

use super::{SnapshotStore, StoreTransaction};
use crate::error::DatabaseError;
use crate::helpers::quote_ident;

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    /// Connect a pool to the networked engine.
    ///
    /// # Errors
    ///
    /// Returns `DatabaseError::Postgres` if the server cannot be reached.
    pub async fn connect(
        url: &str,
        max_connections: u32,
        connect_timeout: Duration,
    ) -> Result<Self, DatabaseError> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(connect_timeout)
            .connect(url)
            .await?;
        tracing::debug!(max_connections, "connected networked engine pool");
        Ok(Self { pool })
    }

    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Close every pooled connection.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

impl SnapshotStore for PgStore {
    type Transaction = PgTransaction;

    async fn fetch_rows(&self, kind: EntityKind) -> Result<Vec<Record>, DatabaseError> {
        let sql = format!(
            "SELECT COALESCE(json_agg(t), '[]'::json)::text FROM {} AS t",
            quote_ident(kind.as_str())
        );
        let text: String = sqlx::query_scalar(&sql).fetch_one(&self.pool).await?;
        serde_json::from_str(&text)
            .map_err(|e| DatabaseError::Query(format!("{kind} rows are not JSON objects: {e}")))
    }

    async fn begin(&self) -> Result<PgTransaction, DatabaseError> {
        let tx = self.pool.begin().await?;
        Ok(PgTransaction { tx })
    }
}

pub struct PgTransaction {
    tx: sqlx::Transaction<'static, sqlx::Postgres>,
}

impl StoreTransaction for PgTransaction {
    async fn delete_all(&mut self, kind: EntityKind) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {}", quote_ident(kind.as_str()));
        let result = sqlx::query(&sql).execute(&mut *self.tx).await?;
        Ok(result.rows_affected())
    }

    async fn insert_rows(
        &mut self,
        kind: EntityKind,
        rows: &[Record],
    ) -> Result<u64, DatabaseError> {
        let table = quote_ident(kind.as_str());
        let sql = format!(
            "INSERT INTO {table} SELECT * FROM json_populate_recordset(NULL::{table}, $1::text::json)"
        );
        let payload = serde_json::to_string(rows)
            .map_err(|e| DatabaseError::Query(format!("serializing {kind} rows: {e}")))?;
        let result = sqlx::query(&sql)
            .bind(payload)
            .execute(&mut *self.tx)
            .await?;
        Ok(result.rows_affected())
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        Ok(self.tx.commit().await?)
    }

    async fn rollback(self) -> Result<(), DatabaseError> {
        Ok(self.tx.rollback().await?)
    }
}
