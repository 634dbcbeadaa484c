//! File-engine snapshot store over a libSQL connection.

use qa_core::{EntityKind, Record};

use super::{SnapshotStore, StoreTransaction};
use crate::error::DatabaseError;
use crate::helpers::{json_to_libsql, libsql_to_json, quote_ident};

/// Snapshot access to a libSQL database.
///
/// Used for the portable JSON export of the file engine and as the isolated
/// per-test store.
#[derive(Clone)]
pub struct LibsqlStore {
    conn: libsql::Connection,
}

impl LibsqlStore {
    #[must_use]
    pub const fn new(conn: libsql::Connection) -> Self {
        Self { conn }
    }
}

impl SnapshotStore for LibsqlStore {
    type Transaction = LibsqlTransaction;

    async fn fetch_rows(&self, kind: EntityKind) -> Result<Vec<Record>, DatabaseError> {
        let sql = format!("SELECT * FROM {} ORDER BY rowid", quote_ident(kind.as_str()));
        let mut rows = self.conn.query(&sql, ()).await?;

        let columns: Vec<String> = (0..rows.column_count())
            .map(|idx| rows.column_name(idx).unwrap_or_default().to_string())
            .collect();

        let mut records = Vec::new();
        while let Some(row) = rows.next().await? {
            let mut record = Record::new();
            for (idx, name) in (0_i32..).zip(&columns) {
                record.insert(name.clone(), libsql_to_json(row.get_value(idx)?));
            }
            records.push(record);
        }
        Ok(records)
    }

    async fn begin(&self) -> Result<LibsqlTransaction, DatabaseError> {
        let tx = self.conn.transaction().await?;
        Ok(LibsqlTransaction { tx })
    }
}

pub struct LibsqlTransaction {
    tx: libsql::Transaction,
}

impl StoreTransaction for LibsqlTransaction {
    async fn delete_all(&mut self, kind: EntityKind) -> Result<u64, DatabaseError> {
        let sql = format!("DELETE FROM {}", quote_ident(kind.as_str()));
        Ok(self.tx.execute(&sql, ()).await?)
    }

    async fn insert_rows(
        &mut self,
        kind: EntityKind,
        rows: &[Record],
    ) -> Result<u64, DatabaseError> {
        let table = quote_ident(kind.as_str());
        let mut written = 0;
        for row in rows {
            let columns = row
                .keys()
                .map(|name| quote_ident(name))
                .collect::<Vec<_>>()
                .join(", ");
            let placeholders = (1..=row.len())
                .map(|n| format!("?{n}"))
                .collect::<Vec<_>>()
                .join(", ");
            let values: Vec<libsql::Value> = row.values().map(json_to_libsql).collect();

            let sql = if row.is_empty() {
                format!("INSERT INTO {table} DEFAULT VALUES")
            } else {
                format!("INSERT INTO {table} ({columns}) VALUES ({placeholders})")
            };
            written += self.tx.execute(&sql, values).await?;
        }
        Ok(written)
    }

    async fn commit(self) -> Result<(), DatabaseError> {
        Ok(self.tx.commit().await?)
    }

    async fn rollback(self) -> Result<(), DatabaseError> {
        Ok(self.tx.rollback().await?)
    }
}
