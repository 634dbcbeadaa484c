//! The storage capability the backup core runs against.
//!
//! Export needs only [`SnapshotStore::fetch_rows`]. Restore needs an atomic
//! unit: [`SnapshotStore::begin`] opens a [`StoreTransaction`] whose deletes
//! and inserts become visible together on `commit` or not at all.
//!
//! Stores are passed explicitly to every operation; there is no global
//! connection.

pub mod postgres;
pub mod sqlite;

use qa_core::{EntityKind, Record};

use crate::error::DatabaseError;

pub use postgres::PgStore;
pub use sqlite::LibsqlStore;

/// Read access to every row of every entity kind, plus transactional writes.
#[allow(async_fn_in_trait)]
pub trait SnapshotStore {
    type Transaction: StoreTransaction;

    /// Every row of one entity kind, unfiltered.
    async fn fetch_rows(&self, kind: EntityKind) -> Result<Vec<Record>, DatabaseError>;

    /// Open the atomic unit used by restore.
    async fn begin(&self) -> Result<Self::Transaction, DatabaseError>;
}

/// An open all-or-nothing unit of work.
///
/// Dropping without `commit` must leave the store unchanged.
#[allow(async_fn_in_trait)]
pub trait StoreTransaction {
    /// Delete every row of one kind. Returns the number of rows removed.
    async fn delete_all(&mut self, kind: EntityKind) -> Result<u64, DatabaseError>;

    /// Insert rows of one kind verbatim. Returns the number of rows written.
    async fn insert_rows(&mut self, kind: EntityKind, rows: &[Record])
    -> Result<u64, DatabaseError>;

    async fn commit(self) -> Result<(), DatabaseError>
    where
        Self: Sized;

    async fn rollback(self) -> Result<(), DatabaseError>
    where
        Self: Sized;
}
