//! Error types for qa-db.
//!
//! `DatabaseError` is what the storage adapters raise. `BackupError` is the
//! stable taxonomy the backup core surfaces to its callers; every variant maps
//! to one [`BackupErrorKind`] so "bad file" and "store unreachable" stay
//! distinguishable.

use std::fmt;

use qa_config::ConfigError;
use qa_core::{ArtifactKind, EntityKind};
use serde::Serialize;
use thiserror::Error;

/// Errors from database operations.
#[derive(Debug, Error)]
pub enum DatabaseError {
    /// A SQL query failed or returned unusable data.
    #[error("Query failed: {0}")]
    Query(String),

    /// Schema migration failed.
    #[error("Migration failed: {0}")]
    Migration(String),

    /// Underlying libSQL error.
    #[error("libSQL error: {0}")]
    LibSql(#[from] libsql::Error),

    /// Underlying PostgreSQL driver error.
    #[error("PostgreSQL error: {0}")]
    Postgres(#[from] sqlx::Error),

    /// Filesystem error on the file engine.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Failures surfaced by export, restore, and the file transfer path.
#[derive(Debug, Error)]
pub enum BackupError {
    /// Networked-engine settings are partially present, or otherwise unusable.
    #[error("Storage configuration is incomplete: {0}")]
    ConfigurationIncomplete(#[source] ConfigError),

    /// The snapshot failed shape/version validation. Nothing was modified.
    #[error("Malformed snapshot: {reason}")]
    MalformedSnapshot { reason: String },

    /// The artifact does not match what the active engine restores from.
    #[error(
        "Wrong artifact type: expected {}, but this looks like {}",
        expected.describe(),
        found.describe()
    )]
    WrongArtifactType {
        expected: ArtifactKind,
        found: ArtifactKind,
    },

    #[error("Storage read failed while {context}: {source}")]
    StorageReadFailure {
        context: String,
        #[source]
        source: DatabaseError,
    },

    #[error("Storage write failed while {context}: {source}")]
    StorageWriteFailure {
        context: String,
        #[source]
        source: DatabaseError,
    },

    /// The destructive phase failed; the store rolled back to its prior state.
    #[error("Restore aborted while {step}; all changes were rolled back: {source}")]
    TransactionAborted {
        step: RestoreStep,
        #[source]
        source: DatabaseError,
    },

    /// Restore was called without accepting the destructive overwrite.
    #[error("Restore replaces every row in the store; confirmation is required")]
    ConfirmationRequired,
}

/// Stable machine-readable error kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BackupErrorKind {
    ConfigurationIncomplete,
    MalformedSnapshot,
    WrongArtifactType,
    StorageReadFailure,
    StorageWriteFailure,
    TransactionAborted,
    ConfirmationRequired,
}

impl BackupErrorKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ConfigurationIncomplete => "configuration_incomplete",
            Self::MalformedSnapshot => "malformed_snapshot",
            Self::WrongArtifactType => "wrong_artifact_type",
            Self::StorageReadFailure => "storage_read_failure",
            Self::StorageWriteFailure => "storage_write_failure",
            Self::TransactionAborted => "transaction_aborted",
            Self::ConfirmationRequired => "confirmation_required",
        }
    }
}

impl fmt::Display for BackupErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl BackupError {
    #[must_use]
    pub const fn kind(&self) -> BackupErrorKind {
        match self {
            Self::ConfigurationIncomplete(_) => BackupErrorKind::ConfigurationIncomplete,
            Self::MalformedSnapshot { .. } => BackupErrorKind::MalformedSnapshot,
            Self::WrongArtifactType { .. } => BackupErrorKind::WrongArtifactType,
            Self::StorageReadFailure { .. } => BackupErrorKind::StorageReadFailure,
            Self::StorageWriteFailure { .. } => BackupErrorKind::StorageWriteFailure,
            Self::TransactionAborted { .. } => BackupErrorKind::TransactionAborted,
            Self::ConfirmationRequired => BackupErrorKind::ConfirmationRequired,
        }
    }

    pub(crate) fn read(context: impl Into<String>, source: impl Into<DatabaseError>) -> Self {
        Self::StorageReadFailure {
            context: context.into(),
            source: source.into(),
        }
    }

    pub(crate) fn write(context: impl Into<String>, source: impl Into<DatabaseError>) -> Self {
        Self::StorageWriteFailure {
            context: context.into(),
            source: source.into(),
        }
    }
}

impl From<ConfigError> for BackupError {
    fn from(error: ConfigError) -> Self {
        Self::ConfigurationIncomplete(error)
    }
}

/// Where in the destructive phase a restore stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RestoreStep {
    Delete(EntityKind),
    Insert(EntityKind),
    Commit,
}

impl fmt::Display for RestoreStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Delete(kind) => write!(f, "deleting {kind} rows"),
            Self::Insert(kind) => write!(f, "inserting {kind} rows"),
            Self::Commit => f.write_str("committing"),
        }
    }
}
