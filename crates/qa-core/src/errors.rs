//! Cross-cutting error types for QA Lab.
//!
//! Storage failures (`DatabaseError`) and the backup taxonomy (`BackupError`)
//! live in `qa-db`; configuration failures in `qa-config`. This module only
//! holds what the pure document and sniffing code can raise.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    /// A snapshot document failed shape or version validation.
    #[error("Malformed snapshot: {0}")]
    MalformedSnapshot(String),

    /// Catch-all for unexpected errors.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
