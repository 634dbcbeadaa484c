//! Backup and restore for both storage engines.
//!
//! - [`export`]: every row of every entity kind into a [`qa_core::Snapshot`]
//! - [`restore`]: validate a snapshot, then replace the store's rows in one
//!   transaction
//! - [`file_copy`]: raw byte copy of the file engine's database image
//! - [`service`]: engine dispatch for the administrative operations

pub mod export;
pub mod file_copy;
pub mod restore;
pub mod service;

pub use export::export_snapshot;
pub use file_copy::{backup_file, restore_file};
pub use restore::{apply_snapshot, parse_snapshot, restore_snapshot};
pub use service::{
    BackupArtifact, BackupFormat, BackupService, RestoreOutcome, RestoreRequest,
    artifact_file_name,
};
