//! # qa-core
//!
//! Core types for the QA Lab backup and restore tooling.
//!
//! This crate performs no I/O. It provides:
//! - The eight entity kinds and their foreign-key dependency order
//! - The versioned `Snapshot` document with shape/version validation
//! - File-identity sniffing for uploaded artifacts
//! - The storage engine enum shared by config and storage crates
//! - Cross-cutting error types
//! - CLI response types

pub mod artifact;
pub mod engine;
pub mod entities;
pub mod errors;
pub mod responses;
pub mod snapshot;

pub use artifact::{ArtifactKind, FILE_ENGINE_MAGIC, classify_artifact};
pub use engine::StorageEngine;
pub use entities::EntityKind;
pub use errors::CoreError;
pub use snapshot::{EntityCounts, Record, SCHEMA_VERSION, Snapshot, SnapshotData};
