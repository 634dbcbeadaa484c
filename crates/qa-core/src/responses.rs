//! CLI response types returned as JSON by `qalab` commands.

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;
use crate::engine::StorageEngine;
use crate::snapshot::EntityCounts;

/// Response from `qalab engine`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct EngineReport {
    pub engine: StorageEngine,
    /// File path or connection target, credentials redacted.
    pub target: String,
}

/// Response from `qalab backup`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct BackupResponse {
    pub engine: StorageEngine,
    pub artifact: ArtifactKind,
    pub path: String,
    pub bytes: u64,
    /// Present for JSON snapshots only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<EntityCounts>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
}

/// Response from `qalab restore`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct RestoreResponse {
    pub engine: StorageEngine,
    pub artifact: ArtifactKind,
    pub restored: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub counts: Option<EntityCounts>,
    pub duration_ms: u64,
}

/// Response from `qalab init`.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct InitResponse {
    pub engine: StorageEngine,
    pub path: String,
    /// `false` when the database already existed and was only migrated.
    pub created: bool,
}
