//! The versioned backup document produced by export and consumed by restore.
//!
//! ```json
//! {
//!   "schemaVersion": 1,
//!   "exportedAt": "2026-10-15T09:30:00Z",
//!   "data": { "Account": [ ... ], "Module": [ ... ], ... }
//! }
//! ```
//!
//! Rows are opaque [`Record`]s: column name to JSON value, copied verbatim.
//! Only the document-level shape is validated here (version, the eight
//! collections, each row an object). Field-level shape is the store's concern.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::Serialize;
use serde_json::{Map, Value};

use crate::entities::EntityKind;
use crate::errors::CoreError;

/// The only snapshot version this build reads or writes.
///
/// No migration exists between versions; any other value is rejected.
pub const SCHEMA_VERSION: u64 = 1;

/// One stored row, keyed by column name.
pub type Record = Map<String, Value>;

/// Row counts per entity kind, serialized in insertion order.
pub type EntityCounts = BTreeMap<EntityKind, usize>;

/// All rows of all eight entity kinds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct SnapshotData {
    #[serde(rename = "Account")]
    pub account: Vec<Record>,
    #[serde(rename = "Module")]
    pub module: Vec<Record>,
    #[serde(rename = "Submodule")]
    pub submodule: Vec<Record>,
    #[serde(rename = "Lesson")]
    pub lesson: Vec<Record>,
    #[serde(rename = "Exercise")]
    pub exercise: Vec<Record>,
    #[serde(rename = "ProgressMark")]
    pub progress_mark: Vec<Record>,
    #[serde(rename = "LessonCheckAttempt")]
    pub lesson_check_attempt: Vec<Record>,
    #[serde(rename = "ExerciseAttempt")]
    pub exercise_attempt: Vec<Record>,
}

impl SnapshotData {
    #[must_use]
    pub fn rows(&self, kind: EntityKind) -> &[Record] {
        match kind {
            EntityKind::Account => &self.account,
            EntityKind::Module => &self.module,
            EntityKind::Submodule => &self.submodule,
            EntityKind::Lesson => &self.lesson,
            EntityKind::Exercise => &self.exercise,
            EntityKind::ProgressMark => &self.progress_mark,
            EntityKind::LessonCheckAttempt => &self.lesson_check_attempt,
            EntityKind::ExerciseAttempt => &self.exercise_attempt,
        }
    }

    pub fn rows_mut(&mut self, kind: EntityKind) -> &mut Vec<Record> {
        match kind {
            EntityKind::Account => &mut self.account,
            EntityKind::Module => &mut self.module,
            EntityKind::Submodule => &mut self.submodule,
            EntityKind::Lesson => &mut self.lesson,
            EntityKind::Exercise => &mut self.exercise,
            EntityKind::ProgressMark => &mut self.progress_mark,
            EntityKind::LessonCheckAttempt => &mut self.lesson_check_attempt,
            EntityKind::ExerciseAttempt => &mut self.exercise_attempt,
        }
    }

    #[must_use]
    pub fn counts(&self) -> EntityCounts {
        EntityKind::INSERTION_ORDER
            .into_iter()
            .map(|kind| (kind, self.rows(kind).len()))
            .collect()
    }

    #[must_use]
    pub fn total_rows(&self) -> usize {
        EntityKind::INSERTION_ORDER
            .into_iter()
            .map(|kind| self.rows(kind).len())
            .sum()
    }
}

/// A complete, self-describing backup of the store.
///
/// Created fresh by every export and never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub schema_version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exported_at: Option<DateTime<Utc>>,
    pub data: SnapshotData,
}

impl Snapshot {
    /// Wrap freshly exported rows, stamped with the current version and time.
    #[must_use]
    pub fn new(data: SnapshotData) -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            exported_at: Some(Utc::now()),
            data,
        }
    }

    /// Parse and validate raw document bytes.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedSnapshot` if the bytes are not JSON or the
    /// document fails [`Snapshot::from_value`] validation.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, CoreError> {
        let value: Value = serde_json::from_slice(bytes)
            .map_err(|e| CoreError::MalformedSnapshot(format!("not valid JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Validate a parsed document and take ownership of its rows.
    ///
    /// Checks, in order: top level is an object, `schemaVersion` is exactly
    /// [`SCHEMA_VERSION`], `data` is an object, and each of the eight kinds is
    /// present as an array of objects. Unknown keys are ignored. A missing or
    /// unparseable `exportedAt` is tolerated.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::MalformedSnapshot` naming the first violation.
    pub fn from_value(value: Value) -> Result<Self, CoreError> {
        let Value::Object(mut doc) = value else {
            return Err(malformed("document is not a JSON object"));
        };

        match doc.get("schemaVersion") {
            None => return Err(malformed("missing schemaVersion")),
            Some(Value::Number(n)) if n.as_u64() == Some(SCHEMA_VERSION) => {}
            Some(other) => {
                return Err(malformed(format!(
                    "unsupported schemaVersion {other}, expected {SCHEMA_VERSION}"
                )));
            }
        }

        let exported_at = doc
            .get("exportedAt")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc));

        let Some(Value::Object(mut collections)) = doc.remove("data") else {
            return Err(malformed("missing data object"));
        };

        let mut data = SnapshotData::default();
        for kind in EntityKind::INSERTION_ORDER {
            let rows = match collections.remove(kind.as_str()) {
                None => return Err(malformed(format!("data.{kind} is missing"))),
                Some(Value::Array(rows)) => rows,
                Some(_) => return Err(malformed(format!("data.{kind} is not an array"))),
            };
            let target = data.rows_mut(kind);
            target.reserve(rows.len());
            for (idx, row) in rows.into_iter().enumerate() {
                match row {
                    Value::Object(record) => target.push(record),
                    _ => return Err(malformed(format!("data.{kind}[{idx}] is not an object"))),
                }
            }
        }

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            exported_at,
            data,
        })
    }

    /// Serialize as pretty-printed UTF-8 JSON.
    ///
    /// # Errors
    ///
    /// Returns `CoreError::Other` if serialization fails.
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CoreError> {
        serde_json::to_vec_pretty(self).map_err(|e| CoreError::Other(e.into()))
    }

    #[must_use]
    pub fn counts(&self) -> EntityCounts {
        self.data.counts()
    }
}

fn malformed(reason: impl Into<String>) -> CoreError {
    CoreError::MalformedSnapshot(reason.into())
}
