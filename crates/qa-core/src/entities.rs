//! The eight QA Lab record kinds and their foreign-key dependency order.
//!
//! Backup and restore treat every row as opaque, but must know which kinds
//! reference which so that deletes run child-first and inserts parent-first.
//!
//! ```text
//! Account ─┬──────────────────────────────┬─> ProgressMark
//!          │                              ├─> LessonCheckAttempt
//!          │                              └─> ExerciseAttempt
//! Module ──┬─> Submodule ─> Lesson ─> Exercise ─> ExerciseAttempt
//!          └────────────────> Lesson (direct parent when no submodule)
//! ```

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One of the fixed record categories stored by QA Lab.
///
/// The serialized name is both the snapshot `data` key and the table name.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema,
)]
pub enum EntityKind {
    Account,
    Module,
    Submodule,
    Lesson,
    Exercise,
    ProgressMark,
    LessonCheckAttempt,
    ExerciseAttempt,
}

impl EntityKind {
    /// Topological order: every kind appears after all of its parents.
    ///
    /// Restore inserts in this order.
    pub const INSERTION_ORDER: [Self; 8] = [
        Self::Account,
        Self::Module,
        Self::Submodule,
        Self::Lesson,
        Self::Exercise,
        Self::ProgressMark,
        Self::LessonCheckAttempt,
        Self::ExerciseAttempt,
    ];

    /// Reverse topological order: most-dependent kind first.
    ///
    /// Restore deletes in this order.
    pub const DELETION_ORDER: [Self; 8] = [
        Self::ExerciseAttempt,
        Self::LessonCheckAttempt,
        Self::ProgressMark,
        Self::Exercise,
        Self::Lesson,
        Self::Submodule,
        Self::Module,
        Self::Account,
    ];

    /// Snapshot key and table name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Account => "Account",
            Self::Module => "Module",
            Self::Submodule => "Submodule",
            Self::Lesson => "Lesson",
            Self::Exercise => "Exercise",
            Self::ProgressMark => "ProgressMark",
            Self::LessonCheckAttempt => "LessonCheckAttempt",
            Self::ExerciseAttempt => "ExerciseAttempt",
        }
    }

    /// Kinds this kind holds foreign keys to.
    ///
    /// `Lesson` lists both `Submodule` and `Module`; a stored lesson references
    /// exactly one of them (a CHECK in the file-engine schema).
    #[must_use]
    pub const fn parents(self) -> &'static [Self] {
        match self {
            Self::Account | Self::Module => &[],
            Self::Submodule => &[Self::Module],
            Self::Lesson => &[Self::Submodule, Self::Module],
            Self::Exercise => &[Self::Lesson],
            Self::ProgressMark => &[Self::Account, Self::Module, Self::Lesson],
            Self::LessonCheckAttempt => &[Self::Account, Self::Lesson],
            Self::ExerciseAttempt => &[Self::Account, Self::Exercise, Self::Lesson],
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
