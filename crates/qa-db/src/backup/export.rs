//! Snapshot export.

use qa_core::{EntityKind, Snapshot, SnapshotData};

use crate::error::BackupError;
use crate::store::SnapshotStore;

/// Read every row of all eight entity kinds and wrap them in a fresh snapshot.
///
/// The eight reads are independent and run concurrently. No cross-kind
/// transaction is taken, so a store under concurrent writes can yield a
/// snapshot with dangling references.
///
/// # Errors
///
/// Returns `BackupError::StorageReadFailure` if any read fails. There is no
/// partial result.
pub async fn export_snapshot<S: SnapshotStore>(store: &S) -> Result<Snapshot, BackupError> {
    let fetch = |kind: EntityKind| async move {
        store
            .fetch_rows(kind)
            .await
            .map_err(|e| BackupError::read(format!("fetching {kind} rows"), e))
    };

    let (
        account,
        module,
        submodule,
        lesson,
        exercise,
        progress_mark,
        lesson_check_attempt,
        exercise_attempt,
    ) = tokio::try_join!(
        fetch(EntityKind::Account),
        fetch(EntityKind::Module),
        fetch(EntityKind::Submodule),
        fetch(EntityKind::Lesson),
        fetch(EntityKind::Exercise),
        fetch(EntityKind::ProgressMark),
        fetch(EntityKind::LessonCheckAttempt),
        fetch(EntityKind::ExerciseAttempt),
    )?;

    let snapshot = Snapshot::new(SnapshotData {
        account,
        module,
        submodule,
        lesson,
        exercise,
        progress_mark,
        lesson_check_attempt,
        exercise_attempt,
    });

    for (kind, rows) in snapshot.counts() {
        tracing::debug!(%kind, rows, "exported rows");
    }
    tracing::info!(rows = snapshot.data.total_rows(), "exported snapshot");
    Ok(snapshot)
}
