//! Snapshot restore.
//!
//! Validation runs to completion before the store is touched. Only a fully
//! parsed [`Snapshot`] reaches [`apply_snapshot`], which deletes every row in
//! [`EntityKind::DELETION_ORDER`] and re-inserts in
//! [`EntityKind::INSERTION_ORDER`] inside one transaction.

use qa_core::{CoreError, EntityCounts, EntityKind, Snapshot, SnapshotData};

use crate::error::{BackupError, DatabaseError, RestoreStep};
use crate::store::{SnapshotStore, StoreTransaction};

/// Validate raw snapshot bytes without touching any store.
///
/// # Errors
///
/// Returns `BackupError::MalformedSnapshot` naming the first violation.
pub fn parse_snapshot(candidate: &[u8]) -> Result<Snapshot, BackupError> {
    Snapshot::from_slice(candidate).map_err(|e| match e {
        CoreError::MalformedSnapshot(reason) => BackupError::MalformedSnapshot { reason },
        other => BackupError::MalformedSnapshot {
            reason: other.to_string(),
        },
    })
}

/// Validate `candidate`, then replace every row in `store` with its rows.
///
/// # Errors
///
/// - `MalformedSnapshot` if validation fails; the store is not touched.
/// - `StorageWriteFailure` if the transaction cannot be opened.
/// - `TransactionAborted` if any delete, insert, or the commit fails; the
///   store is rolled back to its prior state.
pub async fn restore_snapshot<S: SnapshotStore>(
    store: &S,
    candidate: &[u8],
) -> Result<EntityCounts, BackupError> {
    let snapshot = parse_snapshot(candidate)?;
    apply_snapshot(store, &snapshot).await
}

/// Replace every row in `store` with the rows of an already-validated snapshot.
///
/// Returns the number of rows restored per entity kind.
///
/// # Errors
///
/// See [`restore_snapshot`].
pub async fn apply_snapshot<S: SnapshotStore>(
    store: &S,
    snapshot: &Snapshot,
) -> Result<EntityCounts, BackupError> {
    tracing::info!(
        rows = snapshot.data.total_rows(),
        "restoring snapshot; all existing rows will be replaced"
    );

    let mut tx = store
        .begin()
        .await
        .map_err(|e| BackupError::write("opening the restore transaction", e))?;

    if let Err((step, source)) = replace_all(&mut tx, &snapshot.data).await {
        tracing::warn!(%step, error = %source, "restore failed, rolling back");
        if let Err(rollback_err) = tx.rollback().await {
            tracing::warn!(error = %rollback_err, "rollback reported an error");
        }
        return Err(BackupError::TransactionAborted { step, source });
    }

    tx.commit()
        .await
        .map_err(|source| BackupError::TransactionAborted {
            step: RestoreStep::Commit,
            source,
        })?;

    tracing::info!("restore committed");
    Ok(snapshot.counts())
}

async fn replace_all<T: StoreTransaction>(
    tx: &mut T,
    data: &SnapshotData,
) -> Result<(), (RestoreStep, DatabaseError)> {
    for kind in EntityKind::DELETION_ORDER {
        let deleted = tx
            .delete_all(kind)
            .await
            .map_err(|e| (RestoreStep::Delete(kind), e))?;
        tracing::debug!(%kind, deleted, "cleared rows");
    }

    for kind in EntityKind::INSERTION_ORDER {
        let rows = data.rows(kind);
        if rows.is_empty() {
            continue;
        }
        let inserted = tx
            .insert_rows(kind, rows)
            .await
            .map_err(|e| (RestoreStep::Insert(kind), e))?;
        tracing::debug!(%kind, inserted, "inserted rows");
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::QaDb;
    use crate::backup::export::export_snapshot;
    use crate::error::BackupErrorKind;
    use crate::test_support::{counts, seed_full_chain, seed_one_account, seed_small_course};
    use pretty_assertions::assert_eq;
    use qa_core::Record;
    use serde_json::{Value, json};

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    fn document(data: Value) -> Vec<u8> {
        serde_json::to_vec(&json!({
            "schemaVersion": 1,
            "exportedAt": "2026-10-15T09:30:00Z",
            "data": data,
        }))
        .unwrap()
    }

    fn empty_collections() -> Value {
        json!({
            "Account": [],
            "Module": [],
            "Submodule": [],
            "Lesson": [],
            "Exercise": [],
            "ProgressMark": [],
            "LessonCheckAttempt": [],
            "ExerciseAttempt": []
        })
    }

    async fn rows_of(db: &QaDb) -> SnapshotData {
        export_snapshot(&db.store()).await.unwrap().data
    }

    fn sorted(mut data: SnapshotData) -> SnapshotData {
        for kind in EntityKind::INSERTION_ORDER {
            data.rows_mut(kind)
                .sort_by(|a, b| a["id"].to_string().cmp(&b["id"].to_string()));
        }
        data
    }

    #[tokio::test]
    async fn export_then_restore_reproduces_every_row() {
        let source = QaDb::open_in_memory().await.unwrap();
        seed_full_chain(&source).await;
        seed_small_course(&source).await;
        let snapshot = export_snapshot(&source.store()).await.unwrap();
        let bytes = snapshot.to_json_bytes().unwrap();

        let target = QaDb::open_in_memory().await.unwrap();
        seed_one_account(&target, "acc-stale").await;
        restore_snapshot(&target.store(), &bytes).await.unwrap();

        assert_eq!(sorted(rows_of(&target).await), sorted(snapshot.data));
    }

    #[tokio::test]
    async fn small_course_restores_exact_counts_into_empty_store() {
        let source = QaDb::open_in_memory().await.unwrap();
        seed_small_course(&source).await;
        let bytes = export_snapshot(&source.store())
            .await
            .unwrap()
            .to_json_bytes()
            .unwrap();

        let target = QaDb::open_in_memory().await.unwrap();
        let restored = restore_snapshot(&target.store(), &bytes).await.unwrap();

        assert_eq!(counts(&target).await, counts(&source).await);
        assert_eq!(restored, counts(&source).await);
    }

    #[tokio::test]
    async fn restore_over_full_chain_respects_foreign_keys() {
        let db = QaDb::open_in_memory().await.unwrap();
        seed_full_chain(&db).await;

        let mut data = empty_collections();
        data["Account"] = json!([{ "id": "acc-new", "email": "new@example.com", "passwordHash": "x" }]);
        data["Module"] = json!([{ "id": "mod-new", "title": "Mutation testing" }]);
        data["Lesson"] = json!([{ "id": "les-new", "moduleId": "mod-new", "title": "Survivors" }]);
        data["Exercise"] = json!([{ "id": "ex-new", "lessonId": "les-new", "prompt": "Kill it" }]);
        data["ExerciseAttempt"] = json!([{
            "id": "att-new",
            "userId": "acc-new",
            "exerciseId": "ex-new",
            "lessonId": "les-new",
            "correct": 1
        }]);

        restore_snapshot(&db.store(), &document(data)).await.unwrap();

        let after = rows_of(&db).await;
        assert_eq!(after.account.len(), 1);
        assert_eq!(after.account[0]["id"], json!("acc-new"));
        assert!(after.submodule.is_empty());
        assert_eq!(after.exercise_attempt[0]["exerciseId"], json!("ex-new"));
    }

    #[tokio::test]
    async fn future_version_leaves_store_untouched() {
        let db = QaDb::open_in_memory().await.unwrap();
        seed_one_account(&db, "acc-1").await;
        let before = rows_of(&db).await;

        let candidate =
            serde_json::to_vec(&json!({ "schemaVersion": 2, "data": empty_collections() }))
                .unwrap();
        let err = restore_snapshot(&db.store(), &candidate).await.unwrap_err();

        assert_eq!(err.kind(), BackupErrorKind::MalformedSnapshot);
        assert_eq!(db.count_rows(EntityKind::Account).await.unwrap(), 1);
        assert_eq!(rows_of(&db).await, before);
    }

    #[tokio::test]
    async fn missing_exercise_collection_is_rejected_before_deleting() {
        let db = QaDb::open_in_memory().await.unwrap();
        seed_full_chain(&db).await;
        let before = rows_of(&db).await;

        let mut data = empty_collections();
        data.as_object_mut().unwrap().remove("Exercise");
        let err = restore_snapshot(&db.store(), &document(data))
            .await
            .unwrap_err();

        match err {
            BackupError::MalformedSnapshot { reason } => {
                assert_eq!(reason, "data.Exercise is missing");
            }
            other => panic!("expected MalformedSnapshot, got {other:?}"),
        }
        assert_eq!(rows_of(&db).await, before);
    }

    #[tokio::test]
    async fn malformed_candidates_never_reach_the_store() {
        let db = QaDb::open_in_memory().await.unwrap();
        seed_full_chain(&db).await;
        let before = rows_of(&db).await;

        let mut non_array = empty_collections();
        non_array["Lesson"] = json!({});
        let candidates: Vec<Vec<u8>> = vec![
            b"SQLite format 3\0garbage".to_vec(),
            b"[]".to_vec(),
            serde_json::to_vec(&json!({ "schemaVersion": 1 })).unwrap(),
            serde_json::to_vec(&json!({ "data": empty_collections() })).unwrap(),
            document(non_array),
        ];

        for candidate in candidates {
            let err = restore_snapshot(&db.store(), &candidate)
                .await
                .unwrap_err();
            assert_eq!(err.kind(), BackupErrorKind::MalformedSnapshot);
        }
        assert_eq!(rows_of(&db).await, before);
    }

    #[tokio::test]
    async fn dangling_reference_rolls_back_everything() {
        let db = QaDb::open_in_memory().await.unwrap();
        seed_full_chain(&db).await;
        let before = rows_of(&db).await;

        let mut data = empty_collections();
        data["Module"] = json!([{ "id": "mod-new", "title": "Fuzzing" }]);
        data["Exercise"] = json!([{ "id": "ex-orphan", "lessonId": "les-gone", "prompt": "?" }]);

        let err = restore_snapshot(&db.store(), &document(data))
            .await
            .unwrap_err();

        match err {
            BackupError::TransactionAborted { step, .. } => {
                assert_eq!(step, RestoreStep::Insert(EntityKind::Exercise));
            }
            other => panic!("expected TransactionAborted, got {other:?}"),
        }
        assert_eq!(rows_of(&db).await, before);
    }

    #[tokio::test]
    async fn empty_snapshot_clears_the_store() {
        let db = QaDb::open_in_memory().await.unwrap();
        seed_full_chain(&db).await;

        let restored = restore_snapshot(&db.store(), &document(empty_collections()))
            .await
            .unwrap();

        assert!(restored.values().all(|n| *n == 0));
        assert_eq!(rows_of(&db).await, SnapshotData::default());
    }

    #[tokio::test]
    async fn apply_accepts_prebuilt_snapshot() {
        let db = QaDb::open_in_memory().await.unwrap();
        let mut data = SnapshotData::default();
        data.module
            .push(record(json!({ "id": "mod-1", "title": "Contract tests" })));
        let snapshot = Snapshot::new(data);

        let restored = apply_snapshot(&db.store(), &snapshot).await.unwrap();

        assert_eq!(restored[&EntityKind::Module], 1);
        assert_eq!(db.count_rows(EntityKind::Module).await.unwrap(), 1);
    }

    #[test]
    fn parse_reports_first_violation() {
        let err = parse_snapshot(b"{\"schemaVersion\": \"1\"}").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Malformed snapshot: unsupported schemaVersion \"1\", expected 1"
        );
    }
}
