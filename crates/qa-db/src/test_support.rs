//! Shared seed helpers for qa-db tests.

use qa_core::{EntityCounts, EntityKind};

use crate::QaDb;

/// One row of every kind along the longest parent/child chain:
/// Account, Module, Submodule, Lesson, Exercise, and every attempt/progress kind.
pub async fn seed_full_chain(db: &QaDb) {
    db.conn()
        .execute_batch(
            r#"
            INSERT INTO "Account" ("id", "email", "name", "passwordHash", "role")
                VALUES ('acc-1', 'ada@example.com', 'Ada', 'hash-1', 'student');
            INSERT INTO "Module" ("id", "title", "description", "order")
                VALUES ('mod-1', 'Testing basics', 'Why we test', 1);
            INSERT INTO "Submodule" ("id", "moduleId", "title", "order")
                VALUES ('sub-1', 'mod-1', 'Unit tests', 1);
            INSERT INTO "Lesson" ("id", "submoduleId", "title", "content", "order")
                VALUES ('les-1', 'sub-1', 'Assertions', '# Assertions', 1);
            INSERT INTO "Exercise" ("id", "lessonId", "prompt", "expectedAnswer", "order")
                VALUES ('ex-1', 'les-1', 'What does assert_eq compare?', 'values', 1);
            INSERT INTO "ProgressMark" ("id", "userId", "courseId", "lessonId")
                VALUES ('pm-1', 'acc-1', 'mod-1', 'les-1');
            INSERT INTO "LessonCheckAttempt" ("id", "userId", "lessonId", "retries", "passed")
                VALUES ('lca-1', 'acc-1', 'les-1', 2, 1);
            INSERT INTO "ExerciseAttempt" ("id", "userId", "exerciseId", "lessonId", "answer", "correct")
                VALUES ('att-1', 'acc-1', 'ex-1', 'les-1', 'values', 1);
            "#,
        )
        .await
        .unwrap();
}

/// 2 Accounts, 1 Module, 1 Submodule, 2 Lessons, 3 Exercises, 5 ProgressMarks.
pub async fn seed_small_course(db: &QaDb) {
    db.conn()
        .execute_batch(
            r#"
            INSERT INTO "Account" ("id", "email", "passwordHash", "role")
                VALUES ('a-1', 'grace@example.com', 'hash-a1', 'admin');
            INSERT INTO "Account" ("id", "email", "passwordHash")
                VALUES ('a-2', 'linus@example.com', 'hash-a2');
            INSERT INTO "Module" ("id", "title") VALUES ('m-1', 'Integration testing');
            INSERT INTO "Submodule" ("id", "moduleId", "title") VALUES ('s-1', 'm-1', 'Fixtures');
            INSERT INTO "Lesson" ("id", "moduleId", "title") VALUES ('l-1', 'm-1', 'Test doubles');
            INSERT INTO "Lesson" ("id", "submoduleId", "title") VALUES ('l-2', 's-1', 'Setup and teardown');
            INSERT INTO "Exercise" ("id", "lessonId", "prompt") VALUES ('e-1', 'l-1', 'Name a stub');
            INSERT INTO "Exercise" ("id", "lessonId", "prompt") VALUES ('e-2', 'l-1', 'Name a mock');
            INSERT INTO "Exercise" ("id", "lessonId", "prompt") VALUES ('e-3', 'l-2', 'When does teardown run?');
            INSERT INTO "ProgressMark" ("id", "userId", "courseId", "lessonId") VALUES ('p-1', 'a-1', 'm-1', 'l-1');
            INSERT INTO "ProgressMark" ("id", "userId", "courseId", "lessonId") VALUES ('p-2', 'a-1', 'm-1', 'l-2');
            INSERT INTO "ProgressMark" ("id", "userId", "courseId", "lessonId") VALUES ('p-3', 'a-2', 'm-1', 'l-1');
            INSERT INTO "ProgressMark" ("id", "userId", "courseId", "lessonId") VALUES ('p-4', 'a-2', 'm-1', 'l-2');
            INSERT INTO "ProgressMark" ("id", "userId", "courseId", "lessonId") VALUES ('p-5', 'a-1', 'm-1', 'l-1');
            "#,
        )
        .await
        .unwrap();
}

pub async fn seed_one_account(db: &QaDb, id: &str) {
    db.conn()
        .execute(
            "INSERT INTO \"Account\" (\"id\", \"email\", \"passwordHash\") VALUES (?1, ?2, 'hash')",
            [id.to_string(), format!("{id}@example.com")],
        )
        .await
        .unwrap();
}

/// Row count of every entity kind, read straight from the tables.
pub async fn counts(db: &QaDb) -> EntityCounts {
    let mut counts = EntityCounts::new();
    for kind in EntityKind::INSERTION_ORDER {
        let n = db.count_rows(kind).await.unwrap();
        counts.insert(kind, usize::try_from(n).unwrap());
    }
    counts
}
