pub mod backup;
pub mod dispatch;
pub mod engine;
pub mod init;
pub mod restore;

use qa_db::BackupError;

/// Prefix a backup failure with its stable kind, e.g. `malformed_snapshot: ...`.
pub fn backup_failure(error: BackupError) -> anyhow::Error {
    let kind = error.kind();
    anyhow::Error::new(error).context(kind.as_str())
}
