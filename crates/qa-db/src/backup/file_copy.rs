//! Raw byte copy of the file engine's database image.
//!
//! The image is self-contained, so backup and restore bypass the row-level
//! exporter and restorer entirely. Callers must release every connection to
//! the destination before [`restore_file`] overwrites it.

use std::ffi::OsString;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::error::BackupError;

const SIDECAR_SUFFIXES: [&str; 2] = ["-wal", "-shm"];
const ASIDE_SUFFIX: &str = ".restoring";

/// Read the whole database file into memory.
///
/// # Errors
///
/// Returns `BackupError::StorageReadFailure` if the file does not exist or
/// cannot be read.
pub async fn backup_file(source: &Path) -> Result<Vec<u8>, BackupError> {
    let bytes = tokio::fs::read(source)
        .await
        .map_err(|e| BackupError::read(format!("reading {}", source.display()), e))?;
    tracing::info!(path = %source.display(), bytes = bytes.len(), "read database image");
    Ok(bytes)
}

/// Overwrite the database file with `bytes`.
///
/// The image is staged in a synced temp file next to `dest` and renamed over
/// it. Stale `-wal`/`-shm` sidecars are moved aside for the rename so an old
/// write-ahead log is not replayed over the new image; if the rename fails
/// they are put back and `dest` is left as it was.
///
/// # Errors
///
/// Returns `BackupError::StorageWriteFailure` if any filesystem step fails.
pub async fn restore_file(dest: &Path, bytes: &[u8]) -> Result<(), BackupError> {
    let parent = match dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        Some(parent) => parent.to_path_buf(),
        None => PathBuf::from("."),
    };
    tokio::fs::create_dir_all(&parent)
        .await
        .map_err(|e| BackupError::write(format!("creating {}", parent.display()), e))?;

    let staged = stage_image(parent, bytes.to_vec()).await?;
    let set_aside = set_sidecars_aside(dest).await?;

    let target = dest.to_path_buf();
    let persisted = tokio::task::spawn_blocking(move || staged.persist(&target))
        .await
        .map_err(|e| BackupError::write("replacing the image", anyhow::Error::new(e)))?;

    if let Err(e) = persisted {
        restore_sidecars(&set_aside).await;
        return Err(BackupError::write(
            format!("replacing {}", dest.display()),
            e.error,
        ));
    }

    for (_, aside) in &set_aside {
        if let Err(e) = tokio::fs::remove_file(aside).await {
            tracing::warn!(path = %aside.display(), error = %e, "could not remove old sidecar");
        }
    }
    tracing::info!(path = %dest.display(), bytes = bytes.len(), "wrote database image");
    Ok(())
}

async fn stage_image(dir: PathBuf, bytes: Vec<u8>) -> Result<NamedTempFile, BackupError> {
    let context = format!("staging the image in {}", dir.display());
    tokio::task::spawn_blocking(move || -> std::io::Result<NamedTempFile> {
        let mut staged = NamedTempFile::new_in(&dir)?;
        staged.write_all(&bytes)?;
        staged.flush()?;
        staged.as_file().sync_all()?;
        Ok(staged)
    })
    .await
    .map_err(|e| BackupError::write(context.clone(), anyhow::Error::new(e)))?
    .map_err(|e| BackupError::write(context, e))
}

/// Rename existing sidecars to `<name>.restoring`. Returns `(live, aside)` pairs.
async fn set_sidecars_aside(dest: &Path) -> Result<Vec<(PathBuf, PathBuf)>, BackupError> {
    let mut moved = Vec::new();
    for suffix in SIDECAR_SUFFIXES {
        let live = sidecar_path(dest, suffix);
        let aside = sidecar_path(&live, ASIDE_SUFFIX);
        match tokio::fs::rename(&live, &aside).await {
            Ok(()) => {
                tracing::debug!(path = %live.display(), "moved stale sidecar aside");
                moved.push((live, aside));
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => {
                restore_sidecars(&moved).await;
                return Err(BackupError::write(
                    format!("moving {} aside", live.display()),
                    e,
                ));
            }
        }
    }
    Ok(moved)
}

async fn restore_sidecars(moved: &[(PathBuf, PathBuf)]) {
    for (live, aside) in moved {
        if let Err(e) = tokio::fs::rename(aside, live).await {
            tracing::warn!(path = %live.display(), error = %e, "could not put sidecar back");
        }
    }
}

fn sidecar_path(dest: &Path, suffix: &str) -> PathBuf {
    let mut name = OsString::from(dest.as_os_str());
    name.push(suffix);
    PathBuf::from(name)
}
