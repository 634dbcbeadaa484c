use std::path::{Path, PathBuf};

use anyhow::Context;
use qa_config::QaConfig;
use qa_core::responses::BackupResponse;
use qa_db::{BackupFormat, BackupService};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::{ArtifactChoice, BackupArgs};
use crate::commands::backup_failure;
use crate::output::output;

/// Handle `qalab backup`.
pub async fn handle(
    args: &BackupArgs,
    project_root: &Path,
    config: &QaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = BackupService::from_config_in(config, project_root).map_err(backup_failure)?;
    let format = match args.artifact {
        ArtifactChoice::Native => BackupFormat::Native,
        ArtifactChoice::Json => BackupFormat::Json,
    };

    let artifact = service
        .produce_backup(format)
        .await
        .map_err(backup_failure)?;

    let default_dir = project_root.join(&config.backup.output_dir);
    let path = artifact_path(args.out.as_deref(), &default_dir, &artifact.file_name);
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    tokio::fs::write(&path, &artifact.bytes)
        .await
        .with_context(|| format!("failed to write backup to {}", path.display()))?;
    tracing::info!(path = %path.display(), kind = %artifact.kind, "backup written");

    let response = BackupResponse {
        engine: service.engine(),
        artifact: artifact.kind,
        path: path.display().to_string(),
        bytes: u64::try_from(artifact.bytes.len()).unwrap_or(u64::MAX),
        counts: artifact.counts,
        exported_at: artifact.exported_at,
    };
    output(&response, flags.format)
}

/// Where to write the artifact: `--out` as a file, `--out` as a directory, or
/// the configured backup directory.
fn artifact_path(out: Option<&Path>, default_dir: &Path, file_name: &str) -> PathBuf {
    match out {
        None => default_dir.join(file_name),
        Some(out) if out.is_dir() || ends_with_separator(out) => out.join(file_name),
        Some(out) => out.to_path_buf(),
    }
}

fn ends_with_separator(path: &Path) -> bool {
    path.as_os_str()
        .to_string_lossy()
        .ends_with(std::path::is_separator)
}
