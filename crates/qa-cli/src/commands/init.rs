use std::path::Path;

use anyhow::{Context, bail};
use qa_config::{EngineSelection, QaConfig};
use qa_core::StorageEngine;
use qa_core::responses::InitResponse;
use qa_db::{BackupService, QaDb};

use crate::cli::GlobalFlags;
use crate::commands::backup_failure;
use crate::output::output;

/// Handle `qalab init`.
pub async fn handle(
    project_root: &Path,
    config: &QaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = BackupService::from_config_in(config, project_root).map_err(backup_failure)?;
    let EngineSelection::File { path } = service.selection() else {
        bail!(
            "qalab init only prepares the file engine; the networked engine's schema is managed by the web application"
        );
    };

    let created = !path.exists();
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let db = QaDb::open_local(path)
        .await
        .with_context(|| format!("failed to initialize {}", path.display()))?;
    drop(db);
    tracing::info!(path = %path.display(), created, "file engine ready");

    output(
        &InitResponse {
            engine: StorageEngine::File,
            path: path.display().to_string(),
            created,
        },
        flags.format,
    )
}
