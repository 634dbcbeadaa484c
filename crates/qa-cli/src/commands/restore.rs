use std::path::Path;
use std::time::Instant;

use anyhow::Context;
use qa_config::QaConfig;
use qa_core::responses::RestoreResponse;
use qa_db::{BackupError, BackupService, RestoreRequest};

use crate::cli::GlobalFlags;
use crate::cli::root_commands::RestoreArgs;
use crate::commands::backup_failure;
use crate::output::output;

/// Handle `qalab restore`.
pub async fn handle(
    args: &RestoreArgs,
    project_root: &Path,
    config: &QaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    let service = BackupService::from_config_in(config, project_root).map_err(backup_failure)?;
    let report = service.report();

    eprintln!(
        "WARNING: restore DELETES EVERY ROW in the {} engine ({}) and replaces it with the contents of {}. This cannot be undone.",
        report.engine,
        report.target,
        args.path.display()
    );
    if !args.yes {
        eprintln!("Re-run with --yes to accept the overwrite.");
        return Err(backup_failure(BackupError::ConfirmationRequired));
    }

    let bytes = tokio::fs::read(&args.path)
        .await
        .with_context(|| format!("failed to read backup artifact {}", args.path.display()))?;
    let declared_name = args
        .path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned());

    let started = Instant::now();
    let outcome = service
        .restore(RestoreRequest {
            bytes,
            declared_name,
            confirm_overwrite: args.yes,
        })
        .await
        .map_err(backup_failure)?;

    let response = RestoreResponse {
        engine: outcome.engine,
        artifact: outcome.artifact,
        restored: true,
        counts: outcome.counts,
        duration_ms: u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX),
    };
    output(&response, flags.format)
}
