use std::path::Path;

use qa_config::QaConfig;
use qa_db::BackupService;

use crate::cli::GlobalFlags;
use crate::commands::backup_failure;
use crate::output::output;

/// Handle `qalab engine`.
pub fn handle(project_root: &Path, config: &QaConfig, flags: &GlobalFlags) -> anyhow::Result<()> {
    let service = BackupService::from_config_in(config, project_root).map_err(backup_failure)?;
    output(&service.report(), flags.format)
}
