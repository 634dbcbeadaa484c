use std::path::Path;

use qa_config::QaConfig;

use crate::cli::GlobalFlags;
use crate::cli::root_commands::Commands;
use crate::commands;

/// Dispatch a parsed command to the corresponding handler module.
pub async fn dispatch(
    command: Commands,
    project_root: &Path,
    config: &QaConfig,
    flags: &GlobalFlags,
) -> anyhow::Result<()> {
    match command {
        Commands::Engine => commands::engine::handle(project_root, config, flags),
        Commands::Init => commands::init::handle(project_root, config, flags).await,
        Commands::Backup(args) => commands::backup::handle(&args, project_root, config, flags).await,
        Commands::Restore(args) => {
            commands::restore::handle(&args, project_root, config, flags).await
        }
    }
}
