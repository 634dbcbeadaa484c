use std::path::Path;

use qa_config::QaConfig;

/// Load `.env` from the project root (falling back to the usual upward
/// search), then the layered configuration for that project.
pub fn load_config(project_root: &Path) -> anyhow::Result<QaConfig> {
    let project_env = project_root.join(".env");
    if project_env.is_file() {
        dotenvy::from_path(&project_env).map_err(|error| {
            anyhow::anyhow!("failed to load {}: {error}", project_env.display())
        })?;
    } else {
        let _ = dotenvy::dotenv();
    }

    QaConfig::load_for_project(project_root).map_err(anyhow::Error::from)
}
