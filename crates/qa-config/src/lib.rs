//! # qa-config
//!
//! Layered configuration loading for QA Lab using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`QALAB_*` prefix, `__` as separator)
//! 2. The conventional `DATABASE_URL` variable (mapped to `database.url`)
//! 3. Project-level `.qalab/config.toml`
//! 4. User-level `~/.config/qalab/config.toml`
//! 5. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `QALAB_DATABASE__HOST` -> `database.host`,
//! `QALAB_BACKUP__OUTPUT_DIR` -> `backup.output_dir`, etc.
//! The `__` (double underscore) separates nested config sections.
//!
//! # Usage
//!
//! ```no_run
//! use qa_config::QaConfig;
//!
//! let config = QaConfig::load_with_dotenv().expect("config");
//!
//! if config.database.is_networked_engine() {
//!     println!("using the networked engine");
//! }
//! ```

mod backup;
mod database;
mod error;
mod general;

pub use backup::BackupConfig;
pub use database::{DatabaseConfig, EngineSelection};
pub use error::ConfigError;
pub use general::GeneralConfig;

use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Connection settings read from `QALAB_*` verbatim. Figment would otherwise
/// parse `007` as the integer 7 or `[x]` as an array.
const VERBATIM_ENV_KEYS: [&str; 5] = [
    "database.url",
    "database.host",
    "database.name",
    "database.user",
    "database.password",
];

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct QaConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub backup: BackupConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

impl QaConfig {
    /// Load configuration from all sources, relative to the current directory.
    ///
    /// Does NOT call `dotenvy` -- use [`QaConfig::load_with_dotenv`] if you need `.env` file loading.
    pub fn load() -> Result<Self, ConfigError> {
        Self::figment().extract().map_err(ConfigError::from)
    }

    /// Load configuration for a specific project root.
    pub fn load_for_project(project_root: &Path) -> Result<Self, ConfigError> {
        Self::figment_for(project_root)
            .extract()
            .map_err(ConfigError::from)
    }

    /// Load configuration with `.env` file support.
    ///
    /// Calls `dotenvy` to load `.env` from the current directory (or a parent)
    /// before building the figment.
    pub fn load_with_dotenv() -> Result<Self, ConfigError> {
        let _ = dotenvy::dotenv();
        Self::load()
    }

    /// Build the figment provider chain for the current directory.
    pub fn figment() -> Figment {
        Self::figment_for(Path::new("."))
    }

    /// Build the figment provider chain with `project_root/.qalab/config.toml`
    /// as the project layer.
    ///
    /// This is public so tests can inspect the figment directly or add
    /// additional providers on top.
    pub fn figment_for(project_root: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        // Layer 1: User-global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                figment = figment.merge(Toml::file(global_path));
            }
        }

        // Layer 2: Project-local config
        let local_path = project_root.join(".qalab").join("config.toml");
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        // Layer 3: Conventional connection string
        figment = figment.merge(
            Env::raw()
                .only(&["DATABASE_URL"])
                .map(|_| "database.url".into()),
        );

        // Layer 4: Prefixed environment variables (highest priority)
        figment = figment.merge(
            Env::prefixed("QALAB_")
                .split("__")
                .ignore(&VERBATIM_ENV_KEYS),
        );
        let verbatim = Env::prefixed("QALAB_")
            .split("__")
            .only(&VERBATIM_ENV_KEYS);
        for (key, value) in verbatim.iter() {
            figment = figment.merge(Serialized::default(key.as_str(), value));
        }
        figment
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("qalab").join("config.toml"))
    }
}
