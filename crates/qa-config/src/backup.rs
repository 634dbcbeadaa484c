//! Backup artifact defaults.

use serde::{Deserialize, Serialize};

fn default_output_dir() -> String {
    ".qalab/backups".to_string()
}

const fn default_json_on_file_engine() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct BackupConfig {
    /// Directory `qalab backup` writes artifacts to when no `--out` is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,

    /// Allow the portable JSON snapshot export on the file engine.
    #[serde(default = "default_json_on_file_engine")]
    pub json_on_file_engine: bool,
}

impl Default for BackupConfig {
    fn default() -> Self {
        Self {
            output_dir: default_output_dir(),
            json_on_file_engine: default_json_on_file_engine(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_correct() {
        let config = BackupConfig::default();
        assert_eq!(config.output_dir, ".qalab/backups");
        assert!(config.json_on_file_engine);
    }
}
