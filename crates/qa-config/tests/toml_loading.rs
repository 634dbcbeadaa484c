//! Integration tests for TOML configuration loading.
//!
//! Uses figment::Jail for safe, sandboxed env var manipulation.

use figment::{
    Figment, Jail,
    providers::{Format, Serialized, Toml},
};
use qa_config::{EngineSelection, QaConfig};
use qa_core::StorageEngine;

#[test]
fn loads_discrete_database_fields_from_toml() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
host = "db.internal"
name = "qalab"
port = 5432
user = "qalab"
password = ""
max_connections = 2
"#,
        )?;

        let config: QaConfig = Figment::from(Serialized::defaults(QaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.port, Some(5432));
        assert_eq!(config.database.password.as_deref(), Some(""));
        assert_eq!(config.database.max_connections, 2);
        assert!(config.database.is_networked_engine());
        Ok(())
    });
}

#[test]
fn loads_backup_and_general_sections() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[backup]
output_dir = "/var/backups/qalab"
json_on_file_engine = false

[general]
log_level = "info"
"#,
        )?;

        let config: QaConfig = Figment::from(Serialized::defaults(QaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.backup.output_dir, "/var/backups/qalab");
        assert!(!config.backup.json_on_file_engine);
        assert_eq!(config.general.log_level, "info");
        Ok(())
    });
}

#[test]
fn project_config_is_picked_up() {
    Jail::expect_with(|jail| {
        jail.create_dir(".qalab")?;
        jail.create_file(
            ".qalab/config.toml",
            r#"
[database]
file_path = "data/lab.db"
"#,
        )?;

        let config = QaConfig::load_for_project(jail.directory()).expect("config loads");
        assert_eq!(
            config.database.resolve_engine().expect("resolves"),
            EngineSelection::File {
                path: "data/lab.db".into()
            }
        );
        Ok(())
    });
}

#[test]
fn partial_toml_is_incomplete_not_file_engine() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
host = "db.internal"
port = 5432
"#,
        )?;

        let config: QaConfig = Figment::from(Serialized::defaults(QaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert!(!config.database.is_networked_engine());
        let err = config.database.resolve_engine().unwrap_err();
        assert!(err.to_string().contains("missing name, user, password"));
        Ok(())
    });
}

#[test]
fn empty_toml_selects_file_engine() {
    Jail::expect_with(|jail| {
        jail.create_file("config.toml", "")?;

        let config: QaConfig = Figment::from(Serialized::defaults(QaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        let selection = config.database.resolve_engine().expect("resolves");
        assert_eq!(selection.engine(), StorageEngine::File);
        Ok(())
    });
}

#[test]
fn bare_numeric_credentials_in_toml_read_as_strings() {
    Jail::expect_with(|jail| {
        jail.create_file(
            "config.toml",
            r#"
[database]
host = "db.internal"
name = 2024
port = 5432
user = "qalab"
password = 123456
"#,
        )?;

        let config: QaConfig = Figment::from(Serialized::defaults(QaConfig::default()))
            .merge(Toml::file("config.toml"))
            .extract()?;

        assert_eq!(config.database.name, "2024");
        assert_eq!(config.database.password.as_deref(), Some("123456"));
        assert!(config.database.is_networked_engine());
        Ok(())
    });
}
