//! Engine dispatch for the three administrative operations: report the active
//! engine, produce a backup artifact, and restore from an artifact.
//!
//! The file engine backs up and restores as a raw image copy. The networked
//! engine goes through the exporter and restorer. Every restore runs the
//! confirmation gate, then the artifact sniffer, then (for snapshots) full
//! validation, before anything connects to or writes the store.

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Utc};
use qa_config::{ConfigError, EngineSelection, QaConfig};
use qa_core::responses::EngineReport;
use qa_core::{ArtifactKind, EntityCounts, Snapshot, StorageEngine, classify_artifact};

use crate::QaDb;
use crate::backup::export::export_snapshot;
use crate::backup::file_copy::{backup_file, restore_file};
use crate::backup::restore::{apply_snapshot, parse_snapshot};
use crate::error::{BackupError, DatabaseError};
use crate::store::PgStore;

/// Which artifact `produce_backup` should create.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BackupFormat {
    /// The artifact the active engine restores from: a database image on the
    /// file engine, a JSON snapshot on the networked engine.
    #[default]
    Native,
    /// Always a JSON snapshot.
    Json,
}

/// A produced backup, ready for the caller to persist.
#[derive(Debug, Clone)]
pub struct BackupArtifact {
    pub kind: ArtifactKind,
    pub file_name: String,
    pub bytes: Vec<u8>,
    /// Rows per entity kind; `None` for a raw database image.
    pub counts: Option<EntityCounts>,
    pub exported_at: Option<DateTime<Utc>>,
}

impl BackupArtifact {
    fn image(bytes: Vec<u8>) -> Self {
        Self {
            kind: ArtifactKind::FileEngineImage,
            file_name: artifact_file_name(ArtifactKind::FileEngineImage, Utc::now()),
            bytes,
            counts: None,
            exported_at: None,
        }
    }

    fn snapshot(snapshot: &Snapshot) -> Result<Self, BackupError> {
        let bytes = snapshot
            .to_json_bytes()
            .map_err(|e| BackupError::read("serializing the snapshot", anyhow::Error::new(e)))?;
        let stamp = snapshot.exported_at.unwrap_or_else(Utc::now);
        Ok(Self {
            kind: ArtifactKind::JsonSnapshot,
            file_name: artifact_file_name(ArtifactKind::JsonSnapshot, stamp),
            bytes,
            counts: Some(snapshot.counts()),
            exported_at: snapshot.exported_at,
        })
    }
}

/// An artifact handed to `restore`.
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub bytes: Vec<u8>,
    /// File name as uploaded or loaded, used as a JSON hint by the sniffer.
    pub declared_name: Option<String>,
    /// The caller accepts that every existing row will be replaced.
    pub confirm_overwrite: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RestoreOutcome {
    pub engine: StorageEngine,
    pub artifact: ArtifactKind,
    /// Rows restored per entity kind; `None` for a raw database image.
    pub counts: Option<EntityCounts>,
}

/// `qalab-backup-<UTC yyyymmdd-HHMMSS>.<ext>`.
#[must_use]
pub fn artifact_file_name(kind: ArtifactKind, at: DateTime<Utc>) -> String {
    format!(
        "qalab-backup-{}.{}",
        at.format("%Y%m%d-%H%M%S"),
        kind.extension()
    )
}

/// Runs backup and restore against whichever engine the configuration selects.
#[derive(Debug, Clone)]
pub struct BackupService {
    selection: EngineSelection,
    max_connections: u32,
    connect_timeout: Duration,
    json_on_file_engine: bool,
}

impl BackupService {
    /// Resolve the active engine from configuration.
    ///
    /// # Errors
    ///
    /// Returns `BackupError::ConfigurationIncomplete` if the networked-engine
    /// settings are partially present or the connection string is unusable.
    pub fn from_config(config: &QaConfig) -> Result<Self, BackupError> {
        let selection = config.database.resolve_engine()?;
        Ok(Self::with_selection(selection, config))
    }

    /// Like [`BackupService::from_config`], with a relative file-engine path
    /// resolved against `project_root`.
    ///
    /// # Errors
    ///
    /// See [`BackupService::from_config`].
    pub fn from_config_in(config: &QaConfig, project_root: &Path) -> Result<Self, BackupError> {
        let selection = config.database.resolve_engine()?.rooted_at(project_root);
        Ok(Self::with_selection(selection, config))
    }

    /// Service over an explicit engine selection with default settings.
    #[must_use]
    pub fn new(selection: EngineSelection) -> Self {
        Self::with_selection(selection, &QaConfig::default())
    }

    #[must_use]
    pub fn with_selection(selection: EngineSelection, config: &QaConfig) -> Self {
        tracing::info!(
            engine = %selection.engine(),
            target = %selection.redacted_target(),
            "resolved storage engine"
        );
        Self {
            selection,
            max_connections: config.database.max_connections,
            connect_timeout: Duration::from_secs(config.database.connect_timeout_secs),
            json_on_file_engine: config.backup.json_on_file_engine,
        }
    }

    #[must_use]
    pub const fn engine(&self) -> StorageEngine {
        self.selection.engine()
    }

    #[must_use]
    pub const fn selection(&self) -> &EngineSelection {
        &self.selection
    }

    #[must_use]
    pub fn report(&self) -> EngineReport {
        EngineReport {
            engine: self.engine(),
            target: self.selection.redacted_target(),
        }
    }

    /// Produce a backup artifact for the active engine.
    ///
    /// # Errors
    ///
    /// - `StorageReadFailure` if the store cannot be read.
    /// - `ConfigurationIncomplete` if a JSON export of the file engine was
    ///   requested but is disabled by `backup.json_on_file_engine`.
    pub async fn produce_backup(&self, format: BackupFormat) -> Result<BackupArtifact, BackupError> {
        match (&self.selection, format) {
            (EngineSelection::File { path }, BackupFormat::Native) => {
                Ok(BackupArtifact::image(backup_file(path).await?))
            }
            (EngineSelection::File { path }, BackupFormat::Json) => {
                if !self.json_on_file_engine {
                    return Err(ConfigError::InvalidValue {
                        field: "backup.json_on_file_engine".into(),
                        reason: "JSON export is disabled for the file engine".into(),
                    }
                    .into());
                }
                let snapshot = export_file_engine(path).await?;
                BackupArtifact::snapshot(&snapshot)
            }
            (EngineSelection::Networked { connection_url }, _) => {
                let store = self
                    .connect(connection_url)
                    .await
                    .map_err(|e| BackupError::read("connecting to the networked engine", e))?;
                let snapshot = export_snapshot(&store).await;
                store.close().await;
                BackupArtifact::snapshot(&snapshot?)
            }
        }
    }

    /// Restore the active engine from an artifact, replacing all of its rows.
    ///
    /// # Errors
    ///
    /// - `ConfirmationRequired` unless `confirm_overwrite` is set.
    /// - `WrongArtifactType` if the artifact is not what this engine restores from.
    /// - `MalformedSnapshot` if a JSON snapshot fails validation.
    /// - `StorageWriteFailure` / `TransactionAborted` if writing fails; the
    ///   networked engine is rolled back to its prior state.
    pub async fn restore(&self, request: RestoreRequest) -> Result<RestoreOutcome, BackupError> {
        if !request.confirm_overwrite {
            return Err(BackupError::ConfirmationRequired);
        }

        let expected = self.engine().restore_artifact();
        let found = classify_artifact(&request.bytes, request.declared_name.as_deref());
        if found != expected {
            tracing::warn!(%expected, %found, "rejected restore artifact");
            return Err(BackupError::WrongArtifactType { expected, found });
        }

        let counts = match &self.selection {
            EngineSelection::File { path } => {
                restore_file(path, &request.bytes).await?;
                None
            }
            EngineSelection::Networked { connection_url } => {
                let snapshot = parse_snapshot(&request.bytes)?;
                let store = self
                    .connect(connection_url)
                    .await
                    .map_err(|e| BackupError::write("connecting to the networked engine", e))?;
                let restored = apply_snapshot(&store, &snapshot).await;
                store.close().await;
                Some(restored?)
            }
        };

        Ok(RestoreOutcome {
            engine: self.engine(),
            artifact: found,
            counts,
        })
    }

    async fn connect(&self, url: &str) -> Result<PgStore, DatabaseError> {
        PgStore::connect(url, self.max_connections, self.connect_timeout).await
    }
}

/// Export the file engine through its libSQL store.
///
/// Refuses to create a database where none exists.
async fn export_file_engine(path: &Path) -> Result<Snapshot, BackupError> {
    tokio::fs::metadata(path)
        .await
        .map_err(|e| BackupError::read(format!("reading {}", path.display()), e))?;
    let db = QaDb::open_local(path)
        .await
        .map_err(|e| BackupError::read(format!("opening {}", path.display()), e))?;
    export_snapshot(&db.store()).await
}
