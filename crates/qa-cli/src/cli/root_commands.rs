use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Report which storage engine is active and where it points.
    Engine,
    /// Create (or migrate) the file-engine database.
    Init,
    /// Produce a backup artifact for the active engine.
    Backup(BackupArgs),
    /// Replace ALL data in the active engine with the contents of a backup.
    Restore(RestoreArgs),
}

/// Artifact requested from `qalab backup`.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, ValueEnum)]
pub enum ArtifactChoice {
    /// Whatever the active engine restores from.
    #[default]
    Native,
    /// A portable JSON snapshot.
    Json,
}

#[derive(Clone, Debug, Args)]
pub struct BackupArgs {
    /// Output file, or a directory to place a timestamped artifact in
    /// (defaults to `backup.output_dir`).
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Artifact to produce.
    #[arg(long, value_enum, default_value_t = ArtifactChoice::Native)]
    pub artifact: ArtifactChoice,
}

#[derive(Clone, Debug, Args)]
pub struct RestoreArgs {
    /// Backup artifact: a database image (file engine) or a JSON snapshot
    /// (networked engine).
    pub path: PathBuf,

    /// Accept that every existing row will be deleted and replaced.
    #[arg(short, long)]
    pub yes: bool,
}
