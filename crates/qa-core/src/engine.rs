//! The two storage backends QA Lab can run on.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::artifact::ArtifactKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum StorageEngine {
    /// A single local SQLite/libSQL database file.
    File,
    /// A PostgreSQL server reached over the network.
    Networked,
}

impl StorageEngine {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Networked => "networked",
        }
    }

    /// The only artifact kind this engine's restore path accepts.
    #[must_use]
    pub const fn restore_artifact(self) -> ArtifactKind {
        match self {
            Self::File => ArtifactKind::FileEngineImage,
            Self::Networked => ArtifactKind::JsonSnapshot,
        }
    }
}

impl fmt::Display for StorageEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_engine_accepts_its_own_artifact() {
        assert_eq!(
            StorageEngine::File.restore_artifact(),
            ArtifactKind::FileEngineImage
        );
        assert_eq!(
            StorageEngine::Networked.restore_artifact(),
            ArtifactKind::JsonSnapshot
        );
    }
}
