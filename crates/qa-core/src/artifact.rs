//! File-identity sniffing for uploaded or loaded backup artifacts.
//!
//! Runs before any parser so a mismatched upload is rejected with a clear
//! message instead of a low-level parse error. Classification ignores the
//! file extension except as a hint for JSON.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// First 16 bytes of every file-engine (SQLite/libSQL) database image.
pub const FILE_ENGINE_MAGIC: &[u8; 16] = b"SQLite format 3\0";

/// What an artifact appears to be.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum ArtifactKind {
    FileEngineImage,
    JsonSnapshot,
    Unknown,
}

impl ArtifactKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::FileEngineImage => "file-engine-image",
            Self::JsonSnapshot => "json-snapshot",
            Self::Unknown => "unknown",
        }
    }

    /// Human-readable description used in user-facing rejections.
    #[must_use]
    pub const fn describe(self) -> &'static str {
        match self {
            Self::FileEngineImage => "a SQLite database file",
            Self::JsonSnapshot => "a JSON backup snapshot",
            Self::Unknown => "an unrecognised file",
        }
    }

    /// File extension used when writing an artifact of this kind.
    #[must_use]
    pub const fn extension(self) -> &'static str {
        match self {
            Self::FileEngineImage => "db",
            Self::JsonSnapshot => "json",
            Self::Unknown => "bin",
        }
    }
}

impl fmt::Display for ArtifactKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classify an artifact from its leading bytes and optional declared name.
///
/// The magic header wins over everything, so a `.json`-named database image
/// is still a database image.
#[must_use]
pub fn classify_artifact(bytes: &[u8], declared_name: Option<&str>) -> ArtifactKind {
    if bytes.starts_with(FILE_ENGINE_MAGIC) {
        return ArtifactKind::FileEngineImage;
    }
    if declared_name.is_some_and(has_json_suffix) || first_non_whitespace(bytes) == Some(b'{') {
        return ArtifactKind::JsonSnapshot;
    }
    ArtifactKind::Unknown
}

fn has_json_suffix(name: &str) -> bool {
    name.to_ascii_lowercase().ends_with(".json")
}

fn first_non_whitespace(bytes: &[u8]) -> Option<u8> {
    let bytes = bytes.strip_prefix(b"\xEF\xBB\xBF").unwrap_or(bytes);
    bytes.iter().copied().find(|b| !b.is_ascii_whitespace())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn magic_header_alone_is_a_database_image() {
        assert_eq!(
            classify_artifact(b"SQLite format 3\0", None),
            ArtifactKind::FileEngineImage
        );
    }

    #[test]
    fn magic_header_beats_json_name() {
        let mut image = FILE_ENGINE_MAGIC.to_vec();
        image.extend_from_slice(&[0x10, 0x00, 0x01, 0x01]);
        assert_eq!(
            classify_artifact(&image, Some("backup.json")),
            ArtifactKind::FileEngineImage
        );
    }

    #[rstest]
    #[case::brace(b"{\"schemaVersion\":1}".as_slice(), None)]
    #[case::leading_whitespace(b"\n\t  {\"data\":{}}".as_slice(), None)]
    #[case::byte_order_mark(b"\xEF\xBB\xBF{}".as_slice(), None)]
    #[case::json_name(b"[]".as_slice(), Some("qalab-backup.json"))]
    #[case::upper_json_name(b"".as_slice(), Some("BACKUP.JSON"))]
    fn json_snapshot(#[case] bytes: &[u8], #[case] name: Option<&str>) {
        assert_eq!(classify_artifact(bytes, name), ArtifactKind::JsonSnapshot);
    }

    #[rstest]
    #[case::empty(b"".as_slice(), None)]
    #[case::truncated_magic(b"SQLite format".as_slice(), None)]
    #[case::wrong_case_magic(b"sqlite format 3\0".as_slice(), Some("backup.db"))]
    #[case::array(b"[1,2,3]".as_slice(), Some("backup.txt"))]
    #[case::zip(b"PK\x03\x04".as_slice(), Some("backup.zip"))]
    fn unknown(#[case] bytes: &[u8], #[case] name: Option<&str>) {
        assert_eq!(classify_artifact(bytes, name), ArtifactKind::Unknown);
    }

    #[test]
    fn kinds_render_as_kebab_case() {
        assert_eq!(ArtifactKind::FileEngineImage.to_string(), "file-engine-image");
        assert_eq!(
            serde_json::to_value(ArtifactKind::JsonSnapshot).unwrap(),
            serde_json::json!("json-snapshot")
        );
    }
}
