//! Coordinates, scan results and project identity.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{SchemaError, Sha1Digest};

/// A published library identity: Maven `groupId:artifactId:version`.
///
/// Field names serialize in the camelCase form lookup services and POM
/// consumers use.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Coordinate {
    /// Dot-separated group, e.g. `org.apache.poi`.
    pub group_id: String,
    /// Artifact name within the group, e.g. `poi-ooxml`.
    pub artifact_id: String,
    /// Published version string, e.g. `3.10.1`.
    pub version: String,
}

impl Coordinate {
    /// Create a coordinate from its three parts.
    pub fn new(
        group_id: impl Into<String>,
        artifact_id: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            group_id: group_id.into(),
            artifact_id: artifact_id.into(),
            version: version.into(),
        }
    }

    /// Derive a coordinate from a Maven repository directory path.
    ///
    /// The last two segments are the artifact and version, everything before
    /// them is the group (dot-joined):
    ///
    /// ```
    /// use pomscan_schema::Coordinate;
    ///
    /// let c = Coordinate::from_dir_path("org/apache/poi/poi-ooxml/3.10.1").unwrap();
    /// assert_eq!(c, Coordinate::new("org.apache.poi", "poi-ooxml", "3.10.1"));
    /// ```
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidDirPath`] if the path has fewer than three
    /// non-empty segments.
    pub fn from_dir_path(path: &str) -> Result<Self, SchemaError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let [group @ .., artifact, version] = segments.as_slice() else {
            return Err(SchemaError::InvalidDirPath(path.to_string()));
        };
        if group.is_empty() {
            return Err(SchemaError::InvalidDirPath(path.to_string()));
        }

        Ok(Self::new(group.join("."), *artifact, *version))
    }
}

impl fmt::Display for Coordinate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)
    }
}

/// Outcome of scanning a single archive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanResult {
    /// Path of the archive relative to the scanned root.
    pub path: String,
    /// File name of the archive.
    pub filename: String,
    /// Content digest of the archive.
    pub sha1: Sha1Digest,
    /// Coordinate from the first lookup source that matched, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dependency: Option<Coordinate>,
}

impl ScanResult {
    /// Whether a lookup source matched this archive.
    pub fn is_resolved(&self) -> bool {
        self.dependency.is_some()
    }
}

/// Identity of the generated project itself (the `<project>` header of the POM).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProjectIdentity {
    /// Project `groupId`.
    pub group_id: String,
    /// Project `artifactId`.
    pub artifact_id: String,
    /// Project `version`.
    pub version: String,
}

impl Default for ProjectIdentity {
    fn default() -> Self {
        Self {
            group_id: "group-id".to_string(),
            artifact_id: "artifact-id".to_string(),
            version: "1.0".to_string(),
        }
    }
}
