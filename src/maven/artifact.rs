use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{LauncherError, LauncherResult};

/// Represents a fully parsed Maven coordinate.
///
/// Supported formats:
///   `groupId:artifactId:version`
///   `groupId:artifactId:version:classifier`
///   `groupId:artifactId:version:classifier@packaging`
///   `groupId:artifactId:version@packaging`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct MavenArtifact {
    pub group_id: String,
    pub artifact_id: String,
    pub version: String,
    pub classifier: Option<String>,
    /// File extension / packaging type. Defaults to `"jar"`.
    pub packaging: String,
}

impl MavenArtifact {
    /// Parse a Maven coordinate string.
    pub fn parse(coord: &str) -> LauncherResult<Self> {
        // Split off @packaging first
        let (coord_part, packaging_override) = if let Some(idx) = coord.rfind('@') {
            (&coord[..idx], Some(&coord[idx + 1..]))
        } else {
            (coord, None)
        };

        let parts: Vec<&str> = coord_part.split(':').collect();

        match parts.len() {
            3 => Ok(Self {
                group_id: parts[0].to_string(),
                artifact_id: parts[1].to_string(),
                version: parts[2].to_string(),
                classifier: None,
                packaging: packaging_override.unwrap_or("jar").to_string(),
            }),
            4 => Ok(Self {
                group_id: parts[0].to_string(),
                artifact_id: parts[1].to_string(),
                version: parts[2].to_string(),
                classifier: Some(parts[3].to_string()).filter(|c| !c.is_empty()),
                packaging: packaging_override.unwrap_or("jar").to_string(),
            }),
            _ => Err(LauncherError::InvalidMavenCoordinate(coord.to_string())),
        }
    }

    /// Parse a repository-relative path back into a coordinate.
    ///
    /// The last three segments are `{artifactId}/{version}/{file}`; any
    /// segments before them joined by `.` form the group id. The classifier
    /// is whatever remains of the filename after the `artifactId-version`
    /// prefix (or just `version` for snapshots) and the extension.
    pub fn from_path(path: &str) -> LauncherResult<Self> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        if segments.len() < 4 {
            return Err(LauncherError::InvalidLibraryPath(path.to_string()));
        }

        let file = segments[segments.len() - 1];
        let version = segments[segments.len() - 2].to_string();
        let artifact_id = segments[segments.len() - 3].to_string();
        let group_id = segments[..segments.len() - 3].join(".");

        let (stem, packaging) = file
            .rsplit_once('.')
            .ok_or_else(|| LauncherError::InvalidLibraryPath(path.to_string()))?;

        // Snapshot filenames begin with the version; release filenames with
        // `artifactId-version`.
        let prefix = if version.ends_with("-SNAPSHOT") {
            version.clone()
        } else {
            format!("{artifact_id}-{version}")
        };
        let classifier = stem.strip_prefix(prefix.as_str()).unwrap_or("");
        let classifier = classifier.strip_prefix('-').unwrap_or(classifier);

        Ok(Self {
            group_id,
            artifact_id,
            version,
            classifier: Some(classifier.to_string()).filter(|c| !c.is_empty()),
            packaging: packaging.to_string(),
        })
    }

    /// True when the version denotes a Maven snapshot.
    pub fn is_snapshot(&self) -> bool {
        self.version.ends_with("-SNAPSHOT")
    }

    /// Canonical coordinate string, `@packaging` omitted for plain jars.
    pub fn name(&self) -> String {
        self.to_string()
    }

    /// Return a copy with the classifier replaced (used for native jars).
    pub fn with_classifier(&self, classifier: &str) -> Self {
        let mut clone = self.clone();
        clone.classifier = Some(classifier.to_string()).filter(|c| !c.is_empty());
        clone
    }

    /// Construct the group path portion (`net/sf/jopt-simple`).
    pub fn group_path(&self) -> String {
        self.group_id.replace('.', "/")
    }

    /// Build the artifact filename: `artifactId-version[-classifier].packaging`.
    pub fn filename(&self) -> String {
        match &self.classifier {
            Some(c) => format!(
                "{}-{}-{}.{}",
                self.artifact_id, self.version, c, self.packaging
            ),
            None => format!("{}-{}.{}", self.artifact_id, self.version, self.packaging),
        }
    }

    /// Repository-relative path:
    /// `<group_path>/<artifact_id>/<version>/<filename>`.
    pub fn path(&self) -> String {
        format!(
            "{}/{}/{}/{}",
            self.group_path(),
            self.artifact_id,
            self.version,
            self.filename()
        )
    }

    /// Construct the full URL for this artifact under the given repository.
    pub fn url(&self, repo_base: &str) -> String {
        format!("{}/{}", repo_base.trim_end_matches('/'), self.path())
    }
}

impl fmt::Display for MavenArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.group_id, self.artifact_id, self.version)?;
        if let Some(c) = &self.classifier {
            write!(f, ":{c}")?;
        }
        if self.packaging != "jar" {
            write!(f, "@{}", self.packaging)?;
        }
        Ok(())
    }
}
