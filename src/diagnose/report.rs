// ─── Diagnose Report ───

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    Missing,
    Corrupted,
}

/// What the issue is about, with the role-specific payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum IssueRole {
    VersionJson { version: String },
    MinecraftJar { version: String },
    AssetIndex { version: String },
    Asset { name: String, hash: String, size: i64 },
    Library { name: String },
}

/// A single problem found in the installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    #[serde(rename = "type")]
    pub kind: IssueKind,
    #[serde(flatten)]
    pub role: IssueRole,
    pub file: PathBuf,
    pub expected_checksum: String,
    pub received_checksum: String,
    pub hint: String,
}

impl Issue {
    pub fn missing(role: IssueRole, file: PathBuf, expected: &str, hint: &str) -> Self {
        Issue {
            kind: IssueKind::Missing,
            role,
            file,
            expected_checksum: expected.to_string(),
            received_checksum: String::new(),
            hint: hint.to_string(),
        }
    }

    pub fn corrupted(
        role: IssueRole,
        file: PathBuf,
        expected: &str,
        received: &str,
        hint: &str,
    ) -> Self {
        Issue {
            kind: IssueKind::Corrupted,
            role,
            file,
            expected_checksum: expected.to_string(),
            received_checksum: received.to_string(),
            hint: hint.to_string(),
        }
    }
}

/// Outcome of diagnosing one version installation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DiagnoseReport {
    pub minecraft_location: PathBuf,
    pub version: String,
    pub issues: Vec<Issue>,
}

impl DiagnoseReport {
    /// True when nothing is missing or corrupted.
    pub fn is_healthy(&self) -> bool {
        self.issues.is_empty()
    }
}
