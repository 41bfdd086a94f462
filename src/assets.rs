// ─── Asset Index ───
// Model of the asset index JSON under `assets/indexes/{id}.json`.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{LauncherError, LauncherResult};

/// Top-level asset index structure: file name to content-addressed object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetIndex {
    pub objects: HashMap<String, AssetObject>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssetObject {
    pub hash: String,
    pub size: i64,
}

impl AssetIndex {
    /// Read and parse an asset index file.
    pub async fn read(path: &Path) -> LauncherResult<Self> {
        let raw = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| LauncherError::io(path, e))?;
        Ok(serde_json::from_str(&raw)?)
    }
}
