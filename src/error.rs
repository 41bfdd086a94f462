use std::path::PathBuf;
use thiserror::Error;

/// Central error type for the launcher core.
/// Every fallible operation returns `Result<T, LauncherError>`.
#[derive(Debug, Error)]
pub enum LauncherError {
    // ── IO ──────────────────────────────────────────────
    #[error("IO error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    // ── Version resolution ──────────────────────────────
    #[error("Version JSON not found for {version} at {path:?}")]
    MissingVersionJson { version: String, path: PathBuf },

    #[error("Version JSON for {version} is not valid JSON: {source}")]
    CorruptedVersionJson {
        version: String,
        /// Raw file contents, kept for inspection by callers.
        raw: String,
        source: serde_json::Error,
    },

    #[error("Circular version inheritance: {}", chain.join(" -> "))]
    CircularDependencies { chain: Vec<String> },

    #[error("Version JSON for {version} is missing required field `{missing}`")]
    BadVersionJson { version: String, missing: String },

    #[error("Library `{library}` in version {version} has no artifact to resolve")]
    LibraryCorruption { version: String, library: String },

    #[error("Version {version} mixes legacy and modern argument formats with {inherits}")]
    FormatMismatch { version: String, inherits: String },

    // ── Maven ───────────────────────────────────────────
    #[error("Invalid Maven coordinate: {0}")]
    InvalidMavenCoordinate(String),

    #[error("Invalid library path: {0}")]
    InvalidLibraryPath(String),

    // ── Launch ──────────────────────────────────────────
    #[error("Invalid launch options: {reason}")]
    InvalidOptions { reason: String },

    // ── JSON ────────────────────────────────────────────
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias used throughout the crate.
pub type LauncherResult<T> = Result<T, LauncherError>;

impl LauncherError {
    /// Attach a path to a raw IO error.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        LauncherError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<std::io::Error> for LauncherError {
    fn from(source: std::io::Error) -> Self {
        LauncherError::Io {
            path: PathBuf::new(),
            source,
        }
    }
}
