// ─── Installation Diagnoser ───
// Verifies a resolved version against the local installation: client jar,
// asset index, asset objects, and every resolved library.

pub mod report;

pub use report::{DiagnoseReport, Issue, IssueKind, IssueRole};

use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures::stream::{self, StreamExt};
use tracing::{debug, info};

use crate::assets::AssetIndex;
use crate::checksum::sha1_file;
use crate::error::{LauncherError, LauncherResult};
use crate::folder::{JarKind, MinecraftFolder};
use crate::platform::Platform;
use crate::version::resolve_version;

/// How many file checks run concurrently.
const CHECK_CONCURRENCY: usize = 8;

/// Cooperative cancellation handle. Checks poll it between I/O steps and
/// bail out silently, yielding a partial report.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    cancelled: Arc<AtomicBool>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct DiagnoseOptions {
    /// Strict mode hashes every asset and stats libraries before hashing;
    /// non-strict (default) hashes libraries and only hashes assets whose
    /// on-disk size disagrees with the index.
    pub strict: bool,
    /// Override platform detection for resolution.
    pub platform: Option<Platform>,
    pub cancel: CancelToken,
}

/// Diagnose the installation of `version_id` under `folder`.
///
/// Resolution failures for the manifest itself become a single
/// `versionJson` issue; everything else in the report is per-file.
pub async fn diagnose(
    version_id: &str,
    folder: &MinecraftFolder,
    options: &DiagnoseOptions,
) -> LauncherResult<DiagnoseReport> {
    let platform = options
        .platform
        .clone()
        .unwrap_or_else(Platform::current);

    let resolved = match resolve_version(folder, version_id, &platform).await {
        Ok(resolved) => resolved,
        Err(LauncherError::MissingVersionJson { version, path }) => {
            return Ok(DiagnoseReport {
                minecraft_location: folder.root.clone(),
                version: version_id.to_string(),
                issues: vec![Issue::missing(
                    IssueRole::VersionJson { version },
                    path,
                    "",
                    "Install or repair the version manifest",
                )],
            });
        }
        Err(LauncherError::CorruptedVersionJson { version, .. }) => {
            let file = folder.version_json(&version);
            return Ok(DiagnoseReport {
                minecraft_location: folder.root.clone(),
                version: version_id.to_string(),
                issues: vec![Issue::corrupted(
                    IssueRole::VersionJson { version },
                    file,
                    "",
                    "",
                    "Install or repair the version manifest",
                )],
            });
        }
        Err(e) => return Err(e),
    };

    let mut issues: Vec<Issue> = Vec::new();

    // Client jar.
    let jar = folder.version_jar(&resolved.minecraft_version, JarKind::Client);
    let jar_sha1 = resolved
        .downloads
        .get("client")
        .map(|a| a.sha1.as_str())
        .unwrap_or("");
    issues.extend(
        diagnose_file(
            &jar,
            jar_sha1,
            IssueRole::MinecraftJar {
                version: resolved.minecraft_version.clone(),
            },
            "Re-download the client jar",
            &options.cancel,
        )
        .await?,
    );

    // Asset index.
    let index_path = folder.assets_index(&resolved.assets);
    let index_sha1 = resolved
        .asset_index
        .as_ref()
        .map(|ai| ai.sha1.as_str())
        .unwrap_or("");
    let index_issue = diagnose_file(
        &index_path,
        index_sha1,
        IssueRole::AssetIndex {
            version: resolved.id.clone(),
        },
        "Re-download the asset index",
        &options.cancel,
    )
    .await?;
    let index_intact = index_issue.is_none();
    issues.extend(index_issue);

    // Libraries, concurrently.
    let library_issues: Vec<LauncherResult<Option<Issue>>> =
        stream::iter(resolved.libraries.iter().map(|lib| {
            let file = folder.library(&lib.download.path);
            let role = IssueRole::Library { name: lib.name() };
            async move {
                diagnose_library(
                    &file,
                    &lib.download.sha1,
                    lib.download.size,
                    role,
                    options.strict,
                    &options.cancel,
                )
                .await
            }
        }))
        .buffer_unordered(CHECK_CONCURRENCY)
        .collect()
        .await;
    for result in library_issues {
        issues.extend(result?);
    }

    // Asset objects, only when the index can be trusted.
    if index_intact && index_path.exists() {
        match AssetIndex::read(&index_path).await {
            Ok(index) => {
                let asset_issues: Vec<LauncherResult<Option<Issue>>> =
                    stream::iter(index.objects.iter().map(|(name, object)| {
                        let file = folder.asset(&object.hash);
                        async move {
                            diagnose_asset(
                                &file,
                                name,
                                &object.hash,
                                object.size,
                                options.strict,
                                &options.cancel,
                            )
                            .await
                        }
                    }))
                    .buffer_unordered(CHECK_CONCURRENCY)
                    .collect()
                    .await;
                for result in asset_issues {
                    issues.extend(result?);
                }
            }
            Err(e) => debug!("Asset index unreadable, skipping asset checks: {e}"),
        }
    }

    info!(
        "Diagnosed {} at {:?}: {} issue(s)",
        version_id,
        folder.root,
        issues.len()
    );
    Ok(DiagnoseReport {
        minecraft_location: folder.root.clone(),
        version: version_id.to_string(),
        issues,
    })
}

/// Core file check: missing when absent, corrupted when an expected
/// checksum is declared and the digest disagrees.
async fn diagnose_file(
    file: &Path,
    expected: &str,
    role: IssueRole,
    hint: &str,
    cancel: &CancelToken,
) -> LauncherResult<Option<Issue>> {
    if cancel.is_cancelled() {
        return Ok(None);
    }
    if !file.exists() {
        return Ok(Some(Issue::missing(role, file.to_path_buf(), expected, hint)));
    }
    if expected.is_empty() {
        return Ok(None);
    }
    if cancel.is_cancelled() {
        return Ok(None);
    }
    let received = sha1_file(file).await?;
    if !received.eq_ignore_ascii_case(expected) {
        return Ok(Some(Issue::corrupted(
            role,
            file.to_path_buf(),
            expected,
            &received,
            hint,
        )));
    }
    Ok(None)
}

/// Library check. Non-strict hashes outright; strict stats first and only
/// hashes when the declared size is known and the on-disk size disagrees.
async fn diagnose_library(
    file: &Path,
    expected: &str,
    declared_size: i64,
    role: IssueRole,
    strict: bool,
    cancel: &CancelToken,
) -> LauncherResult<Option<Issue>> {
    let hint = "Re-download the library";
    if !strict {
        return diagnose_file(file, expected, role, hint, cancel).await;
    }

    if cancel.is_cancelled() {
        return Ok(None);
    }
    let metadata = match tokio::fs::metadata(file).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Some(Issue::missing(role, file.to_path_buf(), expected, hint)));
        }
        Err(e) => return Err(LauncherError::io(file, e)),
    };
    if declared_size >= 0 && metadata.len() as i64 != declared_size {
        return diagnose_file(file, expected, role, hint, cancel).await;
    }
    Ok(None)
}

/// Asset object check. Non-strict trusts matching sizes and only hashes on
/// disagreement; strict always hashes.
async fn diagnose_asset(
    file: &Path,
    name: &str,
    hash: &str,
    size: i64,
    strict: bool,
    cancel: &CancelToken,
) -> LauncherResult<Option<Issue>> {
    let hint = "Re-download the asset object";
    let role = IssueRole::Asset {
        name: name.to_string(),
        hash: hash.to_string(),
        size,
    };

    if strict {
        return diagnose_file(file, hash, role, hint, cancel).await;
    }

    if cancel.is_cancelled() {
        return Ok(None);
    }
    let metadata = match tokio::fs::metadata(file).await {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Ok(Some(Issue::missing(role, file.to_path_buf(), hash, hint)));
        }
        Err(e) => return Err(LauncherError::io(file, e)),
    };
    if metadata.len() as i64 != size {
        return diagnose_file(file, hash, role, hint, cancel).await;
    }
    Ok(None)
}
