// ─── Version Resolver ───
// Walks the `inheritsFrom` chain, normalizes each manifest, and merges the
// chain into a single self-consistent runtime description.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{LauncherError, LauncherResult};
use crate::folder::MinecraftFolder;
use crate::maven::{MavenArtifact, FORGE_MAVEN, MOJANG_LIBRARIES};
use crate::platform::Platform;
use crate::rules::{evaluate_rules, rules_reference_features, OsConstraint, Rule, RuleAction};
use crate::version::manifest::{
    Argument, ArgumentValue, AssetIndexInfo, DownloadInfo, JavaVersionInfo, LibraryEntry,
    LoggingInfo, VersionJson,
};

/// A resolved download descriptor. `size == -1` means unknown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Artifact {
    pub path: String,
    pub url: String,
    pub sha1: String,
    pub size: i64,
}

impl From<&DownloadInfo> for Artifact {
    fn from(info: &DownloadInfo) -> Self {
        Artifact {
            path: String::new(),
            url: info.url.clone(),
            sha1: info.sha1.clone(),
            size: info.size,
        }
    }
}

/// A library after platform filtering and artifact selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedLibrary {
    /// Parsed coordinate; for natives the classifier is the
    /// platform-specific one.
    pub info: MavenArtifact,
    pub download: Artifact,
    pub is_native: bool,
    #[serde(default)]
    pub checksums: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverreq: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clientreq: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract_exclude: Option<Vec<String>>,
}

impl ResolvedLibrary {
    /// Canonical `group:artifact:version[:classifier][@type]` name.
    pub fn name(&self) -> String {
        self.info.name()
    }

    /// Merge key. Natives and non-natives occupy disjoint keyspaces so a
    /// native entry can never shadow the plain artifact of the same
    /// coordinate (the trailing `;` keeps the spaces apart).
    fn merge_key(&self) -> String {
        if self.is_native {
            format!(
                "{}:{}-{};",
                self.info.group_id,
                self.info.artifact_id,
                self.info.classifier.as_deref().unwrap_or("")
            )
        } else {
            format!("{}:{}", self.info.group_id, self.info.artifact_id)
        }
    }
}

/// Argument lists after resolution. JVM entries are already filtered to
/// the target platform; game entries keep their feature-conditional
/// elements for launch-time evaluation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ResolvedArguments {
    pub game: Vec<Argument>,
    pub jvm: Vec<Argument>,
}

/// The canonical output of version resolution, consumed by the launch
/// synthesizer and the diagnoser.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolvedVersion {
    /// Id of the requested (child) version.
    pub id: String,
    /// Effective vanilla version used for jar lookup.
    pub minecraft_version: String,
    /// Version ids from child to root.
    pub inheritances: Vec<String>,
    /// Version roots in the same order as `inheritances`.
    pub path_chain: Vec<PathBuf>,
    pub assets: String,
    pub asset_index: Option<AssetIndexInfo>,
    pub java_version: JavaVersionInfo,
    pub main_class: String,
    pub version_type: String,
    pub release_time: String,
    pub time: String,
    pub logging: Option<LoggingInfo>,
    pub minimum_launcher_version: i32,
    pub minecraft_directory: PathBuf,
    pub arguments: ResolvedArguments,
    /// Non-natives first, then natives; deduped by coordinate with child
    /// versions overriding parents.
    pub libraries: Vec<ResolvedLibrary>,
    /// Role (`client`, `server`, ...) to artifact.
    pub downloads: HashMap<String, Artifact>,
}

impl ResolvedVersion {
    /// Libraries that belong on the classpath.
    pub fn classpath_libraries(&self) -> impl Iterator<Item = &ResolvedLibrary> {
        self.libraries.iter().filter(|lib| !lib.is_native)
    }

    /// Platform-specific native libraries.
    pub fn native_libraries(&self) -> impl Iterator<Item = &ResolvedLibrary> {
        self.libraries.iter().filter(|lib| lib.is_native)
    }
}

/// Resolve `version_id` under `folder` for `platform`.
///
/// Reads the manifest chain, fails on missing/corrupted/cyclic manifests,
/// and merges child-over-parent per the launcher wire conventions.
pub async fn resolve_version(
    folder: &MinecraftFolder,
    version_id: &str,
    platform: &Platform,
) -> LauncherResult<ResolvedVersion> {
    // Stage 1: dependency walk, child first.
    let mut chain: Vec<VersionJson> = Vec::new();
    let mut ids: Vec<String> = Vec::new();
    let mut current = version_id.to_string();

    loop {
        if ids.contains(&current) {
            let mut detected = ids.clone();
            detected.push(current);
            return Err(LauncherError::CircularDependencies { chain: detected });
        }

        let path = folder.version_json(&current);
        let raw = match tokio::fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(LauncherError::MissingVersionJson {
                    version: current,
                    path,
                });
            }
            Err(e) => return Err(LauncherError::io(path, e)),
        };
        let manifest: VersionJson =
            serde_json::from_str(&raw).map_err(|source| LauncherError::CorruptedVersionJson {
                version: current.clone(),
                raw,
                source,
            })?;

        ids.push(current);
        let next = manifest.inherits_from.clone();
        chain.push(manifest);
        match next {
            Some(parent) => current = parent,
            None => break,
        }
    }
    debug!("Resolved inheritance chain: {}", ids.join(" -> "));

    // Stage 2: normalize each manifest.
    let normalized: Vec<Normalized> = chain
        .iter()
        .map(|manifest| normalize_manifest(manifest, platform))
        .collect::<LauncherResult<_>>()?;

    // Stage 3: merge from root toward child.
    let mut main_class = String::new();
    let mut assets = String::new();
    let mut version_type = String::new();
    let mut release_time = String::new();
    let mut time = String::new();
    let mut asset_index: Option<AssetIndexInfo> = None;
    let mut logging: Option<LoggingInfo> = None;
    let mut java_version: Option<JavaVersionInfo> = None;
    let mut minimum_launcher_version = 0;
    let mut downloads: HashMap<String, Artifact> = HashMap::new();
    let mut game_args: Vec<Argument> = Vec::new();
    let mut jvm_args: Vec<Argument> = Vec::new();
    let mut legacy_source: Option<String> = None;
    let mut libraries = MergeMap::default();
    let mut natives = MergeMap::default();

    for norm in normalized.iter().rev() {
        let manifest = norm.manifest;

        if let Some(mc) = &manifest.main_class {
            if !mc.is_empty() {
                main_class = mc.clone();
            }
        }
        if let Some(a) = &manifest.assets {
            if !a.is_empty() {
                assets = a.clone();
            }
        }
        if let Some(t) = &manifest.version_type {
            if !t.is_empty() {
                version_type = t.clone();
            }
        }
        if let Some(rt) = &manifest.release_time {
            if !rt.is_empty() {
                release_time = rt.clone();
            }
        }
        if let Some(t) = &manifest.time {
            if !t.is_empty() {
                time = t.clone();
            }
        }
        if let Some(ai) = &manifest.asset_index {
            asset_index = Some(ai.clone());
        }
        if let Some(l) = &manifest.logging {
            logging = Some(l.clone());
        }
        if let Some(jv) = &manifest.java_version {
            java_version = Some(jv.clone());
        }
        minimum_launcher_version =
            minimum_launcher_version.max(manifest.minimum_launcher_version.unwrap_or(0));

        if norm.replace {
            game_args = norm.game.clone();
            jvm_args = norm.jvm.clone();
            legacy_source = Some(manifest.id.clone());
        } else {
            if let Some(legacy_id) = &legacy_source {
                return Err(LauncherError::FormatMismatch {
                    version: manifest.id.clone(),
                    inherits: legacy_id.clone(),
                });
            }
            game_args.extend(norm.game.iter().cloned());
            jvm_args.extend(norm.jvm.iter().cloned());
        }

        for lib in &norm.libraries {
            if lib.is_native {
                natives.insert(lib.merge_key(), lib.clone());
            } else {
                libraries.insert(lib.merge_key(), lib.clone());
            }
        }

        if let Some(dl) = &manifest.downloads {
            for (role, info) in dl {
                downloads.insert(role.clone(), Artifact::from(info));
            }
        }
    }

    if main_class.is_empty() {
        return Err(LauncherError::BadVersionJson {
            version: version_id.to_string(),
            missing: "mainClass".to_string(),
        });
    }

    // Effective vanilla version: nearest clientVersion/_minecraftVersion,
    // else the root manifest id.
    let minecraft_version = chain
        .iter()
        .find_map(|m| m.client_version.clone().or_else(|| m.minecraft_version.clone()))
        .unwrap_or_else(|| chain[chain.len() - 1].id.clone());

    let mut merged = libraries.into_values();
    merged.extend(natives.into_values());

    Ok(ResolvedVersion {
        id: ids[0].clone(),
        minecraft_version,
        path_chain: ids.iter().map(|id| folder.version_root(id)).collect(),
        inheritances: ids,
        assets,
        asset_index,
        java_version: java_version.unwrap_or_default(),
        main_class,
        version_type,
        release_time,
        time,
        logging,
        minimum_launcher_version,
        minecraft_directory: folder.root.clone(),
        arguments: ResolvedArguments {
            game: game_args,
            jvm: jvm_args,
        },
        libraries: merged,
        downloads,
    })
}

/// A manifest after stage-2 normalization.
struct Normalized<'a> {
    manifest: &'a VersionJson,
    libraries: Vec<ResolvedLibrary>,
    game: Vec<Argument>,
    jvm: Vec<Argument>,
    /// Legacy manifests replace inherited argument lists instead of
    /// appending to them.
    replace: bool,
}

fn normalize_manifest<'a>(
    manifest: &'a VersionJson,
    platform: &Platform,
) -> LauncherResult<Normalized<'a>> {
    let mut libraries = Vec::new();
    for entry in &manifest.libraries {
        match resolve_library(entry, platform, &manifest.id)? {
            Some(lib) => libraries.push(lib),
            None => debug!("Dropping library {} for {}", entry.name, platform.name),
        }
    }

    let (game, jvm, replace) = match &manifest.arguments {
        Some(args) => (args.game.clone(), args.jvm.clone(), false),
        None => {
            let game = manifest
                .minecraft_arguments
                .as_deref()
                .unwrap_or("")
                .split(' ')
                .filter(|s| !s.is_empty())
                .map(|s| Argument::Plain(s.to_string()))
                .collect();
            (game, default_legacy_jvm_arguments(), true)
        }
    };

    // Feature-conditional JVM entries are dropped here (features are only
    // known at launch); OS-conditional entries must pass for this platform.
    let jvm = jvm
        .into_iter()
        .filter(|arg| match arg {
            Argument::Plain(_) => true,
            Argument::Conditional { rules, .. } => {
                !rules_reference_features(rules)
                    && evaluate_rules(rules, platform, &HashSet::new())
            }
        })
        .collect();

    Ok(Normalized {
        manifest,
        libraries,
        game,
        jvm,
        replace,
    })
}

/// The fixed JVM argument template applied to legacy manifests, matching
/// what vanilla 1.13+ manifests declare.
fn default_legacy_jvm_arguments() -> Vec<Argument> {
    let windows_rule = |version: Option<&str>| Rule {
        action: RuleAction::Allow,
        os: Some(OsConstraint {
            name: Some("windows".to_string()),
            version: version.map(str::to_string),
            arch: None,
        }),
        features: None,
    };

    vec![
        Argument::Conditional {
            rules: vec![windows_rule(None)],
            value: ArgumentValue::Single(
                "-XX:HeapDumpPath=MojangTricksIntelDriversForPerformance_javaw.exe_minecraft.exe.heapdump"
                    .to_string(),
            ),
        },
        Argument::Conditional {
            rules: vec![windows_rule(Some(r"^10\."))],
            value: ArgumentValue::Multiple(vec![
                "-Dos.name=Windows 10".to_string(),
                "-Dos.version=10.0".to_string(),
            ]),
        },
        Argument::Plain("-Djava.library.path=${natives_directory}".to_string()),
        Argument::Plain("-Dminecraft.launcher.brand=${launcher_name}".to_string()),
        Argument::Plain("-Dminecraft.launcher.version=${launcher_version}".to_string()),
        Argument::Plain("-cp".to_string()),
        Argument::Plain("${classpath}".to_string()),
    ]
}

/// Resolve one raw library entry to its platform-appropriate artifact, or
/// `None` when rules or missing natives exclude it.
fn resolve_library(
    entry: &LibraryEntry,
    platform: &Platform,
    version_id: &str,
) -> LauncherResult<Option<ResolvedLibrary>> {
    if let Some(rules) = &entry.rules {
        if !evaluate_rules(rules, platform, &HashSet::new()) {
            return Ok(None);
        }
    }

    let info = MavenArtifact::parse(&entry.name)?;
    let extract_exclude = entry.extract.as_ref().map(|e| e.exclude.clone());

    if let Some(natives) = &entry.natives {
        let Some(template) = natives.get(platform.name.as_str()) else {
            return Ok(None);
        };
        let classifier = template.replace("${arch}", platform.arch_bits());
        let info = info.with_classifier(&classifier);

        let download = entry
            .downloads
            .as_ref()
            .and_then(|d| d.classifiers.as_ref())
            .and_then(|c| c.get(&classifier))
            .map(|a| Artifact {
                path: a.path.clone(),
                url: a.url.clone(),
                sha1: a.sha1.clone(),
                size: a.size,
            })
            .unwrap_or_else(|| {
                let path = info.path();
                Artifact {
                    url: format!("{MOJANG_LIBRARIES}/{path}"),
                    path,
                    sha1: String::new(),
                    size: -1,
                }
            });

        return Ok(Some(ResolvedLibrary {
            info,
            download,
            is_native: true,
            checksums: Vec::new(),
            serverreq: None,
            clientreq: None,
            extract_exclude,
        }));
    }

    if let Some(downloads) = &entry.downloads {
        let Some(artifact) = &downloads.artifact else {
            return Err(LauncherError::LibraryCorruption {
                version: version_id.to_string(),
                library: entry.name.clone(),
            });
        };

        let url = if artifact.url.is_empty() {
            if info.group_id == "net.minecraftforge" {
                format!("{FORGE_MAVEN}/{}", artifact.path)
            } else {
                format!("{MOJANG_LIBRARIES}/{}", artifact.path)
            }
        } else {
            artifact.url.clone()
        };
        let is_native = info
            .classifier
            .as_deref()
            .is_some_and(|c| c.starts_with("natives"));

        return Ok(Some(ResolvedLibrary {
            download: Artifact {
                path: artifact.path.clone(),
                url,
                sha1: artifact.sha1.clone(),
                size: artifact.size,
            },
            info,
            is_native,
            checksums: Vec::new(),
            serverreq: None,
            clientreq: None,
            extract_exclude,
        }));
    }

    // Legacy `url`/`checksums` form.
    let path = info.path();
    let base = entry
        .url
        .clone()
        .unwrap_or_else(|| format!("{MOJANG_LIBRARIES}/"));
    Ok(Some(ResolvedLibrary {
        download: Artifact {
            url: format!("{base}{path}"),
            path,
            sha1: entry
                .checksums
                .as_ref()
                .and_then(|c| c.first().cloned())
                .unwrap_or_default(),
            size: -1,
        },
        info,
        is_native: false,
        checksums: entry.checksums.clone().unwrap_or_default(),
        serverreq: entry.serverreq,
        clientreq: entry.clientreq,
        extract_exclude,
    }))
}

/// Insertion-ordered map with overwrite-in-place semantics, so a child
/// redefinition keeps the parent's position in the final list.
#[derive(Default)]
struct MergeMap {
    order: Vec<ResolvedLibrary>,
    index: HashMap<String, usize>,
}

impl MergeMap {
    fn insert(&mut self, key: String, lib: ResolvedLibrary) {
        match self.index.get(&key) {
            Some(&i) => self.order[i] = lib,
            None => {
                self.index.insert(key, self.order.len());
                self.order.push(lib);
            }
        }
    }

    fn into_values(self) -> Vec<ResolvedLibrary> {
        self.order
    }
}
