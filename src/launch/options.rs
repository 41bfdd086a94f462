// ─── Launch Options ───
// Runtime options the caller supplies when composing a launch command.

use std::collections::HashMap;
use std::path::PathBuf;

use crate::platform::Platform;
use crate::version::ResolvedVersion;

/// The version to launch: an id to resolve against the resource path, or an
/// already-resolved version.
#[derive(Debug, Clone)]
pub enum LaunchVersion {
    Id(String),
    Resolved(Box<ResolvedVersion>),
}

impl From<&str> for LaunchVersion {
    fn from(id: &str) -> Self {
        LaunchVersion::Id(id.to_string())
    }
}

impl From<String> for LaunchVersion {
    fn from(id: String) -> Self {
        LaunchVersion::Id(id)
    }
}

impl From<ResolvedVersion> for LaunchVersion {
    fn from(version: ResolvedVersion) -> Self {
        LaunchVersion::Resolved(Box::new(version))
    }
}

#[derive(Debug, Clone)]
pub struct GameProfile {
    /// Player uuid as no-dash hex.
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct YggdrasilAgent {
    pub jar: PathBuf,
    pub server: String,
    pub prefetched: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct Resolution {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub fullscreen: bool,
}

#[derive(Debug, Clone)]
pub struct ServerOptions {
    pub ip: String,
    pub port: Option<u16>,
}

/// Options for launching the client. Only `version` and `game_path` are
/// required; everything else falls back to sensible launcher defaults.
#[derive(Debug, Clone)]
pub struct LaunchOptions {
    pub version: LaunchVersion,
    /// Working directory for the game (`--gameDir`).
    pub game_path: PathBuf,
    /// Root holding `versions/`, `libraries/`, `assets/`; defaults to
    /// `game_path`.
    pub resource_path: Option<PathBuf>,
    pub java_path: PathBuf,
    /// MiB for `-Xms`.
    pub min_memory: Option<u32>,
    /// MiB for `-Xmx`.
    pub max_memory: Option<u32>,
    pub game_profile: Option<GameProfile>,
    pub access_token: Option<String>,
    pub user_type: Option<String>,
    /// Opaque map, JSON-encoded into `${user_properties}`.
    pub properties: HashMap<String, serde_json::Value>,
    /// Feature toggles for rule evaluation. Truthy values enable the
    /// feature; object values additionally override placeholders.
    pub features: HashMap<String, serde_json::Value>,
    pub launcher_name: Option<String>,
    pub launcher_brand: Option<String>,
    pub native_root: Option<PathBuf>,
    pub game_icon: Option<PathBuf>,
    pub game_name: Option<String>,
    pub ignore_invalid_minecraft_certificates: bool,
    pub ignore_patch_discrepancies: bool,
    pub yggdrasil_agent: Option<YggdrasilAgent>,
    pub extra_class_paths: Vec<String>,
    /// Replaces the built-in G1 defaults when set.
    pub extra_jvm_args: Option<Vec<String>>,
    pub extra_mc_args: Vec<String>,
    pub resolution: Option<Resolution>,
    pub server: Option<ServerOptions>,
    /// `${version_name}` override.
    pub version_name: Option<String>,
    /// `${version_type}` override.
    pub version_type: Option<String>,
    pub is_demo: bool,
    /// Override platform detection.
    pub platform: Option<Platform>,
}

impl LaunchOptions {
    pub fn new(version: impl Into<LaunchVersion>, game_path: impl Into<PathBuf>) -> Self {
        LaunchOptions {
            version: version.into(),
            game_path: game_path.into(),
            resource_path: None,
            java_path: PathBuf::from("java"),
            min_memory: None,
            max_memory: None,
            game_profile: None,
            access_token: None,
            user_type: None,
            properties: HashMap::new(),
            features: HashMap::new(),
            launcher_name: None,
            launcher_brand: None,
            native_root: None,
            game_icon: None,
            game_name: None,
            ignore_invalid_minecraft_certificates: false,
            ignore_patch_discrepancies: false,
            yggdrasil_agent: None,
            extra_class_paths: Vec::new(),
            extra_jvm_args: None,
            extra_mc_args: Vec::new(),
            resolution: None,
            server: None,
            version_name: None,
            version_type: None,
            is_demo: false,
            platform: None,
        }
    }
}

/// Options for composing a dedicated server command line.
#[derive(Debug, Clone)]
pub struct ServerLaunchOptions {
    /// Version whose server jar to launch; ignored when `server_jar` is
    /// given explicitly.
    pub version: Option<LaunchVersion>,
    /// Root holding `versions/`.
    pub resource_path: PathBuf,
    pub server_jar: Option<PathBuf>,
    pub java_path: PathBuf,
    pub min_memory: Option<u32>,
    pub max_memory: Option<u32>,
    pub extra_jvm_args: Vec<String>,
    pub extra_mc_args: Vec<String>,
    pub nogui: bool,
    pub platform: Option<Platform>,
}

impl ServerLaunchOptions {
    pub fn new(resource_path: impl Into<PathBuf>) -> Self {
        ServerLaunchOptions {
            version: None,
            resource_path: resource_path.into(),
            server_jar: None,
            java_path: PathBuf::from("java"),
            min_memory: None,
            max_memory: None,
            extra_jvm_args: Vec::new(),
            extra_mc_args: Vec::new(),
            nogui: false,
            platform: None,
        }
    }
}
