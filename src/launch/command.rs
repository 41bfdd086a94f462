// ─── Launch Command Synthesis ───
// Composes the argument vector used to spawn the Java process. Spawning
// itself is the caller's responsibility.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use tracing::debug;

use crate::assets::AssetIndex;
use crate::error::{LauncherError, LauncherResult};
use crate::folder::{JarKind, MinecraftFolder};
use crate::launch::options::{LaunchOptions, LaunchVersion, ServerLaunchOptions};
use crate::launch::DEFAULT_EXTRA_JVM_ARGS;
use crate::platform::{OsFamily, Platform};
use crate::rules::evaluate_rules;
use crate::version::{resolve_version, Argument, ResolvedVersion};

/// Compose the full client argument vector: JVM flags, main class, game
/// arguments. Deterministic apart from the generated auth fields.
pub async fn generate_arguments(options: &LaunchOptions) -> LauncherResult<Vec<String>> {
    let platform = options
        .platform
        .clone()
        .unwrap_or_else(Platform::current);

    let game_path = std::path::absolute(&options.game_path)
        .map_err(|e| LauncherError::io(&options.game_path, e))?;
    let resource_path = match &options.resource_path {
        Some(p) => std::path::absolute(p).map_err(|e| LauncherError::io(p, e))?,
        None => game_path.clone(),
    };
    let folder = MinecraftFolder::new(&resource_path);

    let resolved: ResolvedVersion = match &options.version {
        LaunchVersion::Id(id) => resolve_version(&folder, id, &platform).await?,
        LaunchVersion::Resolved(v) => (**v).clone(),
    };

    // Defaults for auth and branding.
    let profile_id = options
        .game_profile
        .as_ref()
        .map(|p| p.id.clone())
        .unwrap_or_else(random_hex);
    let profile_name = options
        .game_profile
        .as_ref()
        .map(|p| p.name.clone())
        .unwrap_or_else(|| "Steve".to_string());
    let access_token = options
        .access_token
        .clone()
        .unwrap_or_else(random_hex);
    let user_type = options.user_type.as_deref().unwrap_or("Mojang");
    let launcher_name = options.launcher_name.as_deref().unwrap_or("Launcher");
    let launcher_version = options.launcher_brand.as_deref().unwrap_or("0.0.1");
    let game_name = options.game_name.as_deref().unwrap_or("Minecraft");
    let natives_dir = options
        .native_root
        .clone()
        .unwrap_or_else(|| folder.natives_root(&resolved.id));

    let features = enabled_features(options);
    let separator = if cfg!(windows) { ";" } else { ":" };

    let mut args: Vec<String> = Vec::new();
    args.push(options.java_path.to_string_lossy().to_string());

    // macOS dock branding.
    if platform.name == OsFamily::Osx {
        args.push(format!("-Xdock:name={game_name}"));
        let icon = match &options.game_icon {
            Some(icon) => icon.clone(),
            None => lookup_game_icon(&folder, &resolved).await,
        };
        if !icon.as_os_str().is_empty() {
            args.push(format!("-Xdock:icon={}", icon.to_string_lossy()));
        }
    }

    if let Some(min) = options.min_memory {
        args.push(format!("-Xms{min}M"));
    }
    if let Some(max) = options.max_memory {
        args.push(format!("-Xmx{max}M"));
    }

    if options.ignore_invalid_minecraft_certificates {
        args.push("-Dfml.ignoreInvalidMinecraftCertificates=true".to_string());
    }
    if options.ignore_patch_discrepancies {
        args.push("-Dfml.ignorePatchDiscrepancies=true".to_string());
    }

    if let Some(agent) = &options.yggdrasil_agent {
        args.push(format!(
            "-javaagent:{}={}",
            agent.jar.to_string_lossy(),
            agent.server
        ));
        args.push("-Dauthlibinjector.side=client".to_string());
        if let Some(prefetched) = &agent.prefetched {
            args.push(format!(
                "-Dauthlibinjector.yggdrasil.prefetched={prefetched}"
            ));
        }
    }

    // Classpath: non-native libraries, the client jar, then extras.
    let mut classpath_entries: Vec<String> = resolved
        .classpath_libraries()
        .map(|lib| folder.library(&lib.download.path).to_string_lossy().to_string())
        .collect();
    classpath_entries.push(
        folder
            .version_jar(&resolved.minecraft_version, JarKind::Client)
            .to_string_lossy()
            .to_string(),
    );
    classpath_entries.extend(options.extra_class_paths.iter().cloned());
    let classpath = classpath_entries.join(separator);

    let mut jvm_map: HashMap<String, String> = HashMap::from([
        (
            "natives_directory".to_string(),
            natives_dir.to_string_lossy().to_string(),
        ),
        ("launcher_name".to_string(), launcher_name.to_string()),
        ("launcher_version".to_string(), launcher_version.to_string()),
        ("classpath".to_string(), classpath),
        (
            "library_directory".to_string(),
            folder.libraries().to_string_lossy().to_string(),
        ),
        ("classpath_separator".to_string(), separator.to_string()),
        (
            "version_name".to_string(),
            options
                .version_name
                .clone()
                .unwrap_or_else(|| resolved.id.clone()),
        ),
    ]);
    apply_feature_overrides(&mut jvm_map, options);

    let mut jvm_args = normalize_arguments(&resolved.arguments.jvm, &platform, &features);

    // Log4j configuration, only when the config file is already on disk.
    if let Some(client) = resolved.logging.as_ref().and_then(|l| l.client.as_ref()) {
        let config = folder.log_config(&client.file.id);
        if config.exists() {
            jvm_args.push(
                client
                    .argument
                    .replace("${path}", &config.to_string_lossy()),
            );
        }
    }

    args.extend(jvm_args.iter().map(|arg| interpolate(arg, &jvm_map)));

    match &options.extra_jvm_args {
        Some(extra) => args.extend(extra.iter().cloned()),
        None => args.extend(
            DEFAULT_EXTRA_JVM_ARGS
                .iter()
                .filter(|arg| !(options.max_memory.is_some() && **arg == "-Xmx2G"))
                .map(|s| s.to_string()),
        ),
    }

    args.push(resolved.main_class.clone());

    let mut game_map: HashMap<String, String> = HashMap::from([
        (
            "version_name".to_string(),
            options
                .version_name
                .clone()
                .unwrap_or_else(|| resolved.id.clone()),
        ),
        (
            "version_type".to_string(),
            options
                .version_type
                .clone()
                .unwrap_or_else(|| resolved.version_type.clone()),
        ),
        (
            "assets_root".to_string(),
            folder.assets().to_string_lossy().to_string(),
        ),
        (
            "game_assets".to_string(),
            folder
                .assets()
                .join("virtual")
                .join(&resolved.assets)
                .to_string_lossy()
                .to_string(),
        ),
        ("assets_index_name".to_string(), resolved.assets.clone()),
        (
            "game_directory".to_string(),
            game_path.to_string_lossy().to_string(),
        ),
        ("auth_player_name".to_string(), profile_name),
        ("auth_uuid".to_string(), profile_id),
        ("auth_access_token".to_string(), access_token),
        (
            "user_properties".to_string(),
            serde_json::to_string(&options.properties)?,
        ),
        ("user_type".to_string(), user_type.to_string()),
        (
            "resolution_width".to_string(),
            options
                .resolution
                .as_ref()
                .and_then(|r| r.width)
                .map_or_else(|| "-1".to_string(), |w| w.to_string()),
        ),
        (
            "resolution_height".to_string(),
            options
                .resolution
                .as_ref()
                .and_then(|r| r.height)
                .map_or_else(|| "-1".to_string(), |h| h.to_string()),
        ),
    ]);
    apply_feature_overrides(&mut game_map, options);

    let game_args = normalize_arguments(&resolved.arguments.game, &platform, &features);
    args.extend(game_args.iter().map(|arg| interpolate(arg, &game_map)));
    args.extend(options.extra_mc_args.iter().cloned());

    if let Some(server) = &options.server {
        args.push("--server".to_string());
        args.push(server.ip.clone());
        if let Some(port) = server.port {
            args.push("--port".to_string());
            args.push(port.to_string());
        }
    }

    if let Some(resolution) = &options.resolution {
        if !args.iter().any(|a| a == "--width") {
            if resolution.fullscreen {
                args.push("--fullscreen".to_string());
            } else {
                if let Some(height) = resolution.height {
                    args.push("--height".to_string());
                    args.push(height.to_string());
                }
                if let Some(width) = resolution.width {
                    args.push("--width".to_string());
                    args.push(width.to_string());
                }
            }
        }
    }

    Ok(args)
}

/// Compose a dedicated server command line:
/// `java [-Xms..] [-Xmx..] <extra> -jar <server.jar> <extra> [nogui]`.
pub async fn generate_server_arguments(
    options: &ServerLaunchOptions,
) -> LauncherResult<Vec<String>> {
    let platform = options
        .platform
        .clone()
        .unwrap_or_else(Platform::current);
    let folder = MinecraftFolder::new(&options.resource_path);

    let server_jar = match (&options.server_jar, &options.version) {
        (Some(jar), _) => jar.clone(),
        (None, Some(LaunchVersion::Resolved(v))) => {
            folder.version_jar(&v.minecraft_version, JarKind::Server)
        }
        (None, Some(LaunchVersion::Id(id))) => {
            let resolved = resolve_version(&folder, id, &platform).await?;
            folder.version_jar(&resolved.minecraft_version, JarKind::Server)
        }
        (None, None) => {
            return Err(LauncherError::InvalidOptions {
                reason: "either a version or an explicit server jar is required".to_string(),
            });
        }
    };

    let mut args: Vec<String> = Vec::new();
    args.push(options.java_path.to_string_lossy().to_string());
    if let Some(min) = options.min_memory {
        args.push(format!("-Xms{min}M"));
    }
    if let Some(max) = options.max_memory {
        args.push(format!("-Xmx{max}M"));
    }
    args.extend(options.extra_jvm_args.iter().cloned());
    args.push("-jar".to_string());
    args.push(server_jar.to_string_lossy().to_string());
    args.extend(options.extra_mc_args.iter().cloned());
    if options.nogui {
        args.push("nogui".to_string());
    }

    Ok(args)
}

/// Flatten an argument list for the given platform and feature set.
fn normalize_arguments(
    args: &[Argument],
    platform: &Platform,
    features: &HashSet<String>,
) -> Vec<String> {
    let mut out = Vec::new();
    for arg in args {
        match arg {
            Argument::Plain(s) => out.push(s.clone()),
            Argument::Conditional { rules, value } => {
                if evaluate_rules(rules, platform, features) {
                    out.extend(value.as_slice().iter().cloned());
                }
            }
        }
    }
    out
}

/// Substitute every `${ident}` in a single pass. Unknown identifiers are
/// left verbatim; nested placeholders are not supported.
fn interpolate(input: &str, map: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    while let Some(start) = rest.find("${") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find('}') {
            Some(end) => {
                let key = &after[..end];
                match map.get(key) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push_str("${");
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[end + 1..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

/// The set of feature names active for rule evaluation: `is_demo_user`,
/// `has_custom_resolution`, plus every truthy caller feature.
fn enabled_features(options: &LaunchOptions) -> HashSet<String> {
    let mut flags: HashMap<&str, bool> = HashMap::from([
        ("is_demo_user", options.is_demo),
        ("has_custom_resolution", options.resolution.is_some()),
    ]);
    for (name, value) in &options.features {
        flags.insert(name, is_truthy(value));
    }
    flags
        .into_iter()
        .filter(|(_, enabled)| *enabled)
        .map(|(name, _)| name.to_string())
        .collect()
}

/// Object-valued features contribute placeholder overrides.
fn apply_feature_overrides(map: &mut HashMap<String, String>, options: &LaunchOptions) {
    for value in options.features.values() {
        if let serde_json::Value::Object(overrides) = value {
            for (key, value) in overrides {
                let rendered = match value {
                    serde_json::Value::String(s) => s.clone(),
                    other => other.to_string(),
                };
                map.insert(key.clone(), rendered);
            }
        }
    }
}

fn is_truthy(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => false,
        serde_json::Value::Bool(b) => *b,
        serde_json::Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        serde_json::Value::String(s) => !s.is_empty(),
        serde_json::Value::Array(_) | serde_json::Value::Object(_) => true,
    }
}

/// A fresh 128-bit random value as lowercase no-dash hex.
fn random_hex() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}

/// Find the dock icon in the assets index, if the index is readable and
/// carries one.
async fn lookup_game_icon(folder: &MinecraftFolder, resolved: &ResolvedVersion) -> PathBuf {
    let index_path = folder.assets_index(&resolved.assets);
    let index = match AssetIndex::read(&index_path).await {
        Ok(index) => index,
        Err(e) => {
            debug!("No readable assets index for dock icon: {e}");
            return PathBuf::new();
        }
    };
    for key in ["icons/minecraft.icns", "minecraft/icons/minecraft.icns"] {
        if let Some(object) = index.objects.get(key) {
            return folder.asset(&object.hash);
        }
    }
    PathBuf::new()
}
