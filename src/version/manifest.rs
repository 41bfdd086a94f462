// ─── Version Manifest ───
// Raw serde model of a Mojang version JSON, covering both the legacy
// (`minecraftArguments`) and modern (`arguments: {jvm, game}`) forms.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::rules::Rule;

/// A raw version manifest as loaded from `versions/{id}/{id}.json`.
///
/// Only the consumed subset of fields is modeled; unknown fields are
/// ignored. Partial manifests (Forge/Fabric children) leave most fields
/// unset and point at their parent via `inheritsFrom`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VersionJson {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inherits_from: Option<String>,
    #[serde(default, rename = "type", skip_serializing_if = "Option::is_none")]
    pub version_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main_class: Option<String>,
    /// Legacy space-separated game arguments (pre-1.13).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minecraft_arguments: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub arguments: Option<Arguments>,
    #[serde(default)]
    pub libraries: Vec<LibraryEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<HashMap<String, DownloadInfo>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_index: Option<AssetIndexInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logging: Option<LoggingInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub java_version: Option<JavaVersionInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub minimum_launcher_version: Option<i32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub release_time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    /// Effective vanilla version, as written by some installers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_version: Option<String>,
    #[serde(
        default,
        rename = "_minecraftVersion",
        skip_serializing_if = "Option::is_none"
    )]
    pub minecraft_version: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Arguments {
    #[serde(default)]
    pub game: Vec<Argument>,
    #[serde(default)]
    pub jvm: Vec<Argument>,
}

/// One element of an argument list: either a plain string or a
/// rule-guarded value.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Argument {
    Plain(String),
    Conditional {
        rules: Vec<Rule>,
        value: ArgumentValue,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ArgumentValue {
    Single(String),
    Multiple(Vec<String>),
}

impl ArgumentValue {
    /// The contained strings, in order.
    pub fn as_slice(&self) -> &[String] {
        match self {
            ArgumentValue::Single(s) => std::slice::from_ref(s),
            ArgumentValue::Multiple(v) => v,
        }
    }
}

/// A download descriptor from the `downloads` block (client/server jars).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DownloadInfo {
    #[serde(default)]
    pub sha1: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetIndexInfo {
    pub id: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default = "unknown_size")]
    pub total_size: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JavaVersionInfo {
    pub major_version: u32,
    #[serde(default)]
    pub component: String,
}

impl Default for JavaVersionInfo {
    fn default() -> Self {
        JavaVersionInfo {
            major_version: 8,
            component: "jre-legacy".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client: Option<LoggingClientInfo>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingClientInfo {
    pub argument: String,
    pub file: LoggingFileInfo,
    #[serde(rename = "type")]
    pub log_type: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingFileInfo {
    pub id: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default)]
    pub url: String,
}

// ─── Library Entries ───

/// A raw library entry. Three forms appear in the wild:
/// modern (`downloads.artifact`), natives (`natives` + classifiers), and
/// legacy (`url`/`checksums`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryEntry {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rules: Option<Vec<Rule>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub natives: Option<HashMap<String, String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub downloads: Option<LibraryDownloads>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extract: Option<ExtractRules>,
    /// Legacy repository base URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Legacy artifact checksums; the first entry is treated as SHA-1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub checksums: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serverreq: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub clientreq: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryDownloads {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub artifact: Option<LibraryArtifact>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub classifiers: Option<HashMap<String, LibraryArtifact>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LibraryArtifact {
    pub path: String,
    #[serde(default)]
    pub sha1: String,
    #[serde(default = "unknown_size")]
    pub size: i64,
    #[serde(default)]
    pub url: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExtractRules {
    #[serde(default)]
    pub exclude: Vec<String>,
}

fn unknown_size() -> i64 {
    -1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserialize_modern_manifest() {
        let json = r#"{
            "id": "1.20.1",
            "type": "release",
            "mainClass": "net.minecraft.client.main.Main",
            "arguments": {
                "game": [
                    "--username", "${auth_player_name}",
                    {
                        "rules": [{"action": "allow", "features": {"is_demo_user": true}}],
                        "value": "--demo"
                    }
                ],
                "jvm": [
                    {
                        "rules": [{"action": "allow", "os": {"name": "osx"}}],
                        "value": ["-XstartOnFirstThread"]
                    },
                    "-cp", "${classpath}"
                ]
            },
            "assetIndex": {"id": "5", "sha1": "abc", "size": 12, "url": "", "totalSize": 34},
            "libraries": [],
            "javaVersion": {"component": "java-runtime-gamma", "majorVersion": 17}
        }"#;
        let manifest: VersionJson = serde_json::from_str(json).unwrap();
        assert_eq!(manifest.id, "1.20.1");
        assert_eq!(
            manifest.main_class.as_deref(),
            Some("net.minecraft.client.main.Main")
        );
        let args = manifest.arguments.unwrap();
        assert_eq!(args.game.len(), 3);
        assert!(matches!(args.game[0], Argument::Plain(_)));
        match &args.game[2] {
            Argument::Conditional { rules, value } => {
                assert_eq!(rules.len(), 1);
                assert_eq!(value.as_slice(), ["--demo".to_string()]);
            }
            other => panic!("expected conditional argument, got {other:?}"),
        }
        assert_eq!(manifest.java_version.unwrap().major_version, 17);
    }

    #[test]
    fn deserialize_legacy_manifest() {
        let json = r#"{
            "id": "1.7.10",
            "minecraftArguments": "--username ${auth_player_name} --version ${version_name}",
            "mainClass": "net.minecraft.client.main.Main",
            "libraries": [
                {"name": "com.google.guava:guava:16.0", "url": "https://example.com/maven/"},
                {
                    "name": "org.lwjgl.lwjgl:lwjgl-platform:2.9.1",
                    "natives": {"linux": "natives-linux", "windows": "natives-windows-${arch}"},
                    "extract": {"exclude": ["META-INF/"]}
                }
            ]
        }"#;
        let manifest: VersionJson = serde_json::from_str(json).unwrap();
        assert!(manifest.arguments.is_none());
        assert!(manifest.minecraft_arguments.is_some());
        assert_eq!(manifest.libraries.len(), 2);
        let natives = manifest.libraries[1].natives.as_ref().unwrap();
        assert_eq!(natives["windows"], "natives-windows-${arch}");
        assert_eq!(
            manifest.libraries[1].extract.as_ref().unwrap().exclude,
            ["META-INF/"]
        );
    }

    #[test]
    fn missing_sizes_default_to_unknown() {
        let artifact: LibraryArtifact =
            serde_json::from_str(r#"{"path": "a/b/1/b-1.jar"}"#).unwrap();
        assert_eq!(artifact.size, -1);
        assert_eq!(artifact.sha1, "");
        assert_eq!(artifact.url, "");
    }
}
