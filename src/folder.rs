// ─── Minecraft Folder ───
// Canonical paths under a Minecraft root. This table is the on-disk
// contract between launcher and game; nothing else invents paths.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A Minecraft installation root (the directory holding `versions/`,
/// `libraries/`, `assets/`, `saves/`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MinecraftFolder {
    pub root: PathBuf,
}

impl MinecraftFolder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        MinecraftFolder { root: root.into() }
    }

    pub fn versions(&self) -> PathBuf {
        self.root.join("versions")
    }

    pub fn version_root(&self, version: &str) -> PathBuf {
        self.versions().join(version)
    }

    /// `{root}/versions/{v}/{v}.json`
    pub fn version_json(&self, version: &str) -> PathBuf {
        self.version_root(version).join(format!("{version}.json"))
    }

    /// Client jar is `{v}.jar`; any other kind is `{v}-{kind}.jar`
    /// (e.g. `1.20.1-server.jar`).
    pub fn version_jar(&self, version: &str, kind: JarKind) -> PathBuf {
        let file = match kind {
            JarKind::Client => format!("{version}.jar"),
            JarKind::Server => format!("{version}-server.jar"),
        };
        self.version_root(version).join(file)
    }

    pub fn natives_root(&self, version: &str) -> PathBuf {
        self.version_root(version).join(format!("{version}-natives"))
    }

    pub fn libraries(&self) -> PathBuf {
        self.root.join("libraries")
    }

    pub fn library(&self, path: impl AsRef<Path>) -> PathBuf {
        self.libraries().join(path.as_ref())
    }

    pub fn assets(&self) -> PathBuf {
        self.root.join("assets")
    }

    pub fn assets_index(&self, id: &str) -> PathBuf {
        self.assets().join("indexes").join(format!("{id}.json"))
    }

    /// Content-addressed asset object: `assets/objects/{hash[0:2]}/{hash}`.
    pub fn asset(&self, hash: &str) -> PathBuf {
        self.assets().join("objects").join(&hash[..2]).join(hash)
    }

    pub fn log_config(&self, file: &str) -> PathBuf {
        self.assets().join("log_configs").join(file)
    }

    pub fn saves(&self) -> PathBuf {
        self.root.join("saves")
    }

    pub fn map_info(&self, map: &str) -> PathBuf {
        self.saves().join(map).join("level.dat")
    }

    pub fn map_icon(&self, map: &str) -> PathBuf {
        self.saves().join(map).join("icon.png")
    }
}

impl From<PathBuf> for MinecraftFolder {
    fn from(root: PathBuf) -> Self {
        MinecraftFolder { root }
    }
}

impl From<&Path> for MinecraftFolder {
    fn from(root: &Path) -> Self {
        MinecraftFolder {
            root: root.to_path_buf(),
        }
    }
}

/// Which jar of a version directory to address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JarKind {
    #[default]
    Client,
    Server,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn folder() -> MinecraftFolder {
        MinecraftFolder::new("/mc")
    }

    #[test]
    fn version_paths() {
        let f = folder();
        assert_eq!(
            f.version_json("1.20.1"),
            PathBuf::from("/mc/versions/1.20.1/1.20.1.json")
        );
        assert_eq!(
            f.version_jar("1.20.1", JarKind::Client),
            PathBuf::from("/mc/versions/1.20.1/1.20.1.jar")
        );
        assert_eq!(
            f.version_jar("1.20.1", JarKind::Server),
            PathBuf::from("/mc/versions/1.20.1/1.20.1-server.jar")
        );
        assert_eq!(
            f.natives_root("1.20.1"),
            PathBuf::from("/mc/versions/1.20.1/1.20.1-natives")
        );
    }

    #[test]
    fn asset_paths_shard_by_hash_prefix() {
        let f = folder();
        let hash = "0234fca8d20312c5f5972499a30c8e87cb2ad212";
        assert_eq!(
            f.asset(hash),
            PathBuf::from(format!("/mc/assets/objects/02/{hash}"))
        );
        assert_eq!(
            f.assets_index("17"),
            PathBuf::from("/mc/assets/indexes/17.json")
        );
        assert_eq!(
            f.log_config("client-1.12.xml"),
            PathBuf::from("/mc/assets/log_configs/client-1.12.xml")
        );
    }

    #[test]
    fn library_and_save_paths() {
        let f = folder();
        assert_eq!(
            f.library("com/example/lib/1.0/lib-1.0.jar"),
            PathBuf::from("/mc/libraries/com/example/lib/1.0/lib-1.0.jar")
        );
        assert_eq!(
            f.map_info("world"),
            PathBuf::from("/mc/saves/world/level.dat")
        );
        assert_eq!(f.map_icon("world"), PathBuf::from("/mc/saves/world/icon.png"));
    }
}
