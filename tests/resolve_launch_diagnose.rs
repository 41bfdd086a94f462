// End-to-end: build a .minecraft tree on disk, resolve a modded version
// through its parent, synthesize the launch argv, and diagnose the result.

use std::path::PathBuf;

use craftcore::{
    diagnose, generate_arguments, resolve_version, DiagnoseOptions, IssueKind, IssueRole,
    LaunchOptions, MinecraftFolder, OsFamily, Platform,
};

fn linux_x64() -> Platform {
    Platform {
        name: OsFamily::Linux,
        version: "6.1.0".to_string(),
        arch: "x64".to_string(),
    }
}

fn write(path: PathBuf, bytes: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, bytes).unwrap();
}

const VANILLA: &str = r#"{
    "id": "1.20.1",
    "type": "release",
    "mainClass": "net.minecraft.client.main.Main",
    "assets": "5",
    "assetIndex": {"id": "5", "sha1": "", "size": 64, "url": "", "totalSize": 128},
    "javaVersion": {"component": "java-runtime-gamma", "majorVersion": 17},
    "arguments": {
        "game": [
            "--username", "${auth_player_name}",
            "--gameDir", "${game_directory}",
            "--assetsDir", "${assets_root}",
            "--assetIndex", "${assets_index_name}",
            {
                "rules": [{"action": "allow", "features": {"is_demo_user": true}}],
                "value": "--demo"
            },
            {
                "rules": [{"action": "allow", "features": {"has_custom_resolution": true}}],
                "value": ["--width", "${resolution_width}", "--height", "${resolution_height}"]
            }
        ],
        "jvm": [
            {
                "rules": [{"action": "allow", "os": {"name": "windows"}}],
                "value": "-XX:HeapDumpPath=MojangTricksIntelDriversForPerformance_javaw.exe_minecraft.exe.heapdump"
            },
            "-Djava.library.path=${natives_directory}",
            "-cp", "${classpath}"
        ]
    },
    "libraries": [
        {
            "name": "com.mojang:logging:1.1.1",
            "downloads": {"artifact": {
                "path": "com/mojang/logging/1.1.1/logging-1.1.1.jar",
                "sha1": "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed",
                "size": 11,
                "url": "https://libraries.minecraft.net/com/mojang/logging/1.1.1/logging-1.1.1.jar"
            }}
        },
        {
            "name": "org.lwjgl:lwjgl:3.3.1",
            "natives": {"linux": "natives-linux", "osx": "natives-osx"},
            "downloads": {"classifiers": {
                "natives-linux": {
                    "path": "org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-linux.jar",
                    "sha1": "", "size": 4, "url": ""
                }
            }}
        }
    ],
    "downloads": {
        "client": {"sha1": "2aae6c35c94fcfb415dbe95f408b9ce91ee846ed", "size": 11, "url": ""}
    }
}"#;

const FORGE: &str = r#"{
    "id": "1.20.1-forge-47.1.0",
    "inheritsFrom": "1.20.1",
    "mainClass": "cpw.mods.bootstraplauncher.BootstrapLauncher",
    "arguments": {
        "game": ["--fml.forgeVersion", "47.1.0"],
        "jvm": ["-Dforge.enabledGameTestNamespaces=forge"]
    },
    "libraries": [
        {
            "name": "net.minecraftforge:forge:1.20.1-47.1.0",
            "downloads": {"artifact": {
                "path": "net/minecraftforge/forge/1.20.1-47.1.0/forge-1.20.1-47.1.0.jar",
                "sha1": "", "size": -1, "url": ""
            }}
        }
    ]
}"#;

fn install_tree(folder: &MinecraftFolder) {
    write(folder.version_json("1.20.1"), VANILLA.as_bytes());
    write(folder.version_json("1.20.1-forge-47.1.0"), FORGE.as_bytes());
    // Client jar content hashes to the declared sha1.
    write(folder.version_jar("1.20.1", craftcore::JarKind::Client), b"hello world");
    write(folder.assets_index("5"), br#"{"objects": {}}"#);
    write(
        folder.library("com/mojang/logging/1.1.1/logging-1.1.1.jar"),
        b"hello world",
    );
    write(
        folder.library("org/lwjgl/lwjgl/3.3.1/lwjgl-3.3.1-natives-linux.jar"),
        b"nat!",
    );
    write(
        folder.library("net/minecraftforge/forge/1.20.1-47.1.0/forge-1.20.1-47.1.0.jar"),
        b"forge",
    );
}

#[tokio::test]
async fn forge_chain_resolves_with_child_precedence() {
    let dir = tempfile::tempdir().unwrap();
    let folder = MinecraftFolder::new(dir.path());
    install_tree(&folder);

    let resolved = resolve_version(&folder, "1.20.1-forge-47.1.0", &linux_x64())
        .await
        .unwrap();

    assert_eq!(
        resolved.inheritances,
        ["1.20.1-forge-47.1.0", "1.20.1"]
    );
    assert_eq!(
        resolved.main_class,
        "cpw.mods.bootstraplauncher.BootstrapLauncher"
    );
    assert_eq!(resolved.minecraft_version, "1.20.1");
    assert_eq!(resolved.java_version.major_version, 17);

    let names: Vec<String> = resolved.libraries.iter().map(|l| l.name()).collect();
    assert!(names.contains(&"com.mojang:logging:1.1.1".to_string()));
    assert!(names.contains(&"net.minecraftforge:forge:1.20.1-47.1.0".to_string()));
    assert!(names.contains(&"org.lwjgl:lwjgl:3.3.1:natives-linux".to_string()));
    // Non-natives precede natives.
    let native_pos = resolved
        .libraries
        .iter()
        .position(|l| l.is_native)
        .unwrap();
    assert!(resolved.libraries[..native_pos].iter().all(|l| !l.is_native));
    // Forge artifact URL was synthesized onto the Forge maven.
    let forge = resolved
        .libraries
        .iter()
        .find(|l| l.info.group_id == "net.minecraftforge")
        .unwrap();
    assert!(forge.download.url.starts_with("https://files.minecraftforge.net/maven/"));
}

#[tokio::test]
async fn launch_argv_covers_chain_and_options() {
    let dir = tempfile::tempdir().unwrap();
    let folder = MinecraftFolder::new(dir.path());
    install_tree(&folder);

    let mut options = LaunchOptions::new("1.20.1-forge-47.1.0", dir.path());
    options.java_path = PathBuf::from("/usr/bin/java");
    options.platform = Some(linux_x64());
    options.min_memory = Some(512);
    options.max_memory = Some(2048);
    options.access_token = Some("token".to_string());

    let args = generate_arguments(&options).await.unwrap();

    assert_eq!(args[0], "/usr/bin/java");
    assert!(args.contains(&"-Xms512M".to_string()));
    assert!(args.contains(&"-Xmx2048M".to_string()));
    assert!(!args.contains(&"-Xmx2G".to_string()));
    // Parent JVM args survive, child JVM args appended, windows-only dropped.
    assert!(args.contains(&"-Dforge.enabledGameTestNamespaces=forge".to_string()));
    assert!(!args.iter().any(|a| a.contains("HeapDumpPath")));

    // Classpath: libraries + vanilla client jar, unix separator.
    let cp = args.iter().position(|a| a == "-cp").unwrap();
    let classpath = &args[cp + 1];
    assert!(classpath.contains("logging-1.1.1.jar"));
    assert!(classpath.contains("forge-1.20.1-47.1.0.jar"));
    assert!(classpath.ends_with("1.20.1.jar"));
    assert!(!classpath.contains("natives-linux"));
    assert!(classpath.contains(':'));

    // Main class precedes game arguments; placeholders interpolated.
    let main = args
        .iter()
        .position(|a| a == "cpw.mods.bootstraplauncher.BootstrapLauncher")
        .unwrap();
    let username = args.iter().position(|a| a == "--username").unwrap();
    assert!(main < username);
    assert_eq!(args[username + 1], "Steve");
    let assets_dir = args.iter().position(|a| a == "--assetsDir").unwrap();
    assert_eq!(
        args[assets_dir + 1],
        folder.assets().to_string_lossy().to_string()
    );
    // Feature-gated entries stay out without the feature.
    assert!(!args.contains(&"--demo".to_string()));
    assert!(!args.contains(&"--width".to_string()));
    // Child game args appended after parent ones.
    assert!(args.contains(&"--fml.forgeVersion".to_string()));
}

#[tokio::test]
async fn osx_dock_icon_is_looked_up_in_asset_index() {
    let dir = tempfile::tempdir().unwrap();
    let folder = MinecraftFolder::new(dir.path());
    install_tree(&folder);

    let icon_hash = "b1946ac92492d2347c6235b4d2611184aaf845cc";
    write(
        folder.assets_index("5"),
        format!(
            r#"{{"objects": {{"icons/minecraft.icns": {{"hash": "{icon_hash}", "size": 9}}}}}}"#
        )
        .as_bytes(),
    );

    let mut options = LaunchOptions::new("1.20.1-forge-47.1.0", dir.path());
    options.platform = Some(Platform {
        name: OsFamily::Osx,
        version: "14.2".to_string(),
        arch: "arm64".to_string(),
    });

    let args = generate_arguments(&options).await.unwrap();
    assert!(args.contains(&"-Xdock:name=Minecraft".to_string()));
    assert!(args.contains(&format!(
        "-Xdock:icon={}",
        folder.asset(icon_hash).to_string_lossy()
    )));
}

#[tokio::test]
async fn healthy_tree_diagnoses_clean() {
    let dir = tempfile::tempdir().unwrap();
    let folder = MinecraftFolder::new(dir.path());
    install_tree(&folder);

    let options = DiagnoseOptions {
        platform: Some(linux_x64()),
        ..Default::default()
    };
    let report = diagnose("1.20.1-forge-47.1.0", &folder, &options)
        .await
        .unwrap();

    // The natives jar has no declared sha1 and the index no sha1: existence
    // is enough. Everything is present, so the report is clean.
    assert!(report.is_healthy(), "unexpected issues: {:?}", report.issues);
}

#[tokio::test]
async fn deleted_library_and_jar_show_up_as_issues() {
    let dir = tempfile::tempdir().unwrap();
    let folder = MinecraftFolder::new(dir.path());
    install_tree(&folder);

    std::fs::remove_file(folder.version_jar("1.20.1", craftcore::JarKind::Client)).unwrap();
    std::fs::write(
        folder.library("com/mojang/logging/1.1.1/logging-1.1.1.jar"),
        b"tampered",
    )
    .unwrap();

    let options = DiagnoseOptions {
        platform: Some(linux_x64()),
        ..Default::default()
    };
    let report = diagnose("1.20.1-forge-47.1.0", &folder, &options)
        .await
        .unwrap();

    let jar = report
        .issues
        .iter()
        .find(|i| matches!(i.role, IssueRole::MinecraftJar { .. }))
        .unwrap();
    assert_eq!(jar.kind, IssueKind::Missing);

    let lib = report
        .issues
        .iter()
        .find(|i| matches!(&i.role, IssueRole::Library { name } if name == "com.mojang:logging:1.1.1"))
        .unwrap();
    assert_eq!(lib.kind, IssueKind::Corrupted);
    assert_eq!(report.issues.len(), 2);
}
