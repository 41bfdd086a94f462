// ─── craftcore ───
// Core of a Minecraft launcher. Given a standard `.minecraft` layout it
// resolves a version (inheritance chain, platform rules, natives),
// diagnoses the local installation against the result, and composes the
// Java argument vector for launching the client or a dedicated server.
//
// Architecture:
//   platform  — OS family / version / arch probe
//   folder    — canonical paths under a Minecraft root
//   checksum  — streaming SHA-1 over local files
//   maven     — Maven coordinate parsing and repository paths
//   rules     — allow/disallow rule evaluation (OS + features)
//   version/  — raw manifest model + inheritance-chain resolver
//   assets    — asset index model
//   launch/   — launch options + argv synthesis
//   diagnose/ — installation integrity report
//
// The crate performs no network I/O and spawns no processes; downloading
// and process management belong to the embedding launcher.

pub mod assets;
pub mod checksum;
pub mod diagnose;
pub mod error;
pub mod folder;
pub mod launch;
pub mod maven;
pub mod platform;
pub mod rules;
pub mod version;

pub use assets::{AssetIndex, AssetObject};
pub use diagnose::{
    diagnose, CancelToken, DiagnoseOptions, DiagnoseReport, Issue, IssueKind, IssueRole,
};
pub use error::{LauncherError, LauncherResult};
pub use folder::{JarKind, MinecraftFolder};
pub use launch::{
    generate_arguments, generate_server_arguments, GameProfile, LaunchOptions, LaunchVersion,
    Resolution, ServerLaunchOptions, ServerOptions, YggdrasilAgent,
};
pub use maven::MavenArtifact;
pub use platform::{OsFamily, Platform};
pub use rules::{evaluate_rules, OsConstraint, Rule, RuleAction};
pub use version::{
    resolve_version, Argument, ArgumentValue, Artifact, ResolvedArguments, ResolvedLibrary,
    ResolvedVersion, VersionJson,
};
