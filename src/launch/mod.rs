pub mod command;
pub mod options;

pub use command::{generate_arguments, generate_server_arguments};
pub use options::{
    GameProfile, LaunchOptions, LaunchVersion, Resolution, ServerLaunchOptions, ServerOptions,
    YggdrasilAgent,
};

/// Extra JVM arguments applied when the caller supplies none.
pub const DEFAULT_EXTRA_JVM_ARGS: [&str; 7] = [
    "-Xmx2G",
    "-XX:+UnlockExperimentalVMOptions",
    "-XX:+UseG1GC",
    "-XX:G1NewSizePercent=20",
    "-XX:G1ReservePercent=20",
    "-XX:MaxGCPauseMillis=50",
    "-XX:G1HeapRegionSize=32M",
];
