pub mod manifest;
pub mod resolve;

pub use manifest::{
    Argument, ArgumentValue, Arguments, AssetIndexInfo, DownloadInfo, ExtractRules,
    JavaVersionInfo, LibraryArtifact, LibraryDownloads, LibraryEntry, LoggingClientInfo,
    LoggingFileInfo, LoggingInfo, VersionJson,
};
pub use resolve::{
    resolve_version, Artifact, ResolvedArguments, ResolvedLibrary, ResolvedVersion,
};
