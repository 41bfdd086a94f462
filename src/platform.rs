// ─── Platform Probe ───
// Detects the OS family, version and architecture used by rule evaluation
// and launch argument synthesis.

use std::fmt;

use serde::{Deserialize, Serialize};

/// OS family names as they appear in Mojang rule objects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OsFamily {
    Windows,
    Osx,
    Linux,
    Unknown,
}

impl OsFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::Osx => "osx",
            OsFamily::Linux => "linux",
            OsFamily::Unknown => "unknown",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A snapshot of the host platform, immutable per call.
///
/// `arch` uses launcher wire names (`x64`, `x86`, `arm64`, ...), which is
/// what native classifiers and rule objects expect.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Platform {
    pub name: OsFamily,
    pub version: String,
    pub arch: String,
}

impl Platform {
    /// Probe the current host. Never fails; unrecognized systems come back
    /// as `unknown` with whatever version string the OS reports.
    pub fn current() -> Self {
        let name = match std::env::consts::OS {
            "macos" => OsFamily::Osx,
            "linux" => OsFamily::Linux,
            "windows" => OsFamily::Windows,
            _ => OsFamily::Unknown,
        };

        Platform {
            name,
            version: os_info::get().version().to_string(),
            arch: wire_arch(std::env::consts::ARCH).to_string(),
        }
    }

    /// The `${arch}` replacement used in native library classifiers:
    /// the arch name minus a single leading `x`.
    ///
    /// `x64` -> `64`, `x86` -> `86`, `arm64` -> `arm64`.
    pub fn arch_bits(&self) -> &str {
        self.arch.strip_prefix('x').unwrap_or(&self.arch)
    }
}

/// Map a Rust target arch to the launcher wire name.
fn wire_arch(arch: &str) -> &str {
    match arch {
        "x86_64" => "x64",
        "x86" => "x86",
        "aarch64" => "arm64",
        other => other,
    }
}
