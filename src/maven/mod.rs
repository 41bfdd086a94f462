mod artifact;

pub use artifact::MavenArtifact;

/// Well-known repositories used by the Minecraft ecosystem.
pub const MOJANG_LIBRARIES: &str = "https://libraries.minecraft.net";
pub const FORGE_MAVEN: &str = "https://files.minecraftforge.net/maven";
