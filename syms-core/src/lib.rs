// syms-core/src/lib.rs

// Declare the top-level modules within the library crate
pub mod archive;
pub mod device;
pub mod fetch;
pub mod locate;
pub mod symbols;

#[cfg(test)]
pub(crate) mod testing;

// Re-export key types for easier use by the CLI crate
pub use archive::{ArchiveCodec, ZipCodec};
pub use device::{Adb, DeviceChannel, DeviceSettings, KernelIdentity};
pub use fetch::ArtifactFetcher;
pub use locate::{find_binary_path, BinaryLocator};
pub use symbols::SymbolCacheManager;
