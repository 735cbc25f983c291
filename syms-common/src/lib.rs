// syms-common/src/lib.rs
pub mod cache;
pub mod config;
pub mod error;
pub mod model;

// Re-export key types
pub use cache::{is_cache_valid, CacheMarker};
pub use config::{Config, Platform};
pub use error::{Result, SymsError};
pub use model::{BuildInfo, BuildParameters, DownloadPolicy, RefreshOutcome, TrustyTargets};
