// syms-net/src/lib.rs
pub mod http;
pub mod store;
pub mod validation;

pub use http::HttpArtifactStore;
pub use store::ArtifactStore;
pub use validation::validate_url;
