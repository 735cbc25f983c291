// syms-common/src/model/mod.rs
pub mod build_params;
pub mod outcome;
pub mod policy;
pub mod trusty;

pub use build_params::{BuildInfo, BuildParameters, KERNEL_BUILD_TYPE};
pub use outcome::RefreshOutcome;
pub use policy::DownloadPolicy;
pub use trusty::TrustyTargets;
