// syms-common/src/model/outcome.rs
use std::fmt;

/// Result of a symbol refresh. Every variant other than `Updated` leaves the
/// symbols directory's cache marker exactly as it was before the call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    /// Artifact fetched (and unpacked where applicable); marker advanced.
    Updated,
    /// Cache marker already matched the current build parameters.
    AlreadyValid,
    /// The download policy does not allow fetching symbols.
    Skipped(String),
    /// No candidate produced the expected artifact.
    FetchMissing(String),
    /// Device or build metadata could not be determined.
    ParametersUnavailable(String),
}

impl RefreshOutcome {
    /// Symbols in the directory correspond to the current build.
    pub fn is_usable(&self) -> bool {
        matches!(self, Self::Updated | Self::AlreadyValid)
    }
}

impl fmt::Display for RefreshOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Updated => write!(f, "updated"),
            Self::AlreadyValid => write!(f, "already valid"),
            Self::Skipped(reason) => write!(f, "skipped: {reason}"),
            Self::FetchMissing(reason) => write!(f, "artifact missing: {reason}"),
            Self::ParametersUnavailable(reason) => {
                write!(f, "build parameters unavailable: {reason}")
            }
        }
    }
}
