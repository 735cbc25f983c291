// syms-common/src/model/policy.rs

/// Whether symbols may be fetched from the remote artifact store.
///
/// Archived symbols exist only for first-party builds, and local development
/// setups have no access to the store, so the caller evaluates this once from
/// configuration and device state and hands it to the cache manager.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadPolicy {
    Enabled,
    Disabled(String),
}

impl DownloadPolicy {
    pub fn evaluate(local_development: bool, first_party_device: bool) -> Self {
        if local_development {
            Self::Disabled("local development mode".to_string())
        } else if !first_party_device {
            Self::Disabled("device is not a first-party device".to_string())
        } else {
            Self::Enabled
        }
    }

    pub fn allows_download(&self) -> bool {
        matches!(self, Self::Enabled)
    }
}
