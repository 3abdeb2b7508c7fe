//! Connectivity probe

use crate::client::ExplorerApi;

/// Probe result
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Connectivity {
    /// Explorer answered
    Online {
        /// Explorer release
        version: String,
    },
    /// Explorer unreachable or failing
    Offline {
        /// Failure reason
        reason: String,
    },
}

impl Connectivity {
    /// Explorer answered
    pub fn is_online(&self) -> bool {
        matches!(self, Connectivity::Online { .. })
    }
}

/// Query the explorer info endpoint once. Never retries.
pub async fn probe_connectivity(api: &dyn ExplorerApi) -> Connectivity {
    match api.infos().await {
        Ok(info) => {
            tracing::info!("Explorer online (release {})", info.release_version);
            Connectivity::Online {
                version: info.release_version,
            }
        }
        Err(e) => {
            tracing::warn!("Explorer offline: {}", e);
            Connectivity::Offline {
                reason: e.to_string(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mock::MockExplorer;

    #[tokio::test]
    async fn test_probe_states() {
        let api = MockExplorer::new();
        assert!(probe_connectivity(&api).await.is_online());

        api.set_online(false);
        let status = probe_connectivity(&api).await;
        assert!(matches!(status, Connectivity::Offline { .. }));
    }
}
