//! Explorer and node clients for the current network settings

use halcyon_core::NetworkSettings;
use halcyon_sync::{ClientConfig, ExplorerApi, HttpClient, NodeApi};
use std::sync::Arc;

/// Explorer and node clients
#[derive(Clone)]
pub struct Apis {
    /// Explorer API
    pub explorer: Arc<dyn ExplorerApi>,
    /// Node API
    pub node: Arc<dyn NodeApi>,
}

/// Builds clients whenever network settings change
pub trait ApiFactory: Send + Sync {
    /// Clients for `settings`
    fn connect(&self, settings: &NetworkSettings) -> halcyon_sync::Result<Apis>;
}

/// reqwest clients
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpApiFactory;

impl ApiFactory for HttpApiFactory {
    fn connect(&self, settings: &NetworkSettings) -> halcyon_sync::Result<Apis> {
        let client = Arc::new(HttpClient::new(&ClientConfig::from_settings(settings))?);
        tracing::info!(
            "Using explorer {} and node {}",
            settings.explorer_api_host,
            settings.node_host
        );
        Ok(Apis {
            explorer: client.clone(),
            node: client,
        })
    }
}

/// Same clients for every network, for tests and offline use
#[derive(Clone)]
pub struct FixedApis(pub Apis);

impl ApiFactory for FixedApis {
    fn connect(&self, _settings: &NetworkSettings) -> halcyon_sync::Result<Apis> {
        Ok(self.0.clone())
    }
}
