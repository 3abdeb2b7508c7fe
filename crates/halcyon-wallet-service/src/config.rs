//! Application configuration
//!
//! Read once at startup from the environment:
//!
//! | Variable | Meaning | Default |
//! |---|---|---|
//! | `HALCYON_DATA_DIR` | Directory of `halcyon.db` | platform data dir |
//! | `HALCYON_STORAGE` | `sqlite` or `memory` | `sqlite` |
//! | `HALCYON_NETWORK` | `mainnet`, `testnet` or `devnet` | `mainnet` |
//! | `HALCYON_NODE_HOST` | Node URL override | preset |
//! | `HALCYON_EXPLORER_HOST` | Explorer API URL override | preset |
//!
//! Settings saved by the user take precedence over all of these except the
//! storage location.

use crate::{Error, Result};
use directories::ProjectDirs;
use halcyon_core::NetworkSettings;
use halcyon_params::{NetworkPreset, NetworkType};
use halcyon_storage::{KdfParams, KeyValueStore, MemoryStore, SqliteStore, Storage};
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "halcyon.db";

/// Key-value backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StorageBackend {
    /// SQLite file in the data directory
    Sqlite,
    /// Process memory, lost on exit
    Memory,
}

/// Application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Data directory
    pub data_dir: PathBuf,
    /// Storage backend
    pub backend: StorageBackend,
    /// Argon2id parameters for wallet and data encryption
    pub kdf: KdfParams,
    /// Network used until the user saves network settings
    pub network: NetworkType,
    /// Node URL override
    pub node_host: Option<String>,
    /// Explorer API URL override
    pub explorer_api_host: Option<String>,
    /// Expire pending transactions the explorer never reported
    pub pending_stale_after_ms: Option<i64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            backend: StorageBackend::Sqlite,
            kdf: KdfParams::default(),
            network: NetworkType::Mainnet,
            node_host: None,
            explorer_api_host: None,
            pending_stale_after_ms: None,
        }
    }
}

impl AppConfig {
    /// Configuration from process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Configuration from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let mut config = Self::default();

        if let Some(dir) = get("HALCYON_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        if let Some(backend) = get("HALCYON_STORAGE") {
            config.backend = match backend.trim().to_lowercase().as_str() {
                "sqlite" => StorageBackend::Sqlite,
                "memory" => StorageBackend::Memory,
                other => return Err(Error::Config(format!("Unknown storage backend: {}", other))),
            };
        }
        if let Some(network) = get("HALCYON_NETWORK") {
            config.network = NetworkType::from_str(network.trim())
                .map_err(|e| Error::Config(e.to_string()))?;
        }
        config.node_host = get("HALCYON_NODE_HOST");
        config.explorer_api_host = get("HALCYON_EXPLORER_HOST");

        tracing::debug!(
            "Config: network={}, backend={:?}, data_dir={}",
            config.network,
            config.backend,
            config.data_dir.display()
        );
        Ok(config)
    }

    /// Ephemeral configuration with fast key derivation, for tests
    pub fn in_memory() -> Self {
        Self {
            backend: StorageBackend::Memory,
            kdf: KdfParams::LIGHT,
            ..Self::default()
        }
    }

    /// Path of the SQLite database
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join(DATABASE_FILE)
    }

    /// Network settings before the user saves any
    pub fn initial_network_settings(&self) -> NetworkSettings {
        let mut settings = NetworkSettings::from_preset(&NetworkPreset::for_type(self.network));
        if let Some(host) = &self.node_host {
            settings.node_host = host.clone();
        }
        if let Some(host) = &self.explorer_api_host {
            settings.explorer_api_host = host.clone();
        }
        settings
    }

    /// Open the configured storage
    pub fn open_storage(&self) -> Result<Storage> {
        let kv: Arc<dyn KeyValueStore> = match self.backend {
            StorageBackend::Memory => Arc::new(MemoryStore::new()),
            StorageBackend::Sqlite => {
                std::fs::create_dir_all(&self.data_dir).map_err(|e| {
                    Error::Config(format!(
                        "Cannot create data directory {}: {}",
                        self.data_dir.display(),
                        e
                    ))
                })?;
                Arc::new(SqliteStore::open(self.database_path())?)
            }
        };
        Ok(Storage::new(kv, self.kdf))
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("com", "Halcyon", "HalcyonWallet")
        .map(|dirs| dirs.data_local_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = AppConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.network, NetworkType::Mainnet);
        assert_eq!(config.backend, StorageBackend::Sqlite);
        assert!(config.database_path().ends_with(DATABASE_FILE));
    }

    #[test]
    fn test_overrides() {
        let config = AppConfig::from_lookup(lookup(&[
            ("HALCYON_DATA_DIR", "/tmp/halcyon"),
            ("HALCYON_NETWORK", "testnet"),
            ("HALCYON_EXPLORER_HOST", "http://127.0.0.1:9090"),
            ("HALCYON_NODE_HOST", " "),
            ("HALCYON_STORAGE", "memory"),
        ]))
        .unwrap();

        assert_eq!(config.data_dir, PathBuf::from("/tmp/halcyon"));
        assert_eq!(config.backend, StorageBackend::Memory);
        let network = config.initial_network_settings();
        assert_eq!(network.network_type(), Some(NetworkType::Testnet));
        assert_eq!(network.explorer_api_host, "http://127.0.0.1:9090");
        assert_eq!(
            network.node_host,
            NetworkPreset::for_type(NetworkType::Testnet).node_host
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(AppConfig::from_lookup(lookup(&[("HALCYON_NETWORK", "moon")])).is_err());
        assert!(AppConfig::from_lookup(lookup(&[("HALCYON_STORAGE", "s3")])).is_err());
    }

    #[test]
    fn test_sqlite_storage_in_data_dir() {
        let dir = tempfile::TempDir::new().unwrap();
        let config = AppConfig {
            data_dir: dir.path().join("nested"),
            kdf: KdfParams::LIGHT,
            ..AppConfig::default()
        };
        let storage = config.open_storage().unwrap();
        assert!(storage.wallets.list().unwrap().is_empty());
        assert!(config.database_path().exists());
    }
}
