//! Settings storage
//!
//! Settings are plaintext JSON under the fixed key `settings`. Loading merges
//! the saved object over the defaults, so fields added by newer versions get
//! their default and fields removed since are ignored.

use crate::kv::KeyValueStore;
use crate::Result;
use halcyon_core::{GeneralSettings, NetworkSettings, Settings, WalletId};
use halcyon_params::NetworkPreset;
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;

/// Key of the settings entry
pub const SETTINGS_KEY: &str = "settings";

/// Key of the app-wide active wallet pointer
pub const ACTIVE_WALLET_KEY: &str = "active-wallet";

/// Settings store
pub struct SettingsStore {
    kv: Arc<dyn KeyValueStore>,
}

impl SettingsStore {
    /// Store on top of `kv`
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self { kv }
    }

    /// Saved settings merged over defaults
    pub fn load(&self) -> Result<Settings> {
        let defaults = Settings::default();
        let Some(raw) = self.kv.get(SETTINGS_KEY)? else {
            return Ok(defaults);
        };
        let saved: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Ignoring unreadable settings: {}", e);
                return Ok(defaults);
            }
        };

        Ok(Settings {
            general: merge_section(&defaults.general, saved.get("general"))?,
            network: merge_section(&defaults.network, saved.get("network"))?,
        })
    }

    /// Replace all settings
    pub fn store(&self, settings: &Settings) -> Result<()> {
        self.kv.set(SETTINGS_KEY, &serde_json::to_string(settings)?)
    }

    /// Replace general settings
    pub fn store_general(&self, general: GeneralSettings) -> Result<Settings> {
        let mut settings = self.load()?;
        settings.general = general;
        self.store(&settings)?;
        Ok(settings)
    }

    /// Replace network settings
    pub fn store_network(&self, network: NetworkSettings) -> Result<Settings> {
        let mut settings = self.load()?;
        settings.network = network;
        self.store(&settings)?;
        Ok(settings)
    }

    /// Switch network settings back to a preset
    pub fn reset_network(&self, preset: &NetworkPreset) -> Result<Settings> {
        self.store_network(NetworkSettings::from_preset(preset))
    }

    /// Wallet unlocked last
    pub fn active_wallet_id(&self) -> Result<Option<WalletId>> {
        self.kv.get(ACTIVE_WALLET_KEY)
    }

    /// Record (or clear) the active wallet
    pub fn set_active_wallet_id(&self, id: Option<&str>) -> Result<()> {
        match id {
            Some(id) => self.kv.set(ACTIVE_WALLET_KEY, id),
            None => self.kv.remove(ACTIVE_WALLET_KEY),
        }
    }
}

/// Merge a saved section over its default. Falls back to the default when
/// the merged value no longer deserializes.
fn merge_section<T>(default: &T, saved: Option<&Value>) -> Result<T>
where
    T: serde::Serialize + DeserializeOwned + Clone,
{
    let Some(saved) = saved else {
        return Ok(default.clone());
    };
    let mut merged = serde_json::to_value(default)?;
    merge_values(&mut merged, saved);
    match serde_json::from_value(merged) {
        Ok(section) => Ok(section),
        Err(e) => {
            tracing::warn!("Resetting settings section to defaults: {}", e);
            Ok(default.clone())
        }
    }
}

/// Recursive object merge. Keys absent from `base` are dropped.
fn merge_values(base: &mut Value, saved: &Value) {
    match (base, saved) {
        (Value::Object(base), Value::Object(saved)) => {
            for (key, value) in base.iter_mut() {
                if let Some(saved_value) = saved.get(key) {
                    merge_values(value, saved_value);
                }
            }
        }
        (base, saved) => *base = saved.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kv::MemoryStore;
    use halcyon_core::ThemeMode;
    use halcyon_params::NetworkType;

    fn store() -> (Arc<dyn KeyValueStore>, SettingsStore) {
        let kv: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        (kv.clone(), SettingsStore::new(kv))
    }

    #[test]
    fn test_defaults_when_empty() {
        let (_, store) = store();
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_merge_over_defaults() {
        let (kv, store) = store();
        kv.set(
            SETTINGS_KEY,
            r#"{"general":{"theme":"dark","removedField":1},"network":{"networkId":1},"legacy":true}"#,
        )
        .unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.general.theme, ThemeMode::Dark);
        assert_eq!(settings.general.fiat_currency, "USD");
        assert_eq!(settings.network.network_id, 1);
        assert_eq!(
            settings.network.node_host,
            NetworkSettings::default().node_host
        );
    }

    #[test]
    fn test_bad_section_falls_back() {
        let (kv, store) = store();
        kv.set(SETTINGS_KEY, r#"{"general":{"theme":42},"network":{"networkId":4}}"#)
            .unwrap();
        let settings = store.load().unwrap();
        assert_eq!(settings.general, GeneralSettings::default());
        assert_eq!(settings.network.network_id, 4);

        kv.set(SETTINGS_KEY, "{").unwrap();
        assert_eq!(store.load().unwrap(), Settings::default());
    }

    #[test]
    fn test_store_sections() {
        let (_, store) = store();
        let general = GeneralSettings {
            discreet_mode: true,
            ..GeneralSettings::default()
        };
        store.store_general(general.clone()).unwrap();
        store
            .reset_network(&NetworkPreset::for_type(NetworkType::Testnet))
            .unwrap();

        let settings = store.load().unwrap();
        assert_eq!(settings.general, general);
        assert_eq!(settings.network.network_type(), Some(NetworkType::Testnet));
    }

    #[test]
    fn test_active_wallet_pointer() {
        let (_, store) = store();
        assert_eq!(store.active_wallet_id().unwrap(), None);
        store.set_active_wallet_id(Some("w1")).unwrap();
        assert_eq!(store.active_wallet_id().unwrap().as_deref(), Some("w1"));
        store.set_active_wallet_id(None).unwrap();
        assert_eq!(store.active_wallet_id().unwrap(), None);
    }
}
