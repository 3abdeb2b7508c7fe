//! Application settings
//!
//! Every struct is `#[serde(default)]` so settings saved by an older version
//! load with the missing fields filled from [`Default`].

use halcyon_params::{NetworkPreset, NetworkType};
use serde::{Deserialize, Serialize};

/// UI theme
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    /// Light theme
    Light,
    /// Dark theme
    Dark,
    /// Follow the operating system
    #[default]
    System,
}

/// General (non-network) settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneralSettings {
    /// Theme
    pub theme: ThemeMode,
    /// Locale tag, e.g. `en-US`
    pub language: String,
    /// Auto-lock after this many idle minutes, `None` disables auto-lock
    pub wallet_lock_time_minutes: Option<u32>,
    /// Ask for the password before sending
    pub password_requirement: bool,
    /// Hide amounts
    pub discreet_mode: bool,
    /// Fiat currency code
    pub fiat_currency: String,
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::default(),
            language: "en-US".to_string(),
            wallet_lock_time_minutes: Some(3),
            password_requirement: false,
            discreet_mode: false,
            fiat_currency: "USD".to_string(),
        }
    }
}

/// Network endpoints in use
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct NetworkSettings {
    /// Numeric network id
    pub network_id: u8,
    /// Full node endpoint
    pub node_host: String,
    /// Explorer backend endpoint
    pub explorer_api_host: String,
    /// Explorer front-end URL
    pub explorer_url: String,
}

impl NetworkSettings {
    /// Settings matching a preset
    pub fn from_preset(preset: &NetworkPreset) -> Self {
        Self {
            network_id: preset.network_type.id(),
            node_host: preset.node_host.to_string(),
            explorer_api_host: preset.explorer_api_host.to_string(),
            explorer_url: preset.explorer_url.to_string(),
        }
    }

    /// Network type for the configured id, if it is a known one
    pub fn network_type(&self) -> Option<NetworkType> {
        NetworkType::from_id(self.network_id).ok()
    }

    /// Whether these endpoints equal a preset's
    pub fn matches_preset(&self, preset: &NetworkPreset) -> bool {
        *self == Self::from_preset(preset)
    }
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self::from_preset(&NetworkPreset::mainnet())
    }
}

/// All persisted settings
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// General settings
    pub general: GeneralSettings,
    /// Network settings
    pub network: NetworkSettings,
}
