//! Network definitions and default endpoints

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Network type enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NetworkType {
    /// Mainnet
    Mainnet,
    /// Testnet
    Testnet,
    /// Devnet (local development node)
    Devnet,
}

impl NetworkType {
    /// Numeric network id as reported by the node
    pub const fn id(&self) -> u8 {
        match self {
            Self::Mainnet => 0,
            Self::Testnet => 1,
            Self::Devnet => 4,
        }
    }

    /// Lookup by numeric network id
    pub fn from_id(id: u8) -> Result<Self> {
        match id {
            0 => Ok(Self::Mainnet),
            1 => Ok(Self::Testnet),
            4 => Ok(Self::Devnet),
            other => Err(Error::InvalidNetwork(format!("unknown network id {}", other))),
        }
    }

    /// Human-readable name
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Mainnet => "mainnet",
            Self::Testnet => "testnet",
            Self::Devnet => "devnet",
        }
    }
}

impl fmt::Display for NetworkType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for NetworkType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mainnet" => Ok(Self::Mainnet),
            "testnet" => Ok(Self::Testnet),
            "devnet" | "localhost" => Ok(Self::Devnet),
            other => Err(Error::InvalidNetwork(other.to_string())),
        }
    }
}

/// Default endpoints for a network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkPreset {
    /// Network type
    pub network_type: NetworkType,
    /// Full node REST endpoint (transaction submission)
    pub node_host: &'static str,
    /// Explorer backend REST endpoint (balances, history)
    pub explorer_api_host: &'static str,
    /// Explorer front-end URL (links shown to the user)
    pub explorer_url: &'static str,
}

impl NetworkPreset {
    /// Get mainnet endpoints
    pub const fn mainnet() -> Self {
        Self {
            network_type: NetworkType::Mainnet,
            node_host: "https://node.mainnet.halcyon.org",
            explorer_api_host: "https://backend.mainnet.halcyon.org",
            explorer_url: "https://explorer.halcyon.org",
        }
    }

    /// Get testnet endpoints
    pub const fn testnet() -> Self {
        Self {
            network_type: NetworkType::Testnet,
            node_host: "https://node.testnet.halcyon.org",
            explorer_api_host: "https://backend.testnet.halcyon.org",
            explorer_url: "https://testnet.explorer.halcyon.org",
        }
    }

    /// Get devnet endpoints (local docker setup)
    pub const fn devnet() -> Self {
        Self {
            network_type: NetworkType::Devnet,
            node_host: "http://127.0.0.1:22973",
            explorer_api_host: "http://127.0.0.1:9090",
            explorer_url: "http://localhost:3000",
        }
    }

    /// Get preset by network type
    pub const fn for_type(network_type: NetworkType) -> Self {
        match network_type {
            NetworkType::Mainnet => Self::mainnet(),
            NetworkType::Testnet => Self::testnet(),
            NetworkType::Devnet => Self::devnet(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mainnet_preset() {
        let preset = NetworkPreset::mainnet();
        assert_eq!(preset.network_type, NetworkType::Mainnet);
        assert!(preset.node_host.starts_with("https://"));
        assert_eq!(preset.network_type.id(), 0);
    }

    #[test]
    fn test_network_from_str_and_id() {
        assert_eq!("Testnet".parse::<NetworkType>().unwrap(), NetworkType::Testnet);
        assert_eq!("localhost".parse::<NetworkType>().unwrap(), NetworkType::Devnet);
        assert!("moonnet".parse::<NetworkType>().is_err());

        for net in [NetworkType::Mainnet, NetworkType::Testnet, NetworkType::Devnet] {
            assert_eq!(NetworkType::from_id(net.id()).unwrap(), net);
        }
        assert!(NetworkType::from_id(9).is_err());
    }

    #[test]
    fn test_network_type_serde_lowercase() {
        let json = serde_json::to_string(&NetworkType::Devnet).unwrap();
        assert_eq!(json, "\"devnet\"");
        let back: NetworkType = serde_json::from_str("\"testnet\"").unwrap();
        assert_eq!(back, NetworkType::Testnet);
    }
}
