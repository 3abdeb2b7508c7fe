//! Halcyon network parameters and constants
//!
//! This crate provides network presets (node and explorer endpoints),
//! address derivation constants and explorer pagination limits.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod constants;
pub mod network;

pub use constants::{
    ADDRESS_DISCOVERY_GAP, COIN_TYPE, MIN_PASSWORD_LENGTH, NATIVE_DECIMALS, PAGE_LIMIT,
    TOTAL_NUMBER_OF_GROUPS,
};
pub use network::{NetworkPreset, NetworkType};

/// Error types for parameter operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid network specified
    #[error("Invalid network: {0}")]
    InvalidNetwork(String),

    /// Invalid address group
    #[error("Invalid address group: {0}")]
    InvalidGroup(u32),
}

/// Result type for parameter operations
pub type Result<T> = std::result::Result<T, Error>;
