//! Halcyon wallet service
//!
//! The entry point the UI (or the CLI) talks to. [`WalletService`] owns the
//! storage, the explorer and node clients and the state store, and turns
//! user actions into storage writes followed by store events.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod apis;
pub mod bridge;
pub mod config;
pub mod error;
pub mod service;

pub use apis::{ApiFactory, Apis, FixedApis, HttpApiFactory};
pub use bridge::{NoopShell, ShellBridge};
pub use config::{AppConfig, StorageBackend, DATABASE_FILE};
pub use error::{Error, Result};
pub use service::{ServiceBuilder, SubmitRequest, WalletService};
