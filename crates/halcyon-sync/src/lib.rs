//! Explorer sync for Halcyon wallets
//!
//! This crate talks to the explorer and node REST APIs:
//! - Address sync (balances, first transaction page, mempool, tokens)
//! - On-demand history paging with a per-address cursor
//! - Pending transaction reconciliation
//! - Connectivity probing
//! - Address discovery on a background worker thread

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod client;
pub mod discovery;
pub mod error;
#[cfg(any(test, feature = "test-helpers"))]
pub mod mock;
pub mod pagination;
pub mod probe;
pub mod reconcile;
pub mod sync;

pub use client::{
    AddressBalance, ClientConfig, ExplorerApi, ExplorerInfo, HttpClient, NodeApi, SubmitResult,
};
pub use discovery::{discover_addresses, spawn_discovery, DiscoveryRequest};
pub use error::{Error, Result};
#[cfg(any(test, feature = "test-helpers"))]
pub use mock::MockExplorer;
pub use pagination::{fetch_all_pages, fetch_pages_from, Paged};
pub use probe::{probe_connectivity, Connectivity};
pub use reconcile::{reconcile_pending, reconcile_pending_with, ReconcileOptions, Reconciled};
pub use sync::{
    load_all_transactions, load_more_transactions, sync_address, sync_addresses, sync_tokens,
    AddressSyncData, SyncOutcome, TransactionsPage,
};
