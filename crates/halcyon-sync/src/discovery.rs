//! Address discovery worker
//!
//! Derives addresses in index order and asks the explorer which ones were
//! ever used. Each group is scanned until `gap` consecutive unused addresses
//! have been seen in it. The scan runs on its own OS thread with a private
//! current-thread runtime; the caller gets the result through a oneshot
//! channel and shares no state with the worker.

use crate::client::ExplorerApi;
use crate::{Error, Result};
use halcyon_core::{AddressDeriver, DerivedAddress, Seed};
use halcyon_params::{ADDRESS_DISCOVERY_GAP, TOTAL_NUMBER_OF_GROUPS};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::oneshot;
use tracing::{debug, info, warn};

/// Name of the worker thread
pub const DISCOVERY_THREAD_NAME: &str = "address-discovery";

/// Addresses checked per `addresses_used` request
pub const DISCOVERY_BATCH_SIZE: usize = 20;

/// Highest index probed before giving up
pub const DEFAULT_MAX_INDEX: u32 = 10_000;

/// Work handed to the discovery worker
pub struct DiscoveryRequest {
    /// Wallet seed
    pub seed: Seed,
    /// Indexes the wallet already holds; counted as used, never returned
    pub skip_indexes: Vec<u32>,
    /// Consecutive unused addresses that end the scan of a group
    pub gap: u32,
    /// Exclusive upper bound on derivation indexes
    pub max_index: u32,
}

impl DiscoveryRequest {
    /// Request with default gap and index cap
    pub fn new(seed: Seed, skip_indexes: Vec<u32>) -> Self {
        Self {
            seed,
            skip_indexes,
            gap: ADDRESS_DISCOVERY_GAP,
            max_index: DEFAULT_MAX_INDEX,
        }
    }
}

impl std::fmt::Debug for DiscoveryRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DiscoveryRequest")
            .field("skip_indexes", &self.skip_indexes)
            .field("gap", &self.gap)
            .field("max_index", &self.max_index)
            .finish_non_exhaustive()
    }
}

/// Run discovery on a dedicated thread
pub fn spawn_discovery(
    api: Arc<dyn ExplorerApi>,
    deriver: Arc<dyn AddressDeriver>,
    request: DiscoveryRequest,
) -> Result<oneshot::Receiver<Result<Vec<DerivedAddress>>>> {
    let (tx, rx) = oneshot::channel();

    std::thread::Builder::new()
        .name(DISCOVERY_THREAD_NAME.to_string())
        .spawn(move || {
            let result = tokio::runtime::Builder::new_current_thread()
                .enable_all()
                .build()
                .map_err(|e| Error::Worker(format!("Failed to build runtime: {}", e)))
                .and_then(|runtime| {
                    runtime.block_on(discover_addresses(api.as_ref(), deriver.as_ref(), &request))
                });
            if let Err(e) = &result {
                warn!("Address discovery failed: {}", e);
            }
            if tx.send(result).is_err() {
                debug!("Discovery result dropped, receiver went away");
            }
        })
        .map_err(|e| Error::Worker(format!("Failed to spawn discovery thread: {}", e)))?;

    Ok(rx)
}

/// Gap-limit scan. Returns used addresses not in `skip_indexes`, by index.
pub async fn discover_addresses(
    api: &dyn ExplorerApi,
    deriver: &dyn AddressDeriver,
    request: &DiscoveryRequest,
) -> Result<Vec<DerivedAddress>> {
    let gap = request.gap.max(1);
    let skip: HashSet<u32> = request.skip_indexes.iter().copied().collect();
    let mut unused_streak = [0u32; TOTAL_NUMBER_OF_GROUPS as usize];
    let mut discovered = Vec::new();
    let mut index = 0u32;
    let mut requests = 0u32;

    let group_open = |streak: &[u32], group: u32| -> Result<bool> {
        streak
            .get(group as usize)
            .map(|count| *count < gap)
            .ok_or_else(|| Error::Sync(format!("Derived address in unknown group {}", group)))
    };

    while index < request.max_index && unused_streak.iter().any(|count| *count < gap) {
        let mut batch = Vec::with_capacity(DISCOVERY_BATCH_SIZE);
        while batch.len() < DISCOVERY_BATCH_SIZE && index < request.max_index {
            let derived = deriver.derive(&request.seed, index)?;
            index += 1;
            if !group_open(&unused_streak, derived.group)? {
                continue;
            }
            if skip.contains(&derived.index) {
                unused_streak[derived.group as usize] = 0;
                continue;
            }
            batch.push(derived);
        }
        if batch.is_empty() {
            continue;
        }

        let hashes: Vec<String> = batch.iter().map(|d| d.hash.clone()).collect();
        let used = api.addresses_used(&hashes).await?;
        requests += 1;
        if used.len() != hashes.len() {
            return Err(Error::Sync(format!(
                "Explorer answered {} of {} used-address flags",
                used.len(),
                hashes.len()
            )));
        }

        for (derived, used) in batch.into_iter().zip(used) {
            if !group_open(&unused_streak, derived.group)? {
                continue;
            }
            if used {
                unused_streak[derived.group as usize] = 0;
                discovered.push(derived);
            } else {
                unused_streak[derived.group as usize] += 1;
            }
        }
    }

    info!(
        "Discovered {} addresses up to index {} ({} requests)",
        discovered.len(),
        index,
        requests
    );
    Ok(discovered)
}
