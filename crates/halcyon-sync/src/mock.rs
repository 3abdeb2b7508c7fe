//! Scripted in-memory explorer and node
//!
//! Serves data with the same `page`/`limit` slicing as the real explorer.

use crate::client::{AddressBalance, ExplorerApi, ExplorerInfo, NodeApi, SubmitResult};
use crate::{Error, Result};
use async_trait::async_trait;
use halcyon_core::{MempoolTransaction, Transaction, TxOutput};
use parking_lot::{Mutex, MutexGuard};
use std::collections::{HashMap, HashSet};

/// Confirmed transaction paying `amount = 1` to `address`
pub fn transaction(hash: &str, address: &str, timestamp: i64) -> Transaction {
    Transaction {
        hash: hash.to_string(),
        block_hash: format!("block-{}", hash),
        timestamp,
        inputs: Vec::new(),
        outputs: vec![TxOutput {
            address: address.to_string(),
            amount: 1,
        }],
        gas_amount: 20_000,
        gas_price: 100_000_000_000,
    }
}

#[derive(Default)]
struct MockState {
    balances: HashMap<String, AddressBalance>,
    transactions: HashMap<String, Vec<Transaction>>,
    mempool: HashMap<String, Vec<MempoolTransaction>>,
    tokens: HashMap<String, Vec<(String, AddressBalance)>>,
    used: HashSet<String>,
    failing: HashSet<String>,
    offline: bool,
    used_limit: Option<usize>,
    submitted: Vec<(String, String)>,
    requests: HashMap<&'static str, u32>,
}

/// Scripted explorer
#[derive(Default)]
pub struct MockExplorer {
    state: Mutex<MockState>,
}

impl MockExplorer {
    /// Online explorer with no data
    pub fn new() -> Self {
        Self::default()
    }

    /// Native balance of an address
    pub fn set_balance(&self, address: &str, balance: AddressBalance) {
        self.state.lock().balances.insert(address.to_string(), balance);
    }

    /// Full confirmed history of an address, newest first
    pub fn set_transactions(&self, address: &str, transactions: Vec<Transaction>) {
        let mut state = self.state.lock();
        if !transactions.is_empty() {
            state.used.insert(address.to_string());
        }
        state.transactions.insert(address.to_string(), transactions);
    }

    /// Mempool of an address
    pub fn set_mempool(&self, address: &str, mempool: Vec<MempoolTransaction>) {
        self.state.lock().mempool.insert(address.to_string(), mempool);
    }

    /// Tokens held by an address
    pub fn set_tokens(&self, address: &str, tokens: Vec<(String, AddressBalance)>) {
        self.state.lock().tokens.insert(address.to_string(), tokens);
    }

    /// Report the address as used
    pub fn mark_used(&self, address: &str) {
        self.state.lock().used.insert(address.to_string());
    }

    /// Make every request about this address fail
    pub fn fail_address(&self, address: &str) {
        self.state.lock().failing.insert(address.to_string());
    }

    /// Answer at most `limit` flags per used-addresses request
    pub fn truncate_used(&self, limit: usize) {
        self.state.lock().used_limit = Some(limit);
    }

    /// Toggle reachability
    pub fn set_online(&self, online: bool) {
        self.state.lock().offline = !online;
    }

    /// Requests served per endpoint (`balance`, `transactions`, `mempool`,
    /// `tokens`, `token-balance`, `used`, `infos`, `submit`)
    pub fn request_count(&self, endpoint: &str) -> u32 {
        self.state
            .lock()
            .requests
            .get(endpoint)
            .copied()
            .unwrap_or_default()
    }

    /// Transactions submitted to the node, as `(unsigned, signature)`
    pub fn submitted(&self) -> Vec<(String, String)> {
        self.state.lock().submitted.clone()
    }

    fn begin(
        &self,
        endpoint: &'static str,
        address: Option<&str>,
    ) -> Result<MutexGuard<'_, MockState>> {
        let mut state = self.state.lock();
        *state.requests.entry(endpoint).or_default() += 1;
        if state.offline {
            return Err(Error::Network("Connection refused".to_string()));
        }
        if let Some(address) = address {
            if state.failing.contains(address) {
                return Err(Error::Api {
                    status: 500,
                    message: format!("Scripted failure for {}", address),
                });
            }
        }
        Ok(state)
    }
}

fn page_of<T: Clone>(items: Option<&Vec<T>>, page: u32, limit: usize) -> Vec<T> {
    let skip = (page.max(1) as usize - 1).saturating_mul(limit);
    items
        .map(|items| items.iter().skip(skip).take(limit).cloned().collect())
        .unwrap_or_default()
}

#[async_trait]
impl ExplorerApi for MockExplorer {
    async fn address_balance(&self, address: &str) -> Result<AddressBalance> {
        let state = self.begin("balance", Some(address))?;
        Ok(state.balances.get(address).copied().unwrap_or_default())
    }

    async fn address_transactions(
        &self,
        address: &str,
        page: u32,
        limit: usize,
    ) -> Result<Vec<Transaction>> {
        let state = self.begin("transactions", Some(address))?;
        Ok(page_of(state.transactions.get(address), page, limit))
    }

    async fn address_mempool_transactions(&self, address: &str) -> Result<Vec<MempoolTransaction>> {
        let state = self.begin("mempool", Some(address))?;
        Ok(state.mempool.get(address).cloned().unwrap_or_default())
    }

    async fn address_tokens(&self, address: &str, page: u32, limit: usize) -> Result<Vec<String>> {
        let state = self.begin("tokens", Some(address))?;
        let ids: Option<Vec<String>> = state
            .tokens
            .get(address)
            .map(|tokens| tokens.iter().map(|(id, _)| id.clone()).collect());
        Ok(page_of(ids.as_ref(), page, limit))
    }

    async fn address_token_balance(
        &self,
        address: &str,
        token_id: &str,
    ) -> Result<AddressBalance> {
        let state = self.begin("token-balance", Some(address))?;
        Ok(state
            .tokens
            .get(address)
            .and_then(|tokens| tokens.iter().find(|(id, _)| id == token_id))
            .map(|(_, balance)| *balance)
            .unwrap_or_default())
    }

    async fn addresses_used(&self, addresses: &[String]) -> Result<Vec<bool>> {
        let state = self.begin("used", None)?;
        let limit = state.used_limit.unwrap_or(addresses.len());
        Ok(addresses
            .iter()
            .take(limit)
            .map(|a| state.used.contains(a))
            .collect())
    }

    async fn infos(&self) -> Result<ExplorerInfo> {
        self.begin("infos", None)?;
        Ok(ExplorerInfo {
            release_version: "mock".to_string(),
        })
    }
}

#[async_trait]
impl NodeApi for MockExplorer {
    async fn submit_transaction(&self, unsigned_tx: &str, signature: &str) -> Result<SubmitResult> {
        let mut state = self.begin("submit", None)?;
        state
            .submitted
            .push((unsigned_tx.to_string(), signature.to_string()));
        Ok(SubmitResult {
            tx_id: format!("tx-{}", state.submitted.len()),
            from_group: 0,
            to_group: 0,
        })
    }
}
