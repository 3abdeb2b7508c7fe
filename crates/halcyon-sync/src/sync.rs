//! Address sync actions
//!
//! A sync pulls, for each address, its balance, the first page of confirmed
//! transactions, the mempool and every token balance. Older history is loaded
//! on demand through the per-address page cursor.

use crate::client::ExplorerApi;
use crate::pagination::{fetch_all_pages, fetch_pages_from};
use crate::Result;
use halcyon_core::{Address, AddressHash, MempoolTransaction, TokenBalance, Transaction};
use halcyon_params::PAGE_LIMIT;
use tracing::{debug, info, warn};

/// Fresh explorer data for one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AddressSyncData {
    /// Address
    pub hash: AddressHash,
    /// Available balance
    pub balance: u128,
    /// Locked balance
    pub locked_balance: u128,
    /// Token balances
    pub tokens: Vec<TokenBalance>,
    /// First page of confirmed transactions
    pub transactions: Vec<Transaction>,
    /// Unconfirmed transactions
    pub mempool: Vec<MempoolTransaction>,
    /// The first page was the last one
    pub all_transactions_loaded: bool,
}

/// Result of syncing a set of addresses
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SyncOutcome {
    /// Addresses synced successfully
    pub synced: Vec<AddressSyncData>,
    /// Addresses that failed, with the reason
    pub failures: Vec<(AddressHash, String)>,
}

impl SyncOutcome {
    /// Confirmed transactions across all synced addresses
    pub fn confirmed(&self) -> Vec<Transaction> {
        self.synced
            .iter()
            .flat_map(|data| data.transactions.iter().cloned())
            .collect()
    }

    /// Mempool transactions across all synced addresses
    pub fn mempool(&self) -> Vec<MempoolTransaction> {
        self.synced
            .iter()
            .flat_map(|data| data.mempool.iter().cloned())
            .collect()
    }

    /// No address failed
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// A page of history loaded for one address
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionsPage {
    /// Address
    pub hash: AddressHash,
    /// Last page now loaded
    pub page: u32,
    /// Transactions of the loaded page(s)
    pub transactions: Vec<Transaction>,
    /// No further page exists
    pub all_loaded: bool,
}

/// Sync every address. A failing address is reported in
/// [`SyncOutcome::failures`] and does not stop the others.
pub async fn sync_addresses(api: &dyn ExplorerApi, hashes: &[AddressHash]) -> SyncOutcome {
    let mut outcome = SyncOutcome::default();

    for hash in hashes {
        match sync_address(api, hash).await {
            Ok(data) => outcome.synced.push(data),
            Err(e) => {
                warn!("Failed to sync address {}: {}", hash, e);
                outcome.failures.push((hash.clone(), e.to_string()));
            }
        }
    }

    info!(
        "Synced {} addresses ({} failed)",
        outcome.synced.len(),
        outcome.failures.len()
    );
    outcome
}

/// Sync one address
pub async fn sync_address(api: &dyn ExplorerApi, hash: &str) -> Result<AddressSyncData> {
    let balance = api.address_balance(hash).await?;
    let transactions = api.address_transactions(hash, 1, PAGE_LIMIT).await?;
    let mempool = api.address_mempool_transactions(hash).await?;
    let tokens = sync_tokens(api, hash).await?;

    debug!(
        "Address {}: {} transactions, {} in mempool, {} tokens",
        hash,
        transactions.len(),
        mempool.len(),
        tokens.len()
    );

    Ok(AddressSyncData {
        hash: hash.to_string(),
        balance: balance.balance,
        locked_balance: balance.locked_balance,
        tokens,
        all_transactions_loaded: transactions.len() < PAGE_LIMIT,
        transactions,
        mempool,
    })
}

/// Every token balance of an address
pub async fn sync_tokens(api: &dyn ExplorerApi, hash: &str) -> Result<Vec<TokenBalance>> {
    let token_ids = fetch_all_pages(PAGE_LIMIT, |page| api.address_tokens(hash, page, PAGE_LIMIT))
        .await?
        .items;

    let mut tokens = Vec::with_capacity(token_ids.len());
    for id in token_ids {
        let balance = api.address_token_balance(hash, &id).await?;
        tokens.push(TokenBalance {
            id,
            balance: balance.balance,
            locked_balance: balance.locked_balance,
        });
    }
    Ok(tokens)
}

/// Load the page after the address cursor. `None` when history is complete.
pub async fn load_more_transactions(
    api: &dyn ExplorerApi,
    address: &Address,
) -> Result<Option<TransactionsPage>> {
    if address.all_transactions_loaded {
        return Ok(None);
    }

    let page = address.transactions_page_loaded + 1;
    let transactions = api
        .address_transactions(&address.hash, page, PAGE_LIMIT)
        .await?;
    debug!(
        "Loaded page {} of {} ({} transactions)",
        page,
        address.hash,
        transactions.len()
    );

    Ok(Some(TransactionsPage {
        hash: address.hash.clone(),
        page,
        all_loaded: transactions.len() < PAGE_LIMIT,
        transactions,
    }))
}

/// Load every remaining page. `None` when history is already complete.
pub async fn load_all_transactions(
    api: &dyn ExplorerApi,
    address: &Address,
) -> Result<Option<TransactionsPage>> {
    if address.all_transactions_loaded {
        return Ok(None);
    }

    let paged = fetch_pages_from(address.transactions_page_loaded + 1, PAGE_LIMIT, |page| {
        api.address_transactions(&address.hash, page, PAGE_LIMIT)
    })
    .await?;
    info!(
        "Loaded full history of {} ({} requests)",
        address.hash, paged.requests
    );

    Ok(Some(TransactionsPage {
        hash: address.hash.clone(),
        page: paged.last_page,
        transactions: paged.items,
        all_loaded: true,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::AddressBalance;
    use crate::mock::{transaction, MockExplorer};
    use halcyon_core::{AddressSettings, DerivedAddress};

    fn address(hash: &str) -> Address {
        let derived = DerivedAddress {
            hash: hash.to_string(),
            public_key: String::new(),
            index: 0,
            group: 0,
        };
        Address::new(&derived, &AddressSettings::default())
    }

    fn history(hash: &str, count: usize) -> Vec<Transaction> {
        (0..count)
            .map(|i| transaction(&format!("{}-tx{}", hash, i), hash, 1_000 - i as i64))
            .collect()
    }

    #[tokio::test]
    async fn test_sync_collects_address_data() {
        let api = MockExplorer::new();
        api.set_balance(
            "a1",
            AddressBalance {
                balance: 10,
                locked_balance: 2,
            },
        );
        api.set_transactions("a1", history("a1", 3));
        api.set_tokens(
            "a1",
            vec![(
                "token-1".to_string(),
                AddressBalance {
                    balance: 5,
                    locked_balance: 0,
                },
            )],
        );

        let outcome = sync_addresses(&api, &["a1".to_string()]).await;
        assert!(outcome.is_complete());
        let data = &outcome.synced[0];
        assert_eq!(data.balance, 10);
        assert_eq!(data.locked_balance, 2);
        assert_eq!(data.transactions.len(), 3);
        assert!(data.all_transactions_loaded);
        assert_eq!(data.tokens[0].id, "token-1");
        assert_eq!(data.tokens[0].balance, 5);
    }

    #[tokio::test]
    async fn test_failure_is_isolated() {
        let api = MockExplorer::new();
        api.set_transactions("a2", history("a2", 1));
        api.fail_address("a1");

        let outcome =
            sync_addresses(&api, &["a1".to_string(), "a2".to_string(), "a3".to_string()]).await;
        assert_eq!(outcome.synced.len(), 2);
        assert_eq!(outcome.failures.len(), 1);
        assert_eq!(outcome.failures[0].0, "a1");
        assert_eq!(outcome.confirmed().len(), 1);
    }

    #[tokio::test]
    async fn test_full_first_page_is_not_complete() {
        let api = MockExplorer::new();
        api.set_transactions("a1", history("a1", PAGE_LIMIT));
        let data = sync_address(&api, "a1").await.unwrap();
        assert!(!data.all_transactions_loaded);
    }

    #[tokio::test]
    async fn test_token_pages() {
        let api = MockExplorer::new();
        let tokens = (0..PAGE_LIMIT + 3)
            .map(|i| (format!("token-{}", i), AddressBalance::default()))
            .collect();
        api.set_tokens("a1", tokens);

        let tokens = sync_tokens(&api, "a1").await.unwrap();
        assert_eq!(tokens.len(), PAGE_LIMIT + 3);
        assert_eq!(api.request_count("tokens"), 2);
    }

    #[tokio::test]
    async fn test_load_more_uses_cursor() {
        let api = MockExplorer::new();
        api.set_transactions("a1", history("a1", PAGE_LIMIT + 5));

        let mut addr = address("a1");
        addr.transactions_page_loaded = 1;
        let page = load_more_transactions(&api, &addr).await.unwrap().unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.transactions.len(), 5);
        assert!(page.all_loaded);

        addr.all_transactions_loaded = true;
        assert!(load_more_transactions(&api, &addr).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_load_all_skips_complete_history() {
        let api = MockExplorer::new();
        api.set_transactions("a1", history("a1", PAGE_LIMIT * 2 + 1));

        let mut addr = address("a1");
        addr.transactions_page_loaded = 1;
        let page = load_all_transactions(&api, &addr).await.unwrap().unwrap();
        assert_eq!(page.page, 3);
        assert_eq!(page.transactions.len(), PAGE_LIMIT + 1);
        assert_eq!(api.request_count("transactions"), 2);

        addr.all_transactions_loaded = true;
        assert!(load_all_transactions(&api, &addr).await.unwrap().is_none());
        assert_eq!(api.request_count("transactions"), 2);
    }
}
