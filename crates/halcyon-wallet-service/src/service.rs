//! Wallet service
//!
//! Every user action takes the same path: validate, write to storage, then
//! dispatch to the state store. Storage failures are dispatched as
//! [`Event::StorageFailed`] (which raises a snackbar) and returned to the
//! caller. Validation errors are returned without touching storage or state.

use crate::apis::{ApiFactory, Apis, HttpApiFactory};
use crate::bridge::{NoopShell, ShellBridge};
use crate::config::AppConfig;
use crate::{Error, Result};
use halcyon_core::models::label_color_for;
use halcyon_core::{
    derive_new_address, generate_mnemonic, is_valid_address, now_millis, Address,
    AddressDeriver, AddressHash, AddressMetadata, AddressSettings, Bip32Deriver, Contact,
    ErrorCategory, GeneralSettings, NetworkSettings, PendingTransaction, PendingTransactionKind,
    Settings, UnlockedWallet, WalletMeta,
};
use halcyon_params::{NetworkPreset, NetworkType};
use halcyon_state::{
    selectors, spawn_store, AppState, ContextSource, Event, NetworkStatus, SessionKey,
    SliceContext, Snackbar, Store, StoreHandle, WalletSession,
};
use halcyon_storage::settings::SETTINGS_KEY;
use halcyon_storage::{KeyValueStore, Storage, StorageProps};
use halcyon_sync::{
    probe_connectivity, reconcile_pending_with, spawn_discovery, Connectivity, DiscoveryRequest,
    ReconcileOptions, SyncOutcome, TransactionsPage,
};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use zeroize::Zeroizing;

type CoreError = halcyon_core::Error;

/// Slice context read from storage on every lifecycle reset
struct StorageContext {
    storage: Arc<Storage>,
    initial_network: NetworkSettings,
}

impl StorageContext {
    fn settings(&self) -> Settings {
        let saved = matches!(self.storage.kv.get(SETTINGS_KEY), Ok(Some(_)));
        let mut settings = self.storage.settings.load().unwrap_or_else(|e| {
            warn!("Failed to load settings: {}", e);
            Settings::default()
        });
        if !saved {
            settings.network = self.initial_network.clone();
        }
        settings
    }
}

impl ContextSource for StorageContext {
    fn context(&self) -> SliceContext {
        let wallets = self.storage.wallets.list().unwrap_or_else(|e| {
            warn!("Failed to list wallets: {}", e);
            Vec::new()
        });
        SliceContext {
            wallets,
            settings: self.settings(),
        }
    }
}

/// Unlocked wallet and the session key its events carry
struct ActiveWallet {
    wallet: UnlockedWallet,
    key: SessionKey,
}

/// Transaction signed elsewhere, ready for broadcast
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    /// Unsigned transaction, hex
    pub unsigned_tx: String,
    /// Signature, hex
    pub signature: String,
    /// Sending address
    pub from_address: AddressHash,
    /// Receiving address
    pub to_address: AddressHash,
    /// Amount in base units
    pub amount: u128,
    /// Kind of transaction
    pub kind: PendingTransactionKind,
}

/// Builder for [`WalletService`]
pub struct ServiceBuilder {
    storage: Storage,
    initial_network: NetworkSettings,
    api_factory: Arc<dyn ApiFactory>,
    deriver: Arc<dyn AddressDeriver>,
    shell: Arc<dyn ShellBridge>,
    reconcile: ReconcileOptions,
}

impl ServiceBuilder {
    /// Builder over `storage` with HTTP clients and the BIP32 deriver
    pub fn new(storage: Storage) -> Self {
        Self {
            storage,
            initial_network: NetworkSettings::default(),
            api_factory: Arc::new(HttpApiFactory),
            deriver: Arc::new(Bip32Deriver),
            shell: Arc::new(NoopShell),
            reconcile: ReconcileOptions::default(),
        }
    }

    /// Network used until the user saves network settings
    pub fn initial_network(mut self, settings: NetworkSettings) -> Self {
        self.initial_network = settings;
        self
    }

    /// Client factory
    pub fn api_factory(mut self, factory: Arc<dyn ApiFactory>) -> Self {
        self.api_factory = factory;
        self
    }

    /// Address deriver
    pub fn deriver(mut self, deriver: Arc<dyn AddressDeriver>) -> Self {
        self.deriver = deriver;
        self
    }

    /// Desktop shell
    pub fn shell(mut self, shell: Arc<dyn ShellBridge>) -> Self {
        self.shell = shell;
        self
    }

    /// Pending transaction reconciliation
    pub fn reconcile_options(mut self, options: ReconcileOptions) -> Self {
        self.reconcile = options;
        self
    }

    /// Start the store task and connect the clients. Needs a tokio runtime.
    pub fn build(self) -> Result<WalletService> {
        let storage = Arc::new(self.storage);
        let context = Arc::new(StorageContext {
            storage: storage.clone(),
            initial_network: self.initial_network,
        });
        let network = context.settings().network;
        let apis = self.api_factory.connect(&network)?;
        let (store, store_task) = spawn_store(Store::new(context));

        Ok(WalletService {
            storage,
            store,
            store_task,
            api_factory: self.api_factory,
            apis: RwLock::new(apis),
            deriver: self.deriver,
            shell: self.shell,
            session: RwLock::new(None),
            generation: AtomicU64::new(0),
            reconcile: self.reconcile,
        })
    }
}

/// Orchestrates storage, state and the explorer for the UI
pub struct WalletService {
    storage: Arc<Storage>,
    store: StoreHandle,
    store_task: JoinHandle<Store>,
    api_factory: Arc<dyn ApiFactory>,
    apis: RwLock<Apis>,
    deriver: Arc<dyn AddressDeriver>,
    shell: Arc<dyn ShellBridge>,
    session: RwLock<Option<ActiveWallet>>,
    generation: AtomicU64,
    reconcile: ReconcileOptions,
}

impl WalletService {
    /// Service for `config` with HTTP clients. Needs a tokio runtime.
    pub fn open(config: &AppConfig) -> Result<Self> {
        ServiceBuilder::new(config.open_storage()?)
            .initial_network(config.initial_network_settings())
            .reconcile_options(ReconcileOptions {
                stale_after_ms: config.pending_stale_after_ms,
            })
            .build()
    }

    /// Latest state snapshot
    pub fn state(&self) -> Arc<AppState> {
        self.store.snapshot()
    }

    /// Receiver notified on every state change
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.store.subscribe()
    }

    /// Storage backing this service
    pub fn storage(&self) -> &Storage {
        &self.storage
    }

    /// Stop the store task
    pub async fn shutdown(self) -> Result<()> {
        let WalletService {
            store, store_task, ..
        } = self;
        drop(store);
        store_task
            .await
            .map_err(|_| Error::State(halcyon_state::Error::StoreClosed))?;
        Ok(())
    }

    // =========================================================================
    // Wallets
    // =========================================================================

    /// Create a wallet with a fresh 24-word mnemonic and unlock it
    pub async fn create_wallet(
        &self,
        name: &str,
        password: &str,
    ) -> Result<(WalletMeta, Zeroizing<String>)> {
        let mnemonic = Zeroizing::new(generate_mnemonic(Some(24))?);
        let meta = self.import_wallet(name, password, &mnemonic).await?;
        Ok((meta, mnemonic))
    }

    /// Store a wallet from an existing mnemonic and unlock it
    pub async fn import_wallet(
        &self,
        name: &str,
        password: &str,
        mnemonic: &str,
    ) -> Result<WalletMeta> {
        let meta = self
            .checked(self.storage.wallets.store(name, password, mnemonic))
            .await?;
        self.store
            .dispatch(Event::WalletSaved {
                wallet: meta.clone(),
            })
            .await?;
        self.unlock_wallet(&meta.id, password, None).await
    }

    /// Decrypt a wallet and make it active. Replaces (switches from) any
    /// wallet already unlocked.
    pub async fn unlock_wallet(
        &self,
        id: &str,
        password: &str,
        passphrase: Option<String>,
    ) -> Result<WalletMeta> {
        let loaded = self.checked(self.storage.wallets.load(id, password)).await?;
        let meta = self.checked(self.storage.wallets.update_last_used(id)).await?;
        let mut wallet = loaded.with_passphrase(passphrase);
        wallet.meta = meta.clone();

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let session = self
            .checked(self.load_session(&wallet, generation))
            .await?;
        self.checked(self.storage.settings.set_active_wallet_id(Some(id)))
            .await?;

        let switching = self
            .session
            .read()
            .as_ref()
            .is_some_and(|active| active.wallet.id().as_str() != id);
        *self.session.write() = Some(ActiveWallet {
            wallet,
            key: session.key(),
        });

        let event = if switching {
            Event::WalletSwitched(session)
        } else {
            Event::WalletUnlocked(session)
        };
        self.store.dispatch(event).await?;
        info!("Unlocked wallet {}", id);

        self.probe_network().await?;
        Ok(meta)
    }

    /// Unlock another wallet in place of the active one
    pub async fn switch_wallet(
        &self,
        id: &str,
        password: &str,
        passphrase: Option<String>,
    ) -> Result<WalletMeta> {
        self.active_session()?;
        self.unlock_wallet(id, password, passphrase).await
    }

    /// Forget the unlocked wallet
    pub async fn lock_wallet(&self) -> Result<()> {
        let previous = self.session.write().take();
        if let Some(active) = previous {
            self.store.dispatch(Event::WalletLocked).await?;
            info!("Locked wallet {}", active.wallet.id());
        }
        Ok(())
    }

    /// Stored wallets, most recently used first
    pub async fn list_wallets(&self) -> Result<Vec<WalletMeta>> {
        let wallets = self.checked(self.storage.wallets.list()).await?;
        self.store
            .dispatch(Event::WalletsListed {
                wallets: wallets.clone(),
            })
            .await?;
        Ok(wallets)
    }

    /// Rename a stored wallet
    pub async fn rename_wallet(&self, id: &str, name: &str) -> Result<WalletMeta> {
        let meta = self.checked(self.storage.wallets.rename(id, name)).await?;
        self.store
            .dispatch(Event::WalletSaved {
                wallet: meta.clone(),
            })
            .await?;
        Ok(meta)
    }

    /// Re-encrypt a wallet under a new password
    pub async fn change_password(&self, id: &str, old: &str, new: &str) -> Result<()> {
        self.checked(self.storage.wallets.update_password(id, old, new))
            .await?;
        self.notify(Snackbar::success("Password changed")).await
    }

    /// Delete the active wallet and all its data
    pub async fn delete_active_wallet(&self) -> Result<()> {
        let wallet_id = self.active_session()?.wallet_id;
        self.checked(self.storage.delete_wallet(&wallet_id)).await?;
        self.session.write().take();
        self.store
            .dispatch(Event::ActiveWalletDeleted {
                wallet_id: wallet_id.clone(),
            })
            .await?;
        info!("Deleted wallet {}", wallet_id);
        self.notify(Snackbar::success("Wallet deleted")).await
    }

    // =========================================================================
    // Addresses
    // =========================================================================

    /// Derive the next unused address, optionally in a group
    pub async fn generate_address(&self, group: Option<u32>) -> Result<Address> {
        let session = self.active_session()?;
        let used = self.known_indexes();

        let address = self
            .persist(|wallet| {
                let seed = wallet.seed()?;
                let derived = derive_new_address(self.deriver.as_ref(), &seed, group, &used)?;
                let settings = new_address_settings(derived.index, false);
                self.storage.address_metadata.store_one(
                    &StorageProps::from_wallet(wallet),
                    AddressMetadata::new(derived.index, settings.clone()),
                )?;
                Ok(Address::new(&derived, &settings))
            })
            .await?;

        self.store
            .dispatch(Event::AddressesAdded {
                session,
                addresses: vec![address.clone()],
            })
            .await?;
        Ok(address)
    }

    /// Scan for used addresses the wallet does not hold yet. Runs on the
    /// discovery worker thread.
    pub async fn discover_addresses(&self) -> Result<Vec<Address>> {
        let session = self.active_session()?;
        let seed = {
            let guard = self.session.read();
            guard
                .as_ref()
                .ok_or(CoreError::NoActiveWallet)?
                .wallet
                .seed()?
        };
        let explorer = self.apis.read().explorer.clone();

        let receiver = spawn_discovery(
            explorer,
            self.deriver.clone(),
            DiscoveryRequest::new(seed, self.known_indexes()),
        )?;
        let found = receiver
            .await
            .map_err(|_| halcyon_sync::Error::Worker("Discovery worker stopped".to_string()))??;

        let addresses: Option<Vec<Address>> = self
            .persist_in(&session, |wallet| {
                let entries: Vec<(AddressMetadata, Address)> = found
                    .iter()
                    .map(|derived| {
                        let settings = new_address_settings(derived.index, false);
                        (
                            AddressMetadata::new(derived.index, settings.clone()),
                            Address::new(derived, &settings),
                        )
                    })
                    .collect();
                if !entries.is_empty() {
                    self.storage.address_metadata.store_many(
                        &StorageProps::from_wallet(wallet),
                        entries.iter().map(|(m, _)| m.clone()).collect(),
                    )?;
                }
                Ok(entries.into_iter().map(|(_, address)| address).collect())
            })
            .await?;
        let Some(addresses) = addresses else {
            debug!("Session changed during discovery, dropping results");
            return Ok(Vec::new());
        };

        if addresses.is_empty() {
            self.notify(Snackbar::info("No new addresses found")).await?;
            return Ok(addresses);
        }
        self.store
            .dispatch(Event::AddressesAdded {
                session,
                addresses: addresses.clone(),
            })
            .await?;
        self.notify(Snackbar::success(format!(
            "Found {} new address{}",
            addresses.len(),
            if addresses.len() == 1 { "" } else { "es" }
        )))
        .await?;
        Ok(addresses)
    }

    /// Save label, color and default flag of an address
    pub async fn update_address_settings(
        &self,
        hash: &str,
        settings: AddressSettings,
    ) -> Result<()> {
        let session = self.active_session()?;
        let state = self.store.snapshot();
        let address = selectors::address_by_hash(&state, hash)
            .ok_or_else(|| Error::UnknownAddress(hash.to_string()))?;
        if address.is_default && !settings.is_default {
            return Err(CoreError::Validation(
                "Pick another default address instead of clearing this one".to_string(),
            )
            .into());
        }
        let index = address.index;

        self.persist(|wallet| {
            self.storage.address_metadata.update_settings(
                &StorageProps::from_wallet(wallet),
                index,
                settings.clone(),
            )?;
            Ok(())
        })
        .await?;

        self.store
            .dispatch(Event::AddressSettingsSaved {
                session,
                hash: hash.to_string(),
                settings,
            })
            .await?;
        Ok(())
    }

    // =========================================================================
    // Contacts
    // =========================================================================

    /// Create or edit a contact
    pub async fn save_contact(&self, contact: Contact) -> Result<Contact> {
        let session = self.active_session()?;
        let stored = self
            .persist(|wallet| {
                self.storage
                    .contacts
                    .store_one(&StorageProps::from_wallet(wallet), contact)
            })
            .await?;
        self.store
            .dispatch(Event::ContactStored {
                session,
                contact: stored.clone(),
            })
            .await?;
        Ok(stored)
    }

    /// Remove a contact
    pub async fn delete_contact(&self, contact_id: &str) -> Result<()> {
        let session = self.active_session()?;
        self.persist(|wallet| {
            self.storage
                .contacts
                .delete_one(&StorageProps::from_wallet(wallet), contact_id)
        })
        .await?;
        self.store
            .dispatch(Event::ContactDeleted {
                session,
                contact_id: contact_id.to_string(),
            })
            .await?;
        Ok(())
    }

    // =========================================================================
    // Sync
    // =========================================================================

    /// Refresh every address and reconcile pending transactions. Failed
    /// addresses are reported in the outcome; there is no automatic retry.
    pub async fn sync_addresses(&self) -> Result<SyncOutcome> {
        let session = self.active_session()?;
        let hashes: Vec<AddressHash> = self.store.snapshot().addresses.entries.keys().cloned().collect();

        self.store
            .dispatch(Event::SyncStarted {
                session: session.clone(),
            })
            .await?;
        let explorer = self.apis.read().explorer.clone();
        let outcome = halcyon_sync::sync_addresses(explorer.as_ref(), &hashes).await;

        self.store
            .dispatch(Event::AddressesDataSynced {
                session: session.clone(),
                data: outcome.synced.clone(),
            })
            .await?;
        if !outcome.failures.is_empty() {
            self.store
                .dispatch(Event::SyncFailed {
                    session: session.clone(),
                    failures: outcome.failures.clone(),
                })
                .await?;
        }

        if outcome.synced.is_empty() && !hashes.is_empty() {
            self.probe_network().await?;
            return Ok(outcome);
        }
        self.reconcile_pending(&session, &outcome).await?;
        Ok(outcome)
    }

    async fn reconcile_pending(&self, session: &SessionKey, outcome: &SyncOutcome) -> Result<()> {
        let pending = self
            .store
            .snapshot()
            .pending_transactions
            .transactions
            .clone();
        if pending.is_empty() {
            return Ok(());
        }

        // Expiry only when every address answered
        let options = if outcome.is_complete() {
            self.reconcile
        } else {
            ReconcileOptions::default()
        };
        let reconciled = reconcile_pending_with(
            &pending,
            &outcome.confirmed(),
            &outcome.mempool(),
            options,
            now_millis(),
        );
        if reconciled.dropped.is_empty() {
            return Ok(());
        }

        let removed = self
            .persist_in(session, |wallet| {
                self.storage
                    .pending_transactions
                    .remove(&StorageProps::from_wallet(wallet), &reconciled.dropped)?;
                Ok(())
            })
            .await?;
        if removed.is_none() {
            return Ok(());
        }
        debug!("Reconciled {} pending transactions", reconciled.dropped.len());

        self.store
            .dispatch(Event::PendingTransactionsReconciled {
                session: session.clone(),
                dropped: reconciled.dropped,
            })
            .await?;
        Ok(())
    }

    /// Load the next history page of an address
    pub async fn load_more_transactions(&self, hash: &str) -> Result<Option<TransactionsPage>> {
        self.load_history(hash, false).await
    }

    /// Load every remaining history page of an address
    pub async fn load_all_transactions(&self, hash: &str) -> Result<Option<TransactionsPage>> {
        self.load_history(hash, true).await
    }

    async fn load_history(&self, hash: &str, all: bool) -> Result<Option<TransactionsPage>> {
        let session = self.active_session()?;
        let address = selectors::address_by_hash(&self.store.snapshot(), hash)
            .cloned()
            .ok_or_else(|| Error::UnknownAddress(hash.to_string()))?;
        let explorer = self.apis.read().explorer.clone();

        let page = if all {
            halcyon_sync::load_all_transactions(explorer.as_ref(), &address).await?
        } else {
            halcyon_sync::load_more_transactions(explorer.as_ref(), &address).await?
        };

        if let Some(page) = &page {
            self.store
                .dispatch(Event::AddressTransactionsPageLoaded {
                    session,
                    page: page.clone(),
                })
                .await?;
        }
        Ok(page)
    }

    /// Broadcast a signed transaction and track it as pending
    pub async fn submit_transaction(&self, request: SubmitRequest) -> Result<PendingTransaction> {
        let session = self.active_session()?;
        if !is_valid_address(&request.to_address) {
            return Err(CoreError::InvalidAddress(request.to_address).into());
        }

        let node = self.apis.read().node.clone();
        let submitted = match node
            .submit_transaction(&request.unsigned_tx, &request.signature)
            .await
        {
            Ok(result) => result,
            Err(e) => {
                let err = CoreError::BroadcastFailed(e.to_string());
                self.notify(Snackbar::alert(err.user_message())).await?;
                return Err(err.into());
            }
        };

        let pending = PendingTransaction {
            hash: submitted.tx_id,
            from_address: request.from_address,
            to_address: request.to_address,
            amount: request.amount,
            timestamp: now_millis(),
            kind: request.kind,
        };
        self.persist(|wallet| {
            self.storage
                .pending_transactions
                .store_one(&StorageProps::from_wallet(wallet), pending.clone())?;
            Ok(())
        })
        .await?;

        self.store
            .dispatch(Event::PendingTransactionAdded {
                session,
                transaction: pending.clone(),
            })
            .await?;
        self.notify(Snackbar::success("Transaction sent")).await?;
        Ok(pending)
    }

    // =========================================================================
    // Settings and network
    // =========================================================================

    /// Save general settings
    pub async fn update_general_settings(&self, general: GeneralSettings) -> Result<Settings> {
        let mut settings = self.store.snapshot().settings.settings.clone();
        settings.general = general.clone();
        self.checked(self.storage.settings.store(&settings)).await?;

        let theme = general.theme;
        self.store
            .dispatch(Event::GeneralSettingsChanged(general))
            .await?;
        self.shell.set_native_theme(theme);
        Ok(settings)
    }

    /// Save network settings, reconnect and probe
    pub async fn update_network_settings(
        &self,
        network: NetworkSettings,
    ) -> Result<NetworkStatus> {
        let apis = self.api_factory.connect(&network)?;
        let mut settings = self.store.snapshot().settings.settings.clone();
        settings.network = network.clone();
        self.checked(self.storage.settings.store(&settings)).await?;

        *self.apis.write() = apis;
        self.store
            .dispatch(Event::NetworkSettingsChanged(network))
            .await?;
        self.probe_network().await
    }

    /// Switch network settings to a preset
    pub async fn reset_network(&self, network: NetworkType) -> Result<NetworkStatus> {
        self.update_network_settings(NetworkSettings::from_preset(&NetworkPreset::for_type(
            network,
        )))
        .await
    }

    /// Probe the explorer once
    pub async fn probe_network(&self) -> Result<NetworkStatus> {
        self.store.dispatch(Event::NetworkConnecting).await?;
        let explorer = self.apis.read().explorer.clone();
        let event = match probe_connectivity(explorer.as_ref()).await {
            Connectivity::Online { version } => Event::NetworkOnline { version },
            Connectivity::Offline { reason } => Event::NetworkOffline { reason },
        };
        self.store.dispatch(event).await?;
        Ok(self.store.snapshot().network.status)
    }

    /// Newer release offered by the shell
    pub fn check_for_update(&self) -> Option<String> {
        self.shell.check_for_update()
    }

    /// Dismiss the oldest notification
    pub async fn dismiss_snackbar(&self) -> Result<()> {
        self.store.dispatch(Event::SnackbarDismissed).await?;
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    fn active_session(&self) -> Result<SessionKey> {
        self.session
            .read()
            .as_ref()
            .map(|active| active.key.clone())
            .ok_or_else(|| CoreError::NoActiveWallet.into())
    }

    fn known_indexes(&self) -> Vec<u32> {
        self.store
            .snapshot()
            .addresses
            .entries
            .values()
            .map(|address| address.index)
            .collect()
    }

    fn load_session(
        &self,
        wallet: &UnlockedWallet,
        generation: u64,
    ) -> halcyon_storage::Result<WalletSession> {
        let props = StorageProps::from_wallet(wallet);
        let seed = wallet.seed()?;

        let mut metadata = self.storage.address_metadata.load(&props)?;
        if metadata.is_empty() {
            let first = derive_new_address(self.deriver.as_ref(), &seed, None, &[])?;
            let entry = AddressMetadata::new(first.index, new_address_settings(first.index, true));
            self.storage.address_metadata.store_one(&props, entry.clone())?;
            metadata.push(entry);
        }
        if !metadata.iter().any(|m| m.is_default) {
            if let Some(first) = metadata.first_mut() {
                first.is_default = true;
            }
        }

        let addresses = metadata
            .iter()
            .map(|entry| {
                let derived = self.deriver.derive(&seed, entry.index)?;
                Ok(Address::new(&derived, &entry.settings()))
            })
            .collect::<halcyon_core::Result<Vec<_>>>()?;

        Ok(WalletSession {
            wallet: wallet.meta.clone(),
            generation,
            passphrase_used: wallet.is_passphrase_used(),
            addresses,
            contacts: self.storage.contacts.load(&props)?,
            pending: self.storage.pending_transactions.load(&props)?,
        })
    }

    /// Run a storage write against the unlocked wallet
    async fn persist<R, F>(&self, write: F) -> Result<R>
    where
        F: FnOnce(&UnlockedWallet) -> halcyon_storage::Result<R>,
    {
        let result = {
            let guard = self.session.read();
            let active = guard.as_ref().ok_or(CoreError::NoActiveWallet)?;
            write(&active.wallet)
        };
        self.checked(result).await
    }

    /// Like [`Self::persist`], but only while `session` is still active.
    /// `None` when another unlock replaced it.
    async fn persist_in<R, F>(&self, session: &SessionKey, write: F) -> Result<Option<R>>
    where
        F: FnOnce(&UnlockedWallet) -> halcyon_storage::Result<R>,
    {
        let result = {
            let guard = self.session.read();
            match guard.as_ref() {
                Some(active) if &active.key == session => write(&active.wallet).map(Some),
                _ => Ok(None),
            }
        };
        self.checked(result).await
    }

    /// Report storage failures to the store
    async fn checked<T>(&self, result: halcyon_storage::Result<T>) -> Result<T> {
        match result {
            Ok(value) => Ok(value),
            Err(e) => {
                let err = CoreError::from(e);
                if matches!(
                    err.category(),
                    ErrorCategory::Storage | ErrorCategory::Internal
                ) {
                    warn!("Storage failure: {}", err);
                    self.store
                        .dispatch(Event::StorageFailed {
                            message: err.user_message(),
                        })
                        .await?;
                }
                Err(err.into())
            }
        }
    }

    async fn notify(&self, snackbar: Snackbar) -> Result<()> {
        self.store.dispatch(Event::SnackbarMessage(snackbar)).await?;
        Ok(())
    }
}

fn new_address_settings(index: u32, is_default: bool) -> AddressSettings {
    AddressSettings {
        label: None,
        color: label_color_for(index).to_string(),
        is_default,
    }
}
