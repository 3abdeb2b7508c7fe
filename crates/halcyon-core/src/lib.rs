//! Halcyon wallet core
//!
//! Domain models, error taxonomy, amount formatting and the key/address
//! derivation seam shared by the storage, sync and state crates.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod address;
pub mod amount;
pub mod error;
pub mod keys;
pub mod models;
pub mod settings;
pub mod wallet;

pub use address::{address_from_public_key, address_group, is_valid_address, AddressType};
pub use amount::{
    abbreviate_amount, abbreviate_amount_with, format_full, parse_amount, remove_trailing_zeros,
    AmountFormat,
};
pub use error::{Error, ErrorCategory, Result};
pub use keys::{
    derive_new_address, generate_mnemonic, seed_from_mnemonic, validate_mnemonic, AddressDeriver, Bip32Deriver,
    DerivedAddress, Seed,
};
pub use models::{
    Address, AddressHash, AddressMetadata, AddressSettings, Contact, MempoolTransaction,
    PendingTransaction, PendingTransactionKind, TokenBalance, Transaction, TxInput, TxOutput,
    WalletId, WalletMeta, merge_transactions, now_millis,
};
pub use settings::{GeneralSettings, NetworkSettings, Settings, ThemeMode};
pub use wallet::UnlockedWallet;
