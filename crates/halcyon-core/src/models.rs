//! Domain models
//!
//! JSON field names are camelCase so persisted blobs and explorer payloads
//! share one representation. Amounts travel as decimal strings because
//! base-unit values exceed the range of JSON numbers.

use crate::keys::DerivedAddress;
use serde::{Deserialize, Serialize};

/// Wallet identifier (UUID string)
pub type WalletId = String;

/// Address string (base58)
pub type AddressHash = String;

/// Palette used for new address labels
pub const LABEL_COLORS: [&str; 8] = [
    "#3B82F6", "#10B981", "#F59E0B", "#EF4444", "#8B5CF6", "#EC4899", "#14B8A6", "#F97316",
];

/// Label color assigned to a freshly derived address
pub fn label_color_for(index: u32) -> &'static str {
    LABEL_COLORS[index as usize % LABEL_COLORS.len()]
}

/// Serde helpers for `u128` amounts encoded as decimal strings
pub mod amount_string {
    use serde::{de::Error as _, Deserialize, Deserializer, Serializer};

    /// Serialize as string
    pub fn serialize<S: Serializer>(value: &u128, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_string())
    }

    /// Deserialize from string
    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u128, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(D::Error::custom)
    }
}

/// Current time in milliseconds since epoch
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// Wallet listing entry (no secret material)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletMeta {
    /// Wallet ID
    pub id: WalletId,
    /// Display name
    pub name: String,
    /// Last unlock, milliseconds since epoch
    pub last_used: i64,
}

impl WalletMeta {
    /// New listing entry used now
    pub fn new(id: WalletId, name: String) -> Self {
        Self {
            id,
            name,
            last_used: now_millis(),
        }
    }
}

/// User-editable projection of an address
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressSettings {
    /// Optional label
    #[serde(default)]
    pub label: Option<String>,
    /// Label color (hex)
    pub color: String,
    /// Default address flag
    #[serde(default)]
    pub is_default: bool,
}

/// Persisted address metadata, keyed by derivation index
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressMetadata {
    /// Derivation index
    pub index: u32,
    /// Optional label
    #[serde(default)]
    pub label: Option<String>,
    /// Label color (hex)
    pub color: String,
    /// Default address flag
    #[serde(default)]
    pub is_default: bool,
}

impl AddressMetadata {
    /// Metadata for `index` carrying `settings`
    pub fn new(index: u32, settings: AddressSettings) -> Self {
        Self {
            index,
            label: settings.label,
            color: settings.color,
            is_default: settings.is_default,
        }
    }

    /// Settings part of the metadata
    pub fn settings(&self) -> AddressSettings {
        AddressSettings {
            label: self.label.clone(),
            color: self.color.clone(),
            is_default: self.is_default,
        }
    }
}

/// Token holding of an address
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBalance {
    /// Token ID (hex)
    pub id: String,
    /// Total balance
    #[serde(with = "amount_string")]
    pub balance: u128,
    /// Locked part of the balance
    #[serde(with = "amount_string")]
    pub locked_balance: u128,
}

/// Address with its synced explorer data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    /// Address string
    pub hash: AddressHash,
    /// Derivation index
    pub index: u32,
    /// Compressed public key, hex
    pub public_key: String,
    /// Group
    pub group: u32,
    /// Optional label
    pub label: Option<String>,
    /// Label color (hex)
    pub color: String,
    /// Default address flag
    pub is_default: bool,
    /// Available balance
    #[serde(with = "amount_string")]
    pub balance: u128,
    /// Locked balance
    #[serde(with = "amount_string")]
    pub locked_balance: u128,
    /// Token balances
    pub tokens: Vec<TokenBalance>,
    /// Hashes of confirmed transactions loaded so far, newest first
    pub transactions: Vec<String>,
    /// Every transaction page has been fetched
    pub all_transactions_loaded: bool,
    /// Last transaction page fetched (0 = none)
    pub transactions_page_loaded: u32,
    /// Timestamp of the most recent transaction, milliseconds
    pub last_used: i64,
}

impl Address {
    /// Build an address from derivation data and its persisted metadata
    pub fn new(derived: &DerivedAddress, settings: &AddressSettings) -> Self {
        Self {
            hash: derived.hash.clone(),
            index: derived.index,
            public_key: derived.public_key.clone(),
            group: derived.group,
            label: settings.label.clone(),
            color: settings.color.clone(),
            is_default: settings.is_default,
            balance: 0,
            locked_balance: 0,
            tokens: Vec::new(),
            transactions: Vec::new(),
            all_transactions_loaded: false,
            transactions_page_loaded: 0,
            last_used: 0,
        }
    }

    /// Persisted projection of this address
    pub fn metadata(&self) -> AddressMetadata {
        AddressMetadata {
            index: self.index,
            label: self.label.clone(),
            color: self.color.clone(),
            is_default: self.is_default,
        }
    }

    /// Apply user-edited settings
    pub fn apply_settings(&mut self, settings: &AddressSettings) {
        self.label = settings.label.clone();
        self.color = settings.color.clone();
        self.is_default = settings.is_default;
    }
}

/// Transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxInput {
    /// Spending address
    pub address: Option<AddressHash>,
    /// Spent amount
    #[serde(with = "amount_string")]
    pub amount: u128,
}

/// Transaction output
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TxOutput {
    /// Receiving address
    pub address: AddressHash,
    /// Received amount
    #[serde(with = "amount_string")]
    pub amount: u128,
}

/// Confirmed transaction (immutable)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    /// Transaction hash
    pub hash: String,
    /// Containing block
    pub block_hash: String,
    /// Block timestamp, milliseconds
    pub timestamp: i64,
    /// Inputs
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    /// Outputs
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
    /// Gas amount
    pub gas_amount: u64,
    /// Gas price
    #[serde(with = "amount_string")]
    pub gas_price: u128,
}

impl Transaction {
    /// Net amount moved into (positive) or out of (negative) `address`
    pub fn amount_delta_for(&self, address: &str) -> i128 {
        let received: u128 = self
            .outputs
            .iter()
            .filter(|o| o.address == address)
            .map(|o| o.amount)
            .sum();
        let spent: u128 = self
            .inputs
            .iter()
            .filter(|i| i.address.as_deref() == Some(address))
            .map(|i| i.amount)
            .sum();
        (received as i128).saturating_sub(spent as i128)
    }

    /// Whether `address` takes part in the transaction
    pub fn involves(&self, address: &str) -> bool {
        self.outputs.iter().any(|o| o.address == address)
            || self.inputs.iter().any(|i| i.address.as_deref() == Some(address))
    }
}

/// Merge freshly fetched transactions into a list, skipping hashes already
/// present. The result is ordered newest first. Returns how many were added.
pub fn merge_transactions(existing: &mut Vec<Transaction>, incoming: Vec<Transaction>) -> usize {
    let before = existing.len();
    for tx in incoming {
        if !existing.iter().any(|t| t.hash == tx.hash) {
            existing.push(tx);
        }
    }
    existing.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
    existing.len() - before
}

/// Transaction seen in the mempool
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MempoolTransaction {
    /// Transaction hash
    pub hash: String,
    /// When the node first saw it, milliseconds
    pub last_seen: i64,
    /// Inputs
    #[serde(default)]
    pub inputs: Vec<TxInput>,
    /// Outputs
    #[serde(default)]
    pub outputs: Vec<TxOutput>,
}

/// What a pending transaction does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PendingTransactionKind {
    /// Plain transfer
    Transfer,
    /// Consolidation of an address's UTXOs
    Consolidation,
    /// Sweep of all funds to another address
    Sweep,
    /// Contract call
    Contract,
}

/// Locally tracked transaction believed broadcast but not yet confirmed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingTransaction {
    /// Transaction hash
    pub hash: String,
    /// Sending address
    pub from_address: AddressHash,
    /// Receiving address
    pub to_address: AddressHash,
    /// Amount sent
    #[serde(with = "amount_string")]
    pub amount: u128,
    /// Submission time, milliseconds
    pub timestamp: i64,
    /// Kind
    pub kind: PendingTransactionKind,
}

/// Address book entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    /// Contact ID, assigned on first store
    #[serde(default)]
    pub id: String,
    /// Display name
    pub name: String,
    /// Address
    pub address: AddressHash,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tx(hash: &str, timestamp: i64) -> Transaction {
        Transaction {
            hash: hash.to_string(),
            block_hash: "block".to_string(),
            timestamp,
            inputs: vec![TxInput {
                address: Some("alice".to_string()),
                amount: 150,
            }],
            outputs: vec![
                TxOutput {
                    address: "bob".to_string(),
                    amount: 100,
                },
                TxOutput {
                    address: "alice".to_string(),
                    amount: 40,
                },
            ],
            gas_amount: 20_000,
            gas_price: 100,
        }
    }

    #[test]
    fn test_amount_delta() {
        let t = tx("a", 1);
        assert_eq!(t.amount_delta_for("alice"), -110);
        assert_eq!(t.amount_delta_for("bob"), 100);
        assert_eq!(t.amount_delta_for("carol"), 0);
        assert!(t.involves("bob"));
        assert!(!t.involves("carol"));
    }

    #[test]
    fn test_merge_transactions_dedupes_and_orders() {
        let mut list = vec![tx("a", 10), tx("b", 5)];
        let added = merge_transactions(&mut list, vec![tx("b", 5), tx("c", 20)]);
        assert_eq!(added, 1);
        let hashes: Vec<_> = list.iter().map(|t| t.hash.as_str()).collect();
        assert_eq!(hashes, vec!["c", "a", "b"]);
    }

    #[test]
    fn test_amounts_serialize_as_strings() {
        let balance = TokenBalance {
            id: "00".to_string(),
            balance: u128::MAX,
            locked_balance: 0,
        };
        let json = serde_json::to_value(&balance).unwrap();
        assert_eq!(json["balance"], u128::MAX.to_string());
        assert_eq!(json["lockedBalance"], "0");
        let back: TokenBalance = serde_json::from_value(json).unwrap();
        assert_eq!(back, balance);
    }

    #[test]
    fn test_metadata_settings_roundtrip() {
        let settings = AddressSettings {
            label: Some("savings".to_string()),
            color: label_color_for(3).to_string(),
            is_default: true,
        };
        let metadata = AddressMetadata::new(3, settings.clone());
        assert_eq!(metadata.settings(), settings);
    }
}
