//! Error types for Halcyon Core
//!
//! Comprehensive error taxonomy shared by every wallet operation. The four
//! classes a caller has to distinguish are storage decryption/parse failures,
//! network failures, validation failures and invariant violations.

use std::fmt;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Halcyon Core errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Invalid address format
    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    /// Invalid amount
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Amount overflow
    #[error("Amount overflow: {0}")]
    AmountOverflow(String),

    /// Invalid mnemonic
    #[error("Invalid mnemonic: {0}")]
    InvalidMnemonic(String),

    /// Key derivation error
    #[error("Key derivation error: {0}")]
    KeyDerivation(String),

    /// Password does not meet the minimum requirements
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Contact name or address already present in the wallet's contacts
    #[error("Contact already exists: {0}")]
    ContactExists(String),

    /// Generic form validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Operation not permitted while a passphrase wallet is active
    #[error("Not available for passphrase wallets: {0}")]
    PassphraseWallet(String),

    /// Stored data could not be decrypted (wrong key or corrupted blob)
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Encryption error
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Storage backend error
    #[error("Storage error: {0}")]
    Storage(String),

    /// Network error
    #[error("Network error: {0}")]
    Network(String),

    /// Network is down/unavailable
    #[error("Network unavailable: {0}")]
    NetworkDown(String),

    /// Transaction broadcast failed
    #[error("Broadcast failed: {0}")]
    BroadcastFailed(String),

    /// Sync error
    #[error("Sync error: {0}")]
    Sync(String),

    /// Wallet not found
    #[error("Wallet not found: {0}")]
    WalletNotFound(String),

    /// Wallet already exists
    #[error("Wallet already exists: {0}")]
    WalletAlreadyExists(String),

    /// No wallet is unlocked
    #[error("No active wallet")]
    NoActiveWallet,

    /// Invariant violation (aborts the triggering operation)
    #[error("Invariant violated: {0}")]
    Invariant(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Check if error is a user-facing error (vs internal error)
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            Error::InvalidAddress(_)
                | Error::InvalidAmount(_)
                | Error::InvalidMnemonic(_)
                | Error::WeakPassword(_)
                | Error::ContactExists(_)
                | Error::Validation(_)
                | Error::PassphraseWallet(_)
                | Error::Decryption(_)
                | Error::NetworkDown(_)
                | Error::BroadcastFailed(_)
        )
    }

    /// Get user-friendly error message
    pub fn user_message(&self) -> String {
        match self {
            Error::InvalidAddress(_) => {
                "The address is invalid. Please check and try again.".to_string()
            }
            Error::InvalidAmount(_) => {
                "The amount is invalid. Please enter a valid amount.".to_string()
            }
            Error::InvalidMnemonic(_) => {
                "The secret recovery phrase is invalid. Please check and try again.".to_string()
            }
            Error::WeakPassword(reason) => format!("Password is too weak: {}", reason),
            Error::ContactExists(reason) => format!("A contact with this {} already exists", reason),
            Error::PassphraseWallet(_) => {
                "This action is not available while a passphrase wallet is unlocked.".to_string()
            }
            Error::Decryption(_) => {
                "Could not decrypt stored data. The password may be wrong or the data corrupted."
                    .to_string()
            }
            Error::NetworkDown(_) => {
                "Unable to connect to the network. Please check your connection and try again."
                    .to_string()
            }
            Error::BroadcastFailed(_) => {
                "Failed to send the transaction. Please try again.".to_string()
            }
            _ => self.to_string(),
        }
    }

    /// Get error category for logging
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::InvalidAmount(_) | Error::AmountOverflow(_) => ErrorCategory::Amount,
            Error::InvalidAddress(_) => ErrorCategory::Address,
            Error::InvalidMnemonic(_) | Error::KeyDerivation(_) => ErrorCategory::Keys,
            Error::WeakPassword(_)
            | Error::ContactExists(_)
            | Error::Validation(_)
            | Error::PassphraseWallet(_) => ErrorCategory::Validation,
            Error::Decryption(_) | Error::Encryption(_) | Error::Storage(_) => {
                ErrorCategory::Storage
            }
            Error::Network(_) | Error::NetworkDown(_) | Error::BroadcastFailed(_) => {
                ErrorCategory::Network
            }
            Error::Sync(_) => ErrorCategory::Sync,
            Error::WalletNotFound(_)
            | Error::WalletAlreadyExists(_)
            | Error::NoActiveWallet
            | Error::Invariant(_) => ErrorCategory::Wallet,
            Error::Io(_) | Error::Serialization(_) | Error::Other(_) => ErrorCategory::Internal,
        }
    }
}

/// Error categories for classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Amount-related errors
    Amount,
    /// Address-related errors
    Address,
    /// Key-related errors
    Keys,
    /// Form validation errors (caught before any storage mutation)
    Validation,
    /// Local storage errors
    Storage,
    /// Network-related errors
    Network,
    /// Sync-related errors
    Sync,
    /// Wallet lifecycle errors
    Wallet,
    /// Internal/system errors
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Amount => write!(f, "Amount"),
            ErrorCategory::Address => write!(f, "Address"),
            ErrorCategory::Keys => write!(f, "Keys"),
            ErrorCategory::Validation => write!(f, "Validation"),
            ErrorCategory::Storage => write!(f, "Storage"),
            ErrorCategory::Network => write!(f, "Network"),
            ErrorCategory::Sync => write!(f, "Sync"),
            ErrorCategory::Wallet => write!(f, "Wallet"),
            ErrorCategory::Internal => write!(f, "Internal"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_error_detection() {
        assert!(Error::ContactExists("name".to_string()).is_user_error());
        assert!(Error::InvalidAddress("test".to_string()).is_user_error());
        assert!(!Error::Network("test".to_string()).is_user_error());
        assert!(!Error::Invariant("test".to_string()).is_user_error());
    }

    #[test]
    fn test_user_messages() {
        let msg = Error::ContactExists("name".to_string()).user_message();
        assert!(msg.contains("already exists"));

        let msg = Error::Decryption("aead".to_string()).user_message();
        assert!(msg.contains("password may be wrong"));
    }

    #[test]
    fn test_error_categories() {
        assert_eq!(
            Error::InvalidAmount("test".to_string()).category(),
            ErrorCategory::Amount
        );
        assert_eq!(
            Error::Decryption("test".to_string()).category(),
            ErrorCategory::Storage
        );
        assert_eq!(
            Error::WeakPassword("test".to_string()).category(),
            ErrorCategory::Validation
        );
        assert_eq!(Error::NoActiveWallet.category(), ErrorCategory::Wallet);
    }

    #[test]
    fn test_category_display() {
        assert_eq!(ErrorCategory::Storage.to_string(), "Storage");
        assert_eq!(ErrorCategory::Network.to_string(), "Network");
    }
}
