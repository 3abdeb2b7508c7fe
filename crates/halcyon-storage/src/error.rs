//! Error types

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Encryption error
    #[error("Encryption error: {0}")]
    Encryption(String),

    /// Stored blob could not be decrypted or parsed
    #[error("Decryption error: {0}")]
    Decryption(String),

    /// Not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Password below the minimum requirements
    #[error("Weak password: {0}")]
    WeakPassword(String),

    /// Duplicate contact name or address
    #[error("Contact already exists: {0}")]
    ContactExists(String),

    /// Write refused while a passphrase wallet is active
    #[error("Not available for passphrase wallets: {0}")]
    PassphraseWallet(String),

    /// Core error (mnemonic or derivation)
    #[error(transparent)]
    Core(#[from] halcyon_core::Error),

    /// Storage error (generic)
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

impl From<Error> for halcyon_core::Error {
    fn from(err: Error) -> Self {
        use halcyon_core::Error as CoreError;
        match err {
            Error::Decryption(msg) => CoreError::Decryption(msg),
            Error::Encryption(msg) => CoreError::Encryption(msg),
            Error::NotFound(msg) => CoreError::WalletNotFound(msg),
            Error::Serialization(e) => CoreError::Decryption(e.to_string()),
            Error::Validation(msg) => CoreError::Validation(msg),
            Error::WeakPassword(msg) => CoreError::WeakPassword(msg),
            Error::ContactExists(msg) => CoreError::ContactExists(msg),
            Error::PassphraseWallet(msg) => CoreError::PassphraseWallet(msg),
            Error::Core(e) => e,
            Error::Database(e) => CoreError::Storage(e.to_string()),
            Error::Storage(msg) => CoreError::Storage(msg),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_conversion_keeps_error_class() {
        let core: halcyon_core::Error = Error::Decryption("aead".to_string()).into();
        assert_eq!(core.category(), halcyon_core::ErrorCategory::Storage);
        assert!(core.is_user_error());

        let core: halcyon_core::Error = Error::ContactExists("name".to_string()).into();
        assert!(matches!(core, halcyon_core::Error::ContactExists(_)));

        let core: halcyon_core::Error =
            Error::Core(halcyon_core::Error::InvalidMnemonic("x".to_string())).into();
        assert!(matches!(core, halcyon_core::Error::InvalidMnemonic(_)));
    }
}
