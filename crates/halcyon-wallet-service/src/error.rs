//! Error types for wallet service operations

use halcyon_core::ErrorCategory;

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Core error (validation, keys, storage failures already reported)
    #[error(transparent)]
    Core(#[from] halcyon_core::Error),

    /// Sync error
    #[error(transparent)]
    Sync(#[from] halcyon_sync::Error),

    /// State store error
    #[error(transparent)]
    State(#[from] halcyon_state::Error),

    /// Address not part of the active wallet
    #[error("Unknown address: {0}")]
    UnknownAddress(String),

    /// Invalid configuration
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<halcyon_storage::Error> for Error {
    fn from(e: halcyon_storage::Error) -> Self {
        Error::Core(e.into())
    }
}

impl Error {
    /// Message suitable for the user
    pub fn user_message(&self) -> String {
        match self {
            Error::Core(e) => e.user_message(),
            Error::Sync(halcyon_sync::Error::Network(_)) => {
                "Unable to connect to the network. Please check your connection and try again."
                    .to_string()
            }
            other => other.to_string(),
        }
    }

    /// Error category
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Core(e) => e.category(),
            Error::Sync(halcyon_sync::Error::Core(e)) => e.category(),
            Error::Sync(halcyon_sync::Error::Sync(_) | halcyon_sync::Error::Worker(_)) => {
                ErrorCategory::Sync
            }
            Error::Sync(_) => ErrorCategory::Network,
            Error::UnknownAddress(_) => ErrorCategory::Address,
            Error::State(_) | Error::Config(_) => ErrorCategory::Internal,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_errors_become_core() {
        let err: Error = halcyon_storage::Error::ContactExists("name".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Validation);
        assert_eq!(err.user_message(), "A contact with this name already exists");
    }

    #[test]
    fn test_network_category() {
        let err: Error = halcyon_sync::Error::Network("refused".to_string()).into();
        assert_eq!(err.category(), ErrorCategory::Network);
    }
}
