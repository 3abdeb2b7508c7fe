//! Error types for sync operations

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Network error (connect, timeout, transport)
    #[error("Network error: {0}")]
    Network(String),

    /// Explorer or node answered with an error status
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code
        status: u16,
        /// Response body or reason
        message: String,
    },

    /// Response body could not be decoded
    #[error("Decode error: {0}")]
    Decode(String),

    /// Sync error
    #[error("Sync error: {0}")]
    Sync(String),

    /// Background worker failed or went away
    #[error("Worker error: {0}")]
    Worker(String),

    /// Core error (derivation)
    #[error(transparent)]
    Core(#[from] halcyon_core::Error),
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else if let Some(status) = e.status() {
            Error::Api {
                status: status.as_u16(),
                message: e.to_string(),
            }
        } else {
            Error::Network(e.to_string())
        }
    }
}

impl From<Error> for halcyon_core::Error {
    fn from(e: Error) -> Self {
        use halcyon_core::Error as CoreError;
        match e {
            Error::Network(msg) => CoreError::NetworkDown(msg),
            Error::Api { status, message } => {
                CoreError::Network(format!("HTTP {}: {}", status, message))
            }
            Error::Decode(msg) => CoreError::Network(msg),
            Error::Sync(msg) | Error::Worker(msg) => CoreError::Sync(msg),
            Error::Core(e) => e,
        }
    }
}
