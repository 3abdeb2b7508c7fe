//! Error types for the state store

/// Result type
pub type Result<T> = std::result::Result<T, Error>;

/// Error types
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The store task has stopped
    #[error("State store closed")]
    StoreClosed,

    /// Event rejected by the store
    #[error("Invariant violation: {0}")]
    Invariant(String),
}

impl From<Error> for halcyon_core::Error {
    fn from(e: Error) -> Self {
        match e {
            Error::StoreClosed => halcyon_core::Error::Other(e.to_string()),
            Error::Invariant(msg) => halcyon_core::Error::Invariant(msg),
        }
    }
}
