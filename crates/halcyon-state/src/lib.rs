//! In-memory app state for Halcyon
//!
//! State is split into slices, each reacting to a closed set of [`Event`]s.
//! A single [`Store`] applies events in order; [`spawn_store`] puts it on a
//! task behind a message-passing [`StoreHandle`].
//!
//! Locking, switching or deleting the active wallet resets every slice
//! through the [`Slice`] lifecycle hooks, so no address, transaction or
//! contact data outlives its wallet session.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod events;
pub mod handle;
pub mod selectors;
pub mod slice;
pub mod slices;
pub mod store;

pub use error::{Error, Result};
pub use events::{Event, SessionKey, Snackbar, SnackbarKind, WalletSession};
pub use handle::{spawn_store, StoreHandle};
pub use slice::{ContextSource, Slice, SliceContext, StaticContext};
pub use slices::{AppState, NetworkStatus, SyncStatus};
pub use store::Store;
