//! Slice lifecycle
//!
//! A slice owns one part of the app state. The store calls the lifecycle
//! hooks before `reduce` for wallet lock, switch and deletion, so a slice
//! cannot forget to drop the previous wallet's data.

use crate::events::Event;
use halcyon_core::{Settings, WalletMeta};

/// Data a slice may derive its initial state from
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SliceContext {
    /// Stored wallets, most recently used first
    pub wallets: Vec<WalletMeta>,
    /// Persisted settings
    pub settings: Settings,
}

/// Reads a fresh [`SliceContext`], usually from storage
pub trait ContextSource: Send + Sync {
    /// Current context
    fn context(&self) -> SliceContext;
}

/// Fixed context, for tests and headless use
#[derive(Debug, Clone, Default)]
pub struct StaticContext(pub SliceContext);

impl ContextSource for StaticContext {
    fn context(&self) -> SliceContext {
        self.0.clone()
    }
}

/// One independent part of the app state
pub trait Slice {
    /// Fresh state
    fn initial(ctx: &SliceContext) -> Self
    where
        Self: Sized;

    /// Apply an event. Events the slice does not declare are ignored.
    fn reduce(&mut self, event: &Event);

    /// The active wallet was locked
    fn on_wallet_locked(&mut self, ctx: &SliceContext);

    /// Another wallet is becoming active
    fn on_wallet_switched(&mut self, ctx: &SliceContext);

    /// The active wallet was deleted
    fn on_active_wallet_deleted(&mut self, ctx: &SliceContext);
}
