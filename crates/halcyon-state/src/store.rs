//! Dispatcher
//!
//! Applies events one at a time in arrival order. Lifecycle hooks run before
//! `reduce` with a context read fresh from the [`ContextSource`].

use crate::events::Event;
use crate::slice::{ContextSource, Slice};
use crate::slices::AppState;
use std::sync::Arc;
use tracing::debug;

/// Owner of the app state
pub struct Store {
    state: AppState,
    context: Arc<dyn ContextSource>,
    applied: u64,
}

impl Store {
    /// Store in its initial state
    pub fn new(context: Arc<dyn ContextSource>) -> Self {
        let state = AppState::initial(&context.context());
        Self {
            state,
            context,
            applied: 0,
        }
    }

    /// Current state
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Events applied so far
    pub fn applied(&self) -> u64 {
        self.applied
    }

    /// Apply one event. Returns `false` when the event carried data for a
    /// session that is no longer active and was dropped.
    pub fn dispatch(&mut self, event: Event) -> bool {
        if let Some(session) = event.data_session() {
            if self.state.wallet.active_session().as_ref() != Some(session) {
                debug!("Dropping stale {} for session {}", event.name(), session);
                return false;
            }
        }

        match &event {
            Event::WalletLocked => self.state.on_wallet_locked(&self.context.context()),
            Event::WalletSwitched(_) => self.state.on_wallet_switched(&self.context.context()),
            Event::ActiveWalletDeleted { .. } => {
                self.state.on_active_wallet_deleted(&self.context.context())
            }
            _ => {}
        }

        self.state.reduce(&event);
        self.applied += 1;
        debug!("Applied {}", event.name());
        true
    }
}
