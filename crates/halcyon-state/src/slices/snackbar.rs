//! Transient notifications, oldest first

use crate::events::{Event, Snackbar};
use crate::slice::{Slice, SliceContext};
use std::collections::VecDeque;

/// Notifications kept before the oldest is dropped
pub const MAX_SNACKBARS: usize = 8;

/// Snackbar slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SnackbarState {
    /// Queued notifications
    pub queue: VecDeque<Snackbar>,
}

impl SnackbarState {
    fn push(&mut self, snackbar: Snackbar) {
        if self.queue.len() == MAX_SNACKBARS {
            self.queue.pop_front();
        }
        self.queue.push_back(snackbar);
    }

    /// Notification currently shown
    pub fn current(&self) -> Option<&Snackbar> {
        self.queue.front()
    }
}

impl Slice for SnackbarState {
    fn initial(_ctx: &SliceContext) -> Self {
        Self::default()
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::SnackbarMessage(snackbar) => self.push(snackbar.clone()),
            Event::SnackbarDismissed => {
                self.queue.pop_front();
            }
            Event::StorageFailed { message } => self.push(Snackbar::alert(message.clone())),
            Event::SyncFailed { failures, .. } => self.push(Snackbar::alert(format!(
                "Could not sync {} address{}",
                failures.len(),
                if failures.len() == 1 { "" } else { "es" }
            ))),
            _ => {}
        }
    }

    fn on_wallet_locked(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_wallet_switched(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_active_wallet_deleted(&mut self, _ctx: &SliceContext) {}
}
