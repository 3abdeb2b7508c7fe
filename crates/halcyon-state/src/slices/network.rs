//! Explorer connectivity
//!
//! `Uninitialized -> Connecting -> Online | Offline`. A probe result only
//! lands after `Connecting`, so a late answer to a probe started before a
//! lock is dropped.

use crate::events::Event;
use crate::slice::{Slice, SliceContext};

/// Connectivity status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NetworkStatus {
    /// No probe yet
    #[default]
    Uninitialized,
    /// Probe in flight
    Connecting,
    /// Explorer reachable
    Online,
    /// Explorer unreachable
    Offline,
}

impl NetworkStatus {
    /// Whether a probe result may be applied in this status
    pub fn accepts_probe_result(self) -> bool {
        !matches!(self, NetworkStatus::Uninitialized)
    }
}

/// Network slice
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NetworkState {
    /// Current status
    pub status: NetworkStatus,
    /// Explorer release, when online
    pub explorer_version: Option<String>,
    /// Last failure, when offline
    pub last_error: Option<String>,
}

impl Slice for NetworkState {
    fn initial(_ctx: &SliceContext) -> Self {
        Self::default()
    }

    fn reduce(&mut self, event: &Event) {
        match event {
            Event::NetworkConnecting | Event::NetworkSettingsChanged(_) => {
                self.status = NetworkStatus::Connecting;
            }
            Event::NetworkOnline { version } => {
                if !self.status.accepts_probe_result() {
                    tracing::debug!("Ignoring probe result without pending probe");
                    return;
                }
                self.status = NetworkStatus::Online;
                self.explorer_version = Some(version.clone());
                self.last_error = None;
            }
            Event::NetworkOffline { reason } => {
                if !self.status.accepts_probe_result() {
                    tracing::debug!("Ignoring probe result without pending probe");
                    return;
                }
                self.status = NetworkStatus::Offline;
                self.explorer_version = None;
                self.last_error = Some(reason.clone());
            }
            _ => {}
        }
    }

    fn on_wallet_locked(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }

    fn on_wallet_switched(&mut self, _ctx: &SliceContext) {}

    fn on_active_wallet_deleted(&mut self, ctx: &SliceContext) {
        *self = Self::initial(ctx);
    }
}
