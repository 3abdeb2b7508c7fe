//! Message-passing front of the store
//!
//! The [`Store`] lives on one tokio task. Callers send events through an
//! unbounded queue and read published snapshots from a `watch` channel, so
//! events are applied strictly in send order and nobody else touches the
//! state.

use crate::events::Event;
use crate::slices::AppState;
use crate::store::Store;
use crate::{Error, Result};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

struct Command {
    event: Event,
    applied: Option<oneshot::Sender<bool>>,
}

/// Cloneable handle to a running store
#[derive(Clone)]
pub struct StoreHandle {
    commands: mpsc::UnboundedSender<Command>,
    snapshots: watch::Receiver<Arc<AppState>>,
}

impl StoreHandle {
    /// Queue an event without waiting for it
    pub fn post(&self, event: Event) -> Result<()> {
        self.commands
            .send(Command {
                event,
                applied: None,
            })
            .map_err(|_| Error::StoreClosed)
    }

    /// Queue an event and wait until it is applied and its snapshot
    /// published. Returns `false` when the store dropped it as stale.
    pub async fn dispatch(&self, event: Event) -> Result<bool> {
        let (tx, rx) = oneshot::channel();
        self.commands
            .send(Command {
                event,
                applied: Some(tx),
            })
            .map_err(|_| Error::StoreClosed)?;
        rx.await.map_err(|_| Error::StoreClosed)
    }

    /// Latest published state
    pub fn snapshot(&self) -> Arc<AppState> {
        self.snapshots.borrow().clone()
    }

    /// Receiver notified on every applied event
    pub fn subscribe(&self) -> watch::Receiver<Arc<AppState>> {
        self.snapshots.clone()
    }
}

/// Move `store` onto a task. The task ends, returning the store, once every
/// handle is dropped.
pub fn spawn_store(store: Store) -> (StoreHandle, JoinHandle<Store>) {
    let (commands, mut queue) = mpsc::unbounded_channel::<Command>();
    let (publisher, snapshots) = watch::channel(Arc::new(store.state().clone()));

    let task = tokio::spawn(async move {
        let mut store = store;
        while let Some(command) = queue.recv().await {
            let applied = store.dispatch(command.event);
            if applied {
                publisher.send_replace(Arc::new(store.state().clone()));
            }
            if let Some(reply) = command.applied {
                let _ = reply.send(applied);
            }
        }
        tracing::debug!("State store stopped after {} events", store.applied());
        store
    });

    (
        StoreHandle {
            commands,
            snapshots,
        },
        task,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::Snackbar;
    use crate::slice::StaticContext;
    use crate::slices::NetworkStatus;

    fn running() -> (StoreHandle, JoinHandle<Store>) {
        spawn_store(Store::new(Arc::new(StaticContext::default())))
    }

    #[tokio::test]
    async fn test_events_applied_in_order() {
        let (handle, task) = running();
        handle.post(Event::NetworkConnecting).unwrap();
        handle
            .post(Event::NetworkOffline {
                reason: "down".to_string(),
            })
            .unwrap();
        assert!(handle.dispatch(Event::NetworkConnecting).await.unwrap());

        assert_eq!(handle.snapshot().network.status, NetworkStatus::Connecting);
        assert_eq!(handle.snapshot().network.last_error.as_deref(), Some("down"));

        drop(handle);
        let store = task.await.unwrap();
        assert_eq!(store.applied(), 3);
    }

    #[tokio::test]
    async fn test_subscribers_see_updates() {
        let (handle, _task) = running();
        let mut rx = handle.subscribe();
        handle
            .post(Event::SnackbarMessage(Snackbar::info("hello")))
            .unwrap();
        rx.changed().await.unwrap();
        assert_eq!(rx.borrow().snackbar.queue.len(), 1);
    }

    #[tokio::test]
    async fn test_closed_store() {
        let (handle, task) = running();
        task.abort();
        let _ = task.await;
        assert!(matches!(
            handle.dispatch(Event::WalletLocked).await,
            Err(Error::StoreClosed)
        ));
    }
}
