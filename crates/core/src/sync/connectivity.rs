//! Tracks whether the remote store is reachable.
//!
//! The flag is updated from the outcome of remote calls. Subscribers see every
//! transition, and an offline-to-online change is the "connectivity restored"
//! notification the sync scheduler reacts to.

use std::sync::Arc;

use log::info;
use tokio::sync::watch;

use crate::errors::{Error, Result};

#[derive(Clone)]
pub struct Connectivity {
    sender: Arc<watch::Sender<bool>>,
}

impl Connectivity {
    pub fn new(initially_online: bool) -> Self {
        let (sender, _receiver) = watch::channel(initially_online);
        Self {
            sender: Arc::new(sender),
        }
    }

    pub fn is_online(&self) -> bool {
        *self.sender.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<bool> {
        self.sender.subscribe()
    }

    /// Returns true when this call flipped the state to online.
    pub fn mark_online(&self) -> bool {
        let restored = self.set(true);
        if restored {
            info!("Remote store reachable again");
        }
        restored
    }

    /// Returns true when this call flipped the state to offline.
    pub fn mark_offline(&self) -> bool {
        let lost = self.set(false);
        if lost {
            info!("Remote store unreachable; writes will be queued locally");
        }
        lost
    }

    /// Updates the flag from a remote call result. Any answer from the store,
    /// including `NotFound`, counts as reachable; local storage errors leave
    /// the flag alone.
    pub fn observe<T>(&self, result: &Result<T>) {
        match result {
            Ok(_) | Err(Error::NotFound(_)) => {
                self.mark_online();
            }
            Err(Error::RemoteUnavailable(_)) => {
                self.mark_offline();
            }
            Err(_) => {}
        }
    }

    fn set(&self, online: bool) -> bool {
        self.sender.send_if_modified(|current| {
            if *current == online {
                false
            } else {
                *current = online;
                true
            }
        })
    }
}

impl Default for Connectivity {
    fn default() -> Self {
        Self::new(true)
    }
}
