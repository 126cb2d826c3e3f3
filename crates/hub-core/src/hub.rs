//! Fanout state machine.
//!
//! `Hub` owns the [`ClientRegistry`] and applies one event at a time:
//! - `register` / `unregister`: registry mutations;
//! - `broadcast`: local payload to every client;
//! - `dispatch`: decoded broker message, routed by target user.
//!
//! Delivery policy (same for every fanout path):
//! - try a non-blocking enqueue on the target's mailbox;
//! - on rejection (full or closed), evict the client.
//!
//! A slow consumer therefore never stalls the caller, and never makes
//! the hub buffer on its behalf.

use bytes::Bytes;
use tracing::{debug, info, warn};

use crate::client::{Client, ClientId};
use crate::messages::BrokerMessage;
use crate::registry::ClientRegistry;

/// Outcome of a single fanout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Delivery {
    /// Mailboxes that accepted the payload.
    pub delivered: usize,

    /// Clients evicted because their mailbox rejected it.
    pub evicted: usize,
}

/// Snapshot of registry size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HubStats {
    pub clients: usize,
    pub users: usize,
}

#[derive(Debug, Default)]
pub struct Hub {
    registry: ClientRegistry,
}

impl Hub {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, client: Client) -> bool {
        let id = client.id();
        let user = client.user_id().map(str::to_owned);
        let added = self.registry.add(client);
        if added {
            info!(
                "registered client {} (user {:?}, {} total)",
                id,
                user,
                self.registry.len()
            );
        }
        added
    }

    /// Remove a client. Unknown ids are ignored.
    pub fn unregister(&mut self, id: ClientId) -> bool {
        let removed = self.registry.remove(id);
        if removed {
            info!(
                "unregistered client {} ({} remaining)",
                id,
                self.registry.len()
            );
        }
        removed
    }

    /// Deliver `payload` to every registered client.
    pub fn broadcast(&mut self, payload: &Bytes) -> Delivery {
        let targets = self.registry.ids();
        self.deliver(&targets, payload)
    }

    /// Route a decoded broker message, forwarding the original `raw` bytes.
    ///
    /// No target => broadcast. Target with no sessions => dropped.
    pub fn dispatch(&mut self, msg: &BrokerMessage, raw: &Bytes) -> Delivery {
        match msg.target() {
            None => self.broadcast(raw),
            Some(user_id) => {
                let targets = self.registry.clients_for(user_id);
                if targets.is_empty() {
                    debug!("no sessions for user {:?}; dropping {:?} message", user_id, msg.kind);
                    return Delivery::default();
                }
                self.deliver(&targets, raw)
            }
        }
    }

    fn deliver(&mut self, targets: &[ClientId], payload: &Bytes) -> Delivery {
        let mut delivery = Delivery::default();
        let mut slow = Vec::new();

        for id in targets {
            let Some(client) = self.registry.get(*id) else {
                continue;
            };
            match client.mailbox().try_deliver(payload.clone()) {
                Ok(()) => delivery.delivered += 1,
                Err(reason) => {
                    warn!("evicting client {}: {}", id, reason);
                    slow.push(*id);
                }
            }
        }

        for id in slow {
            if self.registry.remove(id) {
                delivery.evicted += 1;
            }
        }

        delivery
    }

    pub fn registry(&self) -> &ClientRegistry {
        &self.registry
    }

    pub fn stats(&self) -> HubStats {
        HubStats {
            clients: self.registry.len(),
            users: self.registry.user_count(),
        }
    }
}
