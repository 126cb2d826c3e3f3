//! Registry of live clients.
//!
//! Two views over the same set of clients:
//! - `all`: every registered client, keyed by [`ClientId`];
//! - `by_user`: user id -> that user's sessions, in registration order.
//!
//! Invariants (checked by [`ClientRegistry::check_invariants`]):
//! - a client with a user id is in `all` iff it appears exactly once
//!   in `by_user[user_id]`;
//! - a `by_user` key exists iff its list is non-empty;
//! - a client's mailbox is closed exactly when it leaves `all`
//!   (the registry owns the only sender, so removal drops it).
//!
//! The registry does no locking. It is meant to be owned by a single
//! task; see `hub-server`'s event loop.

use std::collections::HashMap;

use tracing::warn;

use crate::client::{Client, ClientId};

#[derive(Debug, Default)]
pub struct ClientRegistry {
    all: HashMap<ClientId, Client>,
    by_user: HashMap<String, Vec<ClientId>>,
}

impl ClientRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a client, indexing it under its user id if it has one.
    ///
    /// Returns `false` and drops `client` if its id is already present.
    pub fn add(&mut self, client: Client) -> bool {
        let id = client.id();
        if self.all.contains_key(&id) {
            warn!("client {} registered twice; ignoring duplicate", id);
            return false;
        }

        if let Some(user_id) = client.user_id() {
            self.by_user.entry(user_id.to_owned()).or_default().push(id);
        }
        self.all.insert(id, client);
        true
    }

    /// Remove a client and close its mailbox.
    ///
    /// Returns `false` if the client was not registered.
    pub fn remove(&mut self, id: ClientId) -> bool {
        let Some(client) = self.all.remove(&id) else {
            return false;
        };

        if let Some(user_id) = client.user_id() {
            if let Some(sessions) = self.by_user.get_mut(user_id) {
                // Vec::remove keeps the remaining sessions in order.
                if let Some(pos) = sessions.iter().position(|c| *c == id) {
                    sessions.remove(pos);
                }
                if sessions.is_empty() {
                    self.by_user.remove(user_id);
                }
            }
        }

        // Dropping the client drops the only mailbox sender.
        drop(client);
        true
    }

    /// Sessions belonging to `user_id`, oldest first.
    pub fn clients_for(&self, user_id: &str) -> Vec<ClientId> {
        self.by_user.get(user_id).cloned().unwrap_or_default()
    }

    pub fn get(&self, id: ClientId) -> Option<&Client> {
        self.all.get(&id)
    }

    pub fn contains(&self, id: ClientId) -> bool {
        self.all.contains_key(&id)
    }

    /// Ids of every registered client (unordered).
    pub fn ids(&self) -> Vec<ClientId> {
        self.all.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.all.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all.is_empty()
    }

    /// Number of distinct users with at least one session.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Verify that `all` and `by_user` agree.
    pub fn check_invariants(&self) -> Result<(), String> {
        for (user_id, sessions) in &self.by_user {
            if sessions.is_empty() {
                return Err(format!("user {user_id:?} has an empty session list"));
            }
            for id in sessions {
                let Some(client) = self.all.get(id) else {
                    return Err(format!("user {user_id:?} lists unregistered client {id}"));
                };
                if client.user_id() != Some(user_id.as_str()) {
                    return Err(format!("client {id} is listed under the wrong user {user_id:?}"));
                }
            }
        }

        for (id, client) in &self.all {
            if let Some(user_id) = client.user_id() {
                let occurrences = self
                    .by_user
                    .get(user_id)
                    .map(|sessions| sessions.iter().filter(|c| *c == id).count())
                    .unwrap_or(0);
                if occurrences != 1 {
                    return Err(format!(
                        "client {id} appears {occurrences} times under user {user_id:?}"
                    ));
                }
            }
        }

        Ok(())
    }
}
