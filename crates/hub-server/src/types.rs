//! Shared types for the hub server.
//!
//! This module defines:
//! - `HubCommand`: local requests flowing into the hub task
//! - channel aliases for the hub's intake queue
//! - `AppState`: what every HTTP/WebSocket handler gets to see

use std::sync::Arc;

use bytes::Bytes;
use hub_broker::Broker;
use hub_core::{Client, ClientId};
use tokio::sync::mpsc;

use crate::hub_task::HubHandle;

/// Local request into the hub task.
///
/// Registration, unregistration and local broadcasts share one queue so
/// that a connection's unregister can never overtake its register.
#[derive(Debug)]
pub enum HubCommand {
    /// A new connection.
    Register(Client),

    /// A connection going away.
    Unregister(ClientId),

    /// Locally originated payload for every client.
    Broadcast(Bytes),
}

/// Channel from handlers → hub task.
pub type CommandTx = mpsc::UnboundedSender<HubCommand>;
pub type CommandRx = mpsc::UnboundedReceiver<HubCommand>;

/// State shared by all request handlers.
///
/// Handlers never touch the registry: they talk to the hub through
/// `hub`, and to the outside world through `broker`.
#[derive(Clone)]
pub struct AppState {
    pub hub: HubHandle,
    pub broker: Arc<dyn Broker>,
    pub mailbox_capacity: usize,
}
