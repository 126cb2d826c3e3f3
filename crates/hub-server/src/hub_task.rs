//! Central hub loop.
//!
//! This task owns the [`Hub`] (and through it the client registry) and
//! is the only code that ever mutates it. Everything else talks to it
//! through two intake queues:
//! - local commands (register, unregister, broadcast), kept in one
//!   ordered queue so each sender's requests are applied in the order
//!   they were sent,
//! - the broker subscription on [`UPDATES_TOPIC`].
//!
//! Events are processed one at a time, so no locking is needed. Per
//! client delivery never waits: a full mailbox gets its client evicted.

use bytes::Bytes;
use hub_broker::{Broker, Subscription};
use hub_core::{Client, ClientId, Hub, HubStats};
use hub_protocol::{decode_message, UPDATES_TOPIC};
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::error::HubError;
use crate::types::{CommandRx, CommandTx, HubCommand};

/// Cheap, cloneable front door to the hub task.
///
/// Sends are fire-and-forget: if the hub is gone the request is
/// dropped, and nothing is ever reported back to the caller.
#[derive(Debug, Clone)]
pub struct HubHandle {
    commands: CommandTx,
    stats: watch::Receiver<HubStats>,
}

impl HubHandle {
    pub fn register(&self, client: Client) {
        self.send(HubCommand::Register(client));
    }

    pub fn unregister(&self, id: ClientId) {
        self.send(HubCommand::Unregister(id));
    }

    /// Deliver `payload` to every connected client.
    pub fn broadcast(&self, payload: Bytes) {
        self.send(HubCommand::Broadcast(payload));
    }

    fn send(&self, command: HubCommand) {
        if let Err(rejected) = self.commands.send(command) {
            debug!("hub stopped; dropping {:?}", rejected.0);
        }
    }

    /// Registry size as of the last processed event.
    pub fn stats(&self) -> HubStats {
        *self.stats.borrow()
    }

    /// Watch registry size change as events are processed.
    pub fn subscribe_stats(&self) -> watch::Receiver<HubStats> {
        self.stats.clone()
    }
}

/// Subscribe to the updates topic and spawn the hub loop.
///
/// A failed subscription is returned as-is: without the upstream feed
/// the server is useless, and there is no retry.
pub async fn start_hub(broker: &dyn Broker) -> Result<HubHandle, HubError> {
    let updates = broker
        .subscribe(UPDATES_TOPIC)
        .await
        .map_err(|source| HubError::Subscribe {
            topic: UPDATES_TOPIC,
            source,
        })?;
    info!("hub subscribed to {:?}", UPDATES_TOPIC);

    Ok(spawn_hub(updates))
}

/// Spawn the hub loop over an already established subscription.
pub fn spawn_hub(updates: Subscription) -> HubHandle {
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (stats_tx, stats_rx) = watch::channel(HubStats::default());

    tokio::spawn(run_hub_loop(commands_rx, updates, stats_tx));

    HubHandle {
        commands: commands_tx,
        stats: stats_rx,
    }
}

/// Run until both intake queues are closed.
async fn run_hub_loop(
    mut commands: CommandRx,
    mut updates: Subscription,
    stats_tx: watch::Sender<HubStats>,
) {
    let mut hub = Hub::new();
    let mut updates_open = true;

    loop {
        tokio::select! {
            Some(command) = commands.recv() => handle_command(&mut hub, command),
            update = updates.recv(), if updates_open => match update {
                Some(raw) => handle_update(&mut hub, raw),
                None => {
                    error!("broker subscription to {:?} ended; no further updates will arrive", UPDATES_TOPIC);
                    updates_open = false;
                }
            },
            else => break,
        }

        stats_tx.send_if_modified(|stats| {
            let now = hub.stats();
            let changed = *stats != now;
            *stats = now;
            changed
        });
    }

    info!("hub loop shutting down (all intake queues closed)");
}

fn handle_command(hub: &mut Hub, command: HubCommand) {
    match command {
        HubCommand::Register(client) => {
            hub.register(client);
        }
        HubCommand::Unregister(id) => {
            hub.unregister(id);
        }
        HubCommand::Broadcast(payload) => {
            let delivery = hub.broadcast(&payload);
            debug!(
                "local broadcast: delivered={} evicted={}",
                delivery.delivered, delivery.evicted
            );
        }
    }
}

/// Decode one broker payload and fan the original bytes out.
fn handle_update(hub: &mut Hub, raw: Bytes) {
    let msg = match decode_message(&raw) {
        Ok(msg) => msg,
        Err(e) => {
            warn!("discarding broker payload ({} bytes): {}", raw.len(), e);
            return;
        }
    };

    let delivery = hub.dispatch(&msg, &raw);
    debug!(
        "broker {:?} message for {:?}: delivered={} evicted={}",
        msg.kind,
        msg.target().unwrap_or("<everyone>"),
        delivery.delivered,
        delivery.evicted
    );
}
