#![allow(dead_code)]

use std::time::Duration;

use bytes::Bytes;
use hub_core::{Client, ClientId, MailboxReceiver};
use hub_server::hub_task::HubHandle;
use tokio::time::timeout;

pub const WAIT: Duration = Duration::from_secs(2);

/// Register a client and wait until the hub has processed it.
pub async fn join(hub: &HubHandle, user: &str, capacity: usize) -> (ClientId, MailboxReceiver) {
    let expected = hub.stats().clients + 1;
    let (client, rx) = Client::new(user, capacity);
    let id = client.id();
    hub.register(client);
    wait_for_clients(hub, expected).await;
    (id, rx)
}

pub async fn wait_for_clients(hub: &HubHandle, n: usize) {
    let mut stats = hub.subscribe_stats();
    timeout(WAIT, stats.wait_for(|s| s.clients == n))
        .await
        .expect("timed out waiting for hub")
        .expect("hub stopped");
}

/// Next payload from a mailbox, or `None` if it closed.
pub async fn recv(rx: &mut MailboxReceiver) -> Option<Bytes> {
    timeout(WAIT, rx.recv()).await.expect("timed out waiting for mailbox")
}
