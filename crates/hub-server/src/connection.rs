//! Per-connection WebSocket I/O.
//!
//! Each upgraded socket becomes one [`Client`]:
//! - a writer task drains the client's mailbox into WebSocket frames;
//! - the reader loop below watches for the peer going away.
//!
//! The hub pushes; clients never send anything meaningful, so inbound
//! data frames are ignored. When either side ends, the client is
//! unregistered (a no-op if the hub already evicted it).

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::Response,
};
use bytes::Bytes;
use futures_util::{SinkExt, StreamExt};
use hub_core::{Client, MailboxReceiver};
use serde::Deserialize;
use tracing::{debug, info};

use crate::hub_task::HubHandle;
use crate::types::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    /// Session owner; absent or empty means broadcast-only.
    #[serde(default)]
    pub user_id: String,
}

/// `GET /ws?user_id=<id>`
pub async fn ws_handler(
    State(state): State<AppState>,
    Query(params): Query<ConnectParams>,
    ws: WebSocketUpgrade,
) -> Response {
    debug!("websocket upgrade request (user {:?})", params.user_id);
    ws.on_upgrade(move |socket| run_connection(socket, params.user_id, state.hub, state.mailbox_capacity))
}

/// Drive one upgraded connection until the peer or the hub ends it.
pub async fn run_connection(socket: WebSocket, user_id: String, hub: HubHandle, mailbox_capacity: usize) {
    let (client, mailbox) = Client::new(user_id, mailbox_capacity);
    let client_id = client.id();
    info!("connection {} open (user {:?})", client_id, client.user_id());
    hub.register(client);

    let (sink, mut stream) = socket.split();
    let mut writer = tokio::spawn(write_mailbox(sink, mailbox));

    loop {
        tokio::select! {
            inbound = stream.next() => match inbound {
                Some(Ok(Message::Close(_))) | None => {
                    debug!("connection {} closed by peer", client_id);
                    break;
                }
                Some(Ok(_)) => {}
                Some(Err(e)) => {
                    debug!("connection {} read error: {}", client_id, e);
                    break;
                }
            },
            // Mailbox closed (evicted) or the socket refused a write.
            _ = &mut writer => break,
        }
    }

    hub.unregister(client_id);
    writer.abort();
    info!("connection {} finished", client_id);
}

async fn write_mailbox<S>(mut sink: S, mut mailbox: MailboxReceiver)
where
    S: futures_util::Sink<Message> + Unpin,
{
    while let Some(payload) = mailbox.recv().await {
        if sink.send(to_frame(payload)).await.is_err() {
            return;
        }
    }

    // The hub dropped this client; tell the peer before hanging up.
    let _ = sink.send(Message::Close(None)).await;
}

/// JSON payloads go out as text frames; anything else as binary.
fn to_frame(payload: Bytes) -> Message {
    match std::str::from_utf8(&payload) {
        Ok(text) => Message::Text(text.into()),
        Err(_) => Message::Binary(payload),
    }
}
