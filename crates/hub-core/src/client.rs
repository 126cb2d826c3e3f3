//! Client handles and mailboxes.
//!
//! A [`Client`] is what the connection layer hands to the hub when a
//! socket is upgraded. It carries:
//! - a process-unique [`ClientId`],
//! - an optional user id (empty strings are treated as "no user"),
//! - the sending half of a bounded mailbox.
//!
//! The receiving half ([`MailboxReceiver`]) stays with the connection's
//! writer. Once the hub drops the `Client`, the writer sees the mailbox
//! end after draining whatever was already queued.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use bytes::Bytes;
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::error::DeliveryError;

static NEXT_CLIENT_ID: AtomicU64 = AtomicU64::new(1);

/// Identifier for a connected client.
///
/// Opaque; we only guarantee uniqueness over the lifetime of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ClientId(pub u64);

impl ClientId {
    /// Allocate a fresh id.
    pub fn next() -> Self {
        ClientId(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for ClientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Receiving end of a client's mailbox, drained by the connection writer.
pub type MailboxReceiver = mpsc::Receiver<Bytes>;

/// Sending end of a client's bounded outbound queue.
///
/// Deliberately not `Clone`: the registry holds the only sender, so
/// dropping the owning [`Client`] is the one and only way the mailbox
/// gets closed.
#[derive(Debug)]
pub struct Mailbox {
    tx: mpsc::Sender<Bytes>,
}

impl Mailbox {
    /// Create a mailbox holding at most `capacity` undelivered payloads.
    ///
    /// A capacity of zero is bumped to one.
    pub fn bounded(capacity: usize) -> (Mailbox, MailboxReceiver) {
        let (tx, rx) = mpsc::channel(capacity.max(1));
        (Mailbox { tx }, rx)
    }

    /// Attempt to enqueue `payload` without waiting.
    pub fn try_deliver(&self, payload: Bytes) -> Result<(), DeliveryError> {
        self.tx.try_send(payload).map_err(|e| match e {
            TrySendError::Full(_) => DeliveryError::Full,
            TrySendError::Closed(_) => DeliveryError::Closed,
        })
    }
}

/// A live connection as seen by the hub.
#[derive(Debug)]
pub struct Client {
    id: ClientId,
    user_id: Option<String>,
    mailbox: Mailbox,
}

impl Client {
    /// Build a client with a fresh id and a mailbox of `capacity` slots.
    ///
    /// Returns the client (to be registered with the hub) and the
    /// mailbox receiver (to be drained by the connection writer).
    pub fn new(user_id: impl Into<String>, capacity: usize) -> (Client, MailboxReceiver) {
        let (mailbox, rx) = Mailbox::bounded(capacity);
        (Client::with_mailbox(ClientId::next(), user_id, mailbox), rx)
    }

    /// Assemble a client from parts. An empty `user_id` means "no user".
    pub fn with_mailbox(id: ClientId, user_id: impl Into<String>, mailbox: Mailbox) -> Client {
        let user_id = user_id.into();
        Client {
            id,
            user_id: (!user_id.is_empty()).then_some(user_id),
            mailbox,
        }
    }

    pub fn id(&self) -> ClientId {
        self.id
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn mailbox(&self) -> &Mailbox {
        &self.mailbox
    }
}
