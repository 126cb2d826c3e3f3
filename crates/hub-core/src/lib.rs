//! hub-core
//!
//! Pure fanout logic for the update hub:
//! - client handles and their bounded mailboxes
//! - the client registry (global set + per-user sessions)
//! - the broker message envelope
//! - the single-writer `Hub` that routes payloads and evicts slow clients
//!
//! Nothing in here spawns tasks or touches the network. The async
//! event loop that drives a [`Hub`] lives in `hub-server`.

pub mod client;
pub mod error;
pub mod hub;
pub mod messages;
pub mod registry;

pub use client::{Client, ClientId, Mailbox, MailboxReceiver};
pub use error::DeliveryError;
pub use hub::{Delivery, Hub, HubStats};
pub use messages::BrokerMessage;
pub use registry::ClientRegistry;
