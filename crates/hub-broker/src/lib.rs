//! hub-broker
//!
//! Publish/subscribe transports for the update hub.
//!
//! The hub only depends on the [`Broker`] trait. Two implementations
//! are provided:
//! - [`MemoryBroker`]: in-process fanout, for tests and single-node runs;
//! - [`RedisBroker`]: Redis `PUBLISH` / `SUBSCRIBE`.

pub mod error;
pub mod memory;
pub mod redis_broker;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;

pub use error::BrokerError;
pub use memory::MemoryBroker;
pub use redis_broker::RedisBroker;

/// Buffered payloads per subscription before the transport waits on the reader.
pub const SUBSCRIPTION_BUFFER: usize = 1024;

/// Live stream of payloads published on a topic.
///
/// Ends (`recv()` returns `None`) when the transport goes away.
pub type Subscription = mpsc::Receiver<Bytes>;

/// Abstract publish/subscribe transport.
#[async_trait]
pub trait Broker: Send + Sync {
    /// Publish `message` on `topic`.
    async fn publish(&self, topic: &str, message: Bytes) -> Result<(), BrokerError>;

    /// Subscribe to `topic`. Fails if the subscription cannot be established.
    async fn subscribe(&self, topic: &str) -> Result<Subscription, BrokerError>;

    /// Release the transport. Open subscriptions end.
    async fn close(&self) -> Result<(), BrokerError>;
}
