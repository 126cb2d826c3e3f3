//! Redis-backed broker.
//!
//! - Publishing goes through a shared [`ConnectionManager`], which
//!   reconnects on its own.
//! - Each subscription gets a dedicated pub/sub connection (Redis does
//!   not allow regular commands on a subscribed connection) and a
//!   forwarding task that pushes payloads into the [`Subscription`].
//!
//! Credentials and database index travel in the URL, e.g.
//! `redis://:secret@cache.internal:6379/2`.

use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use futures_util::StreamExt;
use redis::aio::ConnectionManager;
use redis::AsyncCommands;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::{Broker, BrokerError, Subscription, SUBSCRIPTION_BUFFER};

pub struct RedisBroker {
    client: redis::Client,
    publisher: Mutex<Option<ConnectionManager>>,
    forwarders: Mutex<Vec<JoinHandle<()>>>,
}

impl RedisBroker {
    /// Connect to the Redis server at `url`.
    pub async fn connect(url: &str) -> Result<Self, BrokerError> {
        let client = redis::Client::open(url)?;
        let manager = ConnectionManager::new(client.clone()).await?;
        info!("connected to redis at {:?}", client.get_connection_info().addr);

        Ok(Self {
            client,
            publisher: Mutex::new(Some(manager)),
            forwarders: Mutex::new(Vec::new()),
        })
    }

    fn publisher(&self) -> Result<ConnectionManager, BrokerError> {
        let guard = self
            .publisher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        guard.clone().ok_or(BrokerError::Closed)
    }
}

#[async_trait]
impl Broker for RedisBroker {
    async fn publish(&self, topic: &str, message: Bytes) -> Result<(), BrokerError> {
        let mut conn = self.publisher()?;
        conn.publish::<_, _, ()>(topic, message.as_ref()).await?;
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription, BrokerError> {
        // Fail early instead of handing out a subscription that never yields.
        self.publisher()?;

        let mut pubsub = self.client.get_async_pubsub().await?;
        pubsub.subscribe(topic).await?;
        info!("subscribed to redis channel {:?}", topic);

        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        let channel = topic.to_owned();
        let handle = tokio::spawn(async move {
            let mut messages = Box::pin(pubsub.into_on_message());
            while let Some(msg) = messages.next().await {
                let payload = Bytes::copy_from_slice(msg.get_payload_bytes());
                if tx.send(payload).await.is_err() {
                    debug!("subscriber for {:?} went away", channel);
                    return;
                }
            }
            warn!("redis subscription to {:?} ended", channel);
        });

        self.forwarders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(handle);
        Ok(rx)
    }

    async fn close(&self) -> Result<(), BrokerError> {
        self.publisher
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .take();
        for handle in self
            .forwarders
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .drain(..)
        {
            handle.abort();
        }
        Ok(())
    }
}
