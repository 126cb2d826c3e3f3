//! In-process broker.
//!
//! Every payload published on a topic is forwarded to every live
//! subscription of that topic. Subscriptions whose reader went away
//! are pruned on the next publish.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::sync::mpsc;
use tracing::debug;

use crate::{Broker, BrokerError, Subscription, SUBSCRIPTION_BUFFER};

#[derive(Debug, Default)]
pub struct MemoryBroker {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    closed: bool,
    topics: HashMap<String, Vec<mpsc::Sender<Bytes>>>,
}

impl MemoryBroker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live subscriptions on `topic`.
    pub fn subscriber_count(&self, topic: &str) -> usize {
        let inner = self.lock();
        inner
            .topics
            .get(topic)
            .map(|subs| subs.iter().filter(|tx| !tx.is_closed()).count())
            .unwrap_or(0)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Inner> {
        // A poisoned lock only means a publisher panicked mid-update;
        // the map itself is still usable.
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Broker for MemoryBroker {
    async fn publish(&self, topic: &str, message: Bytes) -> Result<(), BrokerError> {
        let subscribers = {
            let mut inner = self.lock();
            if inner.closed {
                return Err(BrokerError::Closed);
            }
            match inner.topics.get_mut(topic) {
                Some(subs) => {
                    subs.retain(|tx| !tx.is_closed());
                    subs.clone()
                }
                None => Vec::new(),
            }
        };

        debug!("publishing {} bytes on {:?} to {} subscriber(s)", message.len(), topic, subscribers.len());
        for tx in subscribers {
            // A subscriber dropping mid-publish is not the publisher's problem.
            let _ = tx.send(message.clone()).await;
        }
        Ok(())
    }

    async fn subscribe(&self, topic: &str) -> Result<Subscription, BrokerError> {
        let mut inner = self.lock();
        if inner.closed {
            return Err(BrokerError::Closed);
        }
        let (tx, rx) = mpsc::channel(SUBSCRIPTION_BUFFER);
        inner.topics.entry(topic.to_owned()).or_default().push(tx);
        Ok(rx)
    }

    async fn close(&self) -> Result<(), BrokerError> {
        let mut inner = self.lock();
        inner.closed = true;
        inner.topics.clear();
        Ok(())
    }
}
