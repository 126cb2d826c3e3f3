//! The envelope carried over the broker.
//!
//! The hub only looks at `target_user_id`. `type` and `payload` are
//! opaque: they are never interpreted, and fanout always forwards the
//! original bytes rather than a re-encoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A message published on the updates topic.
///
/// Missing fields decode to their zero values (`""` / `null`).
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct BrokerMessage {
    /// Empty means "broadcast to everyone".
    pub target_user_id: String,

    #[serde(rename = "type")]
    pub kind: String,

    pub payload: Value,
}

impl BrokerMessage {
    pub fn broadcast(kind: impl Into<String>, payload: Value) -> Self {
        Self {
            target_user_id: String::new(),
            kind: kind.into(),
            payload,
        }
    }

    pub fn to_user(user_id: impl Into<String>, kind: impl Into<String>, payload: Value) -> Self {
        Self {
            target_user_id: user_id.into(),
            kind: kind.into(),
            payload,
        }
    }

    /// The targeted user, or `None` for a broadcast.
    pub fn target(&self) -> Option<&str> {
        (!self.target_user_id.is_empty()).then_some(self.target_user_id.as_str())
    }
}
