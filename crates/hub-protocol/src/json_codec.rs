// crates/hub-protocol/src/json_codec.rs

//! JSON codec for [`BrokerMessage`].

use bytes::Bytes;
use hub_core::BrokerMessage;
use thiserror::Error;

/// The single topic every hub subscribes to and every publisher writes to.
pub const UPDATES_TOPIC: &str = "updates";

#[derive(Debug, Error)]
pub enum ProtocolError {
    /// Bytes were not a valid broker message.
    #[error("malformed broker message: {0}")]
    Decode(#[source] serde_json::Error),

    #[error("failed to encode broker message: {0}")]
    Encode(#[source] serde_json::Error),
}

/// Decode a broker message from raw bytes.
///
/// Absent fields take their zero values, and a bare `null` decodes to
/// an all-zero message (a broadcast). Anything else that is not a JSON
/// object, or has wrongly-typed fields, is rejected.
pub fn decode_message(buf: &[u8]) -> Result<BrokerMessage, ProtocolError> {
    serde_json::from_slice::<Option<BrokerMessage>>(buf)
        .map(Option::unwrap_or_default)
        .map_err(ProtocolError::Decode)
}

/// Encode a broker message for publishing.
pub fn encode_message(msg: &BrokerMessage) -> Result<Bytes, ProtocolError> {
    serde_json::to_vec(msg)
        .map(Bytes::from)
        .map_err(ProtocolError::Encode)
}
