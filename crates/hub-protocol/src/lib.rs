//! hub-protocol
//!
//! Wire-level encoding/decoding for messages on the broker.
//!
//! This crate turns logical [`hub_core::BrokerMessage`]s into bytes
//! and back again. The wire format is a JSON object:
//!
//! ```text
//! { "target_user_id": "<user or empty>", "type": "<kind>", "payload": <any JSON> }
//! ```

pub mod json_codec;

pub use json_codec::{decode_message, encode_message, ProtocolError, UPDATES_TOPIC};
