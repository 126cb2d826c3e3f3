//! Error types for the hub core.
//!
//! Routing itself is infallible: every failure the core sees while
//! fanning out is resolved locally by evicting the client. The only
//! error surfaced by this crate is the outcome of a single mailbox
//! delivery attempt.

use thiserror::Error;

/// Why a non-blocking delivery into a client's mailbox was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DeliveryError {
    /// The mailbox is at capacity: the connection is not draining fast enough.
    #[error("mailbox full")]
    Full,

    /// The receiving half is gone: the connection's writer already stopped.
    #[error("mailbox closed")]
    Closed,
}
