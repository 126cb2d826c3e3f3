//! hub-server
//!
//! WebSocket fanout server: bridges the broker's updates topic to
//! connected clients through a single hub task.

pub mod config;
pub mod connection;
pub mod error;
pub mod hub_task;
pub mod routes;
pub mod server;
pub mod types;
