//! HTTP surface.
//!
//! - `GET  /ws`      : WebSocket upgrade (see [`crate::connection`])
//! - `GET  /health`  : liveness plus current registry size
//! - `POST /publish` : push a broker message onto the updates topic

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use hub_protocol::{decode_message, encode_message, UPDATES_TOPIC};
use serde_json::json;
use tracing::debug;

use crate::connection;
use crate::error::ApiError;
use crate::types::AppState;

/// Build the application router with all endpoints.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/ws", get(connection::ws_handler))
        .route("/health", get(health))
        .route("/publish", post(publish))
        .with_state(state)
}

/// Always 200 while the process is up.
async fn health(State(state): State<AppState>) -> Response {
    let stats = state.hub.stats();
    let body = json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION"),
        "clients": stats.clients,
        "users": stats.users,
    });
    (StatusCode::OK, Json(body)).into_response()
}

/// Validate the body as a broker message, re-encode it, publish it.
async fn publish(State(state): State<AppState>, body: Bytes) -> Result<&'static str, ApiError> {
    let msg = decode_message(&body).map_err(ApiError::InvalidMessage)?;
    let payload = encode_message(&msg).map_err(ApiError::Encode)?;

    state
        .broker
        .publish(UPDATES_TOPIC, payload)
        .await
        .map_err(ApiError::PublishFailed)?;

    debug!("published {:?} message for {:?}", msg.kind, msg.target());
    Ok("Message published")
}
