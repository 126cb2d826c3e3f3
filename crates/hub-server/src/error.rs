//! Error types for the hub server.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use hub_broker::BrokerError;
use hub_protocol::ProtocolError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Startup failure of the hub itself.
#[derive(Debug, Error)]
pub enum HubError {
    #[error("failed to subscribe to broker topic {topic:?}: {source}")]
    Subscribe {
        topic: &'static str,
        #[source]
        source: BrokerError,
    },
}

/// Bad configuration value.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {message}")]
    Invalid { key: &'static str, message: String },

    #[error("unknown broker kind {0:?} (expected \"redis\" or \"memory\")")]
    UnknownBroker(String),
}

/// Anything that stops the server from starting or serving.
#[derive(Debug, Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Hub(#[from] HubError),

    #[error(transparent)]
    Broker(#[from] BrokerError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Errors returned to HTTP callers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("invalid message: {0}")]
    InvalidMessage(#[source] ProtocolError),

    #[error("failed to encode message: {0}")]
    Encode(#[source] ProtocolError),

    #[error("failed to publish: {0}")]
    PublishFailed(#[source] BrokerError),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            Self::InvalidMessage(_) => StatusCode::BAD_REQUEST,
            Self::Encode(_) | Self::PublishFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            Self::InvalidMessage(_) => "INVALID_MESSAGE",
            Self::Encode(_) => "ENCODE_ERROR",
            Self::PublishFailed(_) => "PUBLISH_FAILED",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!("{}", self);
        }

        let body = json!({
            "error": {
                "code": self.code(),
                "message": self.to_string(),
            }
        });
        (status, Json(body)).into_response()
    }
}
