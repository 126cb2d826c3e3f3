//! Listener and top-level server wiring.
//!
//! This module:
//! - builds the configured broker,
//! - starts the hub task (subscribing to the updates topic),
//! - serves the HTTP/WebSocket router until Ctrl-C,
//! - closes the broker on the way out.

use std::sync::Arc;

use hub_broker::{Broker, MemoryBroker, RedisBroker};
use tokio::net::TcpListener;
use tracing::{error, info};

use crate::config::{BrokerKind, Config};
use crate::error::ServerError;
use crate::hub_task::start_hub;
use crate::routes::build_router;
use crate::types::AppState;

/// Connect to the broker selected in `config`.
pub async fn build_broker(config: &Config) -> Result<Arc<dyn Broker>, ServerError> {
    let broker: Arc<dyn Broker> = match config.broker {
        BrokerKind::Redis => Arc::new(RedisBroker::connect(&config.redis_url).await?),
        BrokerKind::Memory => Arc::new(MemoryBroker::new()),
    };
    Ok(broker)
}

/// Run the server with the given configuration.
pub async fn run(config: Config) -> Result<(), ServerError> {
    let broker = build_broker(&config).await?;
    let result = serve(&config, broker.clone()).await;

    if let Err(e) = broker.close().await {
        error!("failed to close broker: {}", e);
    }
    result
}

/// Start the hub on `broker` and serve until shutdown.
pub async fn serve(config: &Config, broker: Arc<dyn Broker>) -> Result<(), ServerError> {
    let hub = start_hub(broker.as_ref()).await?;

    let state = AppState {
        hub,
        broker,
        mailbox_capacity: config.mailbox_capacity,
    };

    let addr = config.socket_addr_string();
    let listener = TcpListener::bind(&addr).await?;
    info!("listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for Ctrl-C: {}", e);
        // Without a signal handler there is nothing to wait on; keep serving.
        std::future::pending::<()>().await;
    }
    info!("shutdown requested");
}
