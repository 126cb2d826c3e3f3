//! WebSocket fanout server for broker updates.

use anyhow::Result;
use clap::Parser;
use hub_server::config::{BrokerKind, Config};
use hub_server::server;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[clap(name = "hub-server")]
#[clap(about = "Fans broker updates out to connected WebSocket clients")]
struct Cli {
    /// Interface to bind to
    #[clap(long)]
    bind: Option<String>,

    /// HTTP port
    #[clap(short, long)]
    port: Option<u16>,

    /// Broker transport: redis or memory
    #[clap(short, long)]
    broker: Option<BrokerKind>,

    /// Redis URL, e.g. redis://:password@host:6379/0
    #[clap(long)]
    redis_url: Option<String>,

    /// Per-client mailbox capacity before eviction
    #[clap(long)]
    mailbox_capacity: Option<usize>,

    /// Enable debug logging
    #[clap(short, long)]
    debug: bool,
}

impl Cli {
    fn apply(self, mut config: Config) -> Config {
        if let Some(bind) = self.bind {
            config.bind_addr = bind;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        if let Some(broker) = self.broker {
            config.broker = broker;
        }
        if let Some(url) = self.redis_url {
            config.redis_url = url;
        }
        if let Some(capacity) = self.mailbox_capacity {
            config.mailbox_capacity = capacity;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.debug {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = cli.apply(Config::from_env()?);
    config.validate()?;

    info!(
        "starting hub-server on {} (broker = {}, mailbox_capacity = {})",
        config.socket_addr_string(),
        config.broker,
        config.mailbox_capacity
    );

    server::run(config).await?;
    Ok(())
}
