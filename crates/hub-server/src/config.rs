//! Configuration for the hub server.
//!
//! Values come from environment variables with defaults, and can be
//! overridden on the command line (see `main.rs`):
//!
//! - `HUB_BIND_ADDR`        (default: "0.0.0.0")
//! - `HUB_PORT`             (default: "8080")
//! - `HUB_BROKER`           (default: "redis"; or "memory")
//! - `HUB_REDIS_URL`        (default: "redis://127.0.0.1:6379")
//! - `HUB_MAILBOX_CAPACITY` (default: "256")

use std::env;
use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Which broker transport to run against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BrokerKind {
    Redis,
    /// In-process broker; only `/publish` on this same server feeds it.
    Memory,
}

impl FromStr for BrokerKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "redis" => Ok(BrokerKind::Redis),
            "memory" => Ok(BrokerKind::Memory),
            other => Err(ConfigError::UnknownBroker(other.to_string())),
        }
    }
}

impl fmt::Display for BrokerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrokerKind::Redis => write!(f, "redis"),
            BrokerKind::Memory => write!(f, "memory"),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// IP address / interface to bind to (e.g. "0.0.0.0" or "127.0.0.1").
    pub bind_addr: String,

    /// HTTP port serving `/ws`, `/health` and `/publish`.
    pub port: u16,

    pub broker: BrokerKind,

    /// `redis://[:password@]host:port[/db]`
    pub redis_url: String,

    /// Undelivered payloads a client may have queued before it is evicted.
    pub mailbox_capacity: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            bind_addr: "0.0.0.0".to_string(),
            port: 8080,
            broker: BrokerKind::Redis,
            redis_url: "redis://127.0.0.1:6379".to_string(),
            mailbox_capacity: 256,
        }
    }
}

impl Config {
    /// Construct a `Config` from environment variables, falling back
    /// to defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_source(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`], reading variables through `lookup`.
    pub fn from_source<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();
        let config = Config {
            bind_addr: lookup("HUB_BIND_ADDR").unwrap_or(defaults.bind_addr),
            port: read_or_default(&lookup, "HUB_PORT", defaults.port)?,
            broker: read_or_default(&lookup, "HUB_BROKER", defaults.broker)?,
            redis_url: lookup("HUB_REDIS_URL").unwrap_or(defaults.redis_url),
            mailbox_capacity: read_or_default(
                &lookup,
                "HUB_MAILBOX_CAPACITY",
                defaults.mailbox_capacity,
            )?,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.mailbox_capacity == 0 {
            return Err(ConfigError::Invalid {
                key: "mailbox_capacity",
                message: "must be at least 1".to_string(),
            });
        }
        if self.broker == BrokerKind::Redis && self.redis_url.trim().is_empty() {
            return Err(ConfigError::Invalid {
                key: "redis_url",
                message: "required when broker is redis".to_string(),
            });
        }
        Ok(())
    }

    /// Convenience: `addr:port` socket string.
    pub fn socket_addr_string(&self) -> String {
        format!("{}:{}", self.bind_addr, self.port)
    }
}

fn read_or_default<F, T>(lookup: &F, key: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        Some(val) => val.trim().parse::<T>().map_err(|e| ConfigError::Invalid {
            key,
            message: format!("{val:?}: {e}"),
        }),
        None => Ok(default),
    }
}
