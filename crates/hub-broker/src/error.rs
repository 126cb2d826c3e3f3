use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrokerError {
    #[error("broker is closed")]
    Closed,

    #[error("redis error: {0}")]
    Redis(#[from] redis::RedisError),
}
