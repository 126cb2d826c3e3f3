// crates/hub-server/tests/config.rs

use std::collections::HashMap;

use hub_server::config::{BrokerKind, Config};
use hub_server::error::ConfigError;

fn from_vars(vars: &[(&str, &str)]) -> Result<Config, ConfigError> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    Config::from_source(|key| vars.get(key).cloned())
}

#[test]
fn defaults_apply_when_nothing_is_set() {
    let config = from_vars(&[]).unwrap();

    assert_eq!(config.socket_addr_string(), "0.0.0.0:8080");
    assert_eq!(config.broker, BrokerKind::Redis);
    assert_eq!(config.redis_url, "redis://127.0.0.1:6379");
    assert_eq!(config.mailbox_capacity, 256);
}

#[test]
fn environment_overrides_defaults() {
    let config = from_vars(&[
        ("HUB_BIND_ADDR", "127.0.0.1"),
        ("HUB_PORT", "9100"),
        ("HUB_BROKER", "Memory"),
        ("HUB_MAILBOX_CAPACITY", "16"),
    ])
    .unwrap();

    assert_eq!(config.socket_addr_string(), "127.0.0.1:9100");
    assert_eq!(config.broker, BrokerKind::Memory);
    assert_eq!(config.mailbox_capacity, 16);
}

#[test]
fn bad_port_is_rejected() {
    let err = from_vars(&[("HUB_PORT", "eighty")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "HUB_PORT", .. }));
}

#[test]
fn unknown_broker_is_rejected() {
    let err = from_vars(&[("HUB_BROKER", "kafka")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "HUB_BROKER", .. }));
}

#[test]
fn zero_mailbox_capacity_is_rejected() {
    let err = from_vars(&[("HUB_MAILBOX_CAPACITY", "0")]).unwrap_err();
    assert!(matches!(err, ConfigError::Invalid { key: "mailbox_capacity", .. }));
}
