use std::{env, net::SocketAddr, time::Duration};

use thiserror::Error;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_KEEPALIVE_SECS: u64 = 25;

#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: String,
    pub port: u16,
    pub keepalive_interval: Duration,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("PORT must be a valid u16")]
    InvalidPort,
    #[error("MCP_SSE_KEEPALIVE_SECS must be a positive integer")]
    InvalidKeepalive,
    #[error("invalid bind address or port")]
    InvalidSocket,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let read = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let bind_addr = read("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let port = read("PORT")
            .map(|value| value.parse::<u16>().map_err(|_| ConfigError::InvalidPort))
            .transpose()?
            .unwrap_or(DEFAULT_PORT);
        let keepalive_secs = read("MCP_SSE_KEEPALIVE_SECS")
            .map(|value| {
                value
                    .parse::<u64>()
                    .ok()
                    .filter(|secs| *secs > 0)
                    .ok_or(ConfigError::InvalidKeepalive)
            })
            .transpose()?
            .unwrap_or(DEFAULT_KEEPALIVE_SECS);

        let config = Self {
            bind_addr,
            port,
            keepalive_interval: Duration::from_secs(keepalive_secs),
        };

        let _ = config.bind_socket()?;
        Ok(config)
    }

    pub fn bind_socket(&self) -> Result<SocketAddr, ConfigError> {
        format!("{}:{}", self.bind_addr, self.port)
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::InvalidSocket)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect();
        move |key: &str| vars.get(key).cloned()
    }

    #[test]
    fn parse_defaults() {
        let config = Config::from_lookup(lookup(&[])).expect("config should parse");
        assert_eq!(config.bind_addr, "0.0.0.0");
        assert_eq!(config.port, 3000);
        assert_eq!(config.keepalive_interval, Duration::from_secs(25));
    }

    #[test]
    fn parse_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("BIND_ADDR", "127.0.0.1"),
            ("PORT", " 8081 "),
            ("MCP_SSE_KEEPALIVE_SECS", "5"),
        ]))
        .expect("config should parse");

        assert_eq!(
            config.bind_socket().expect("socket"),
            "127.0.0.1:8081".parse().expect("valid socket")
        );
        assert_eq!(config.keepalive_interval, Duration::from_secs(5));
    }

    #[test]
    fn invalid_port_fails() {
        let err = Config::from_lookup(lookup(&[("PORT", "70000")]))
            .expect_err("expected invalid port error");
        assert!(matches!(err, ConfigError::InvalidPort));
    }

    #[test]
    fn zero_keepalive_fails() {
        let err = Config::from_lookup(lookup(&[("MCP_SSE_KEEPALIVE_SECS", "0")]))
            .expect_err("expected invalid keepalive error");
        assert!(matches!(err, ConfigError::InvalidKeepalive));
    }

    #[test]
    fn invalid_bind_addr_fails() {
        let err = Config::from_lookup(lookup(&[("BIND_ADDR", "not an address")]))
            .expect_err("expected invalid socket error");
        assert!(matches!(err, ConfigError::InvalidSocket));
    }
}
