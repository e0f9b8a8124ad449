//! Configuration management for the booking server.
//!
//! Loads configuration from environment variables with sensible defaults.
//! Unset or unparseable values fall back to the default.

use serde::{Deserialize, Serialize};
use slotbook_core::capacity::SLOT_CAPACITY;
use slotbook_postgres::PostgresConfig;
use std::env;
use std::str::FromStr;

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// `PostgreSQL` configuration
    pub postgres: PostgresConfig,
    /// Application server configuration
    pub server: ServerConfig,
    /// Maximum total party size per slot
    pub slot_capacity: u32,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,
    /// Port to bind to
    pub port: u16,
    /// Prometheus exporter port, exporter disabled when unset
    pub metrics_port: Option<u16>,
    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout: u64,
}

impl Config {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    #[must_use]
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let parsed = |key: &str| Parsed(lookup(key));
        let defaults = PostgresConfig::default();

        Self {
            postgres: PostgresConfig {
                url: lookup("DATABASE_URL").unwrap_or(defaults.url),
                max_connections: parsed("DATABASE_MAX_CONNECTIONS").or(defaults.max_connections),
                min_connections: parsed("DATABASE_MIN_CONNECTIONS").or(defaults.min_connections),
                connect_timeout: parsed("DATABASE_CONNECT_TIMEOUT").or(defaults.connect_timeout),
                statement_timeout: parsed("DATABASE_STATEMENT_TIMEOUT")
                    .or(defaults.statement_timeout),
                idle_timeout: parsed("DATABASE_IDLE_TIMEOUT").or(defaults.idle_timeout),
            },
            server: ServerConfig {
                host: lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string()),
                port: parsed("PORT").or(3000),
                metrics_port: parsed("METRICS_PORT").value(),
                shutdown_timeout: parsed("SHUTDOWN_TIMEOUT").or(30),
            },
            slot_capacity: parsed("SLOT_CAPACITY")
                .value()
                .filter(|capacity: &u32| *capacity > 0)
                .unwrap_or(SLOT_CAPACITY),
        }
    }

    /// Address the HTTP server binds to
    #[must_use]
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Raw value of one variable, parsed on demand.
struct Parsed(Option<String>);

impl Parsed {
    fn value<T: FromStr>(self) -> Option<T> {
        self.0.and_then(|s| s.trim().parse().ok())
    }

    fn or<T: FromStr>(self, default: T) -> T {
        self.value().unwrap_or(default)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config(vars: &[(&str, &str)]) -> Config {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        Config::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let config = config(&[]);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.server.metrics_port, None);
        assert_eq!(config.slot_capacity, 6);
        assert_eq!(config.postgres, PostgresConfig::default());
        assert_eq!(config.bind_address(), "0.0.0.0:3000");
    }

    #[test]
    fn reads_overrides() {
        let config = config(&[
            ("DATABASE_URL", "postgres://db/bookings"),
            ("DATABASE_MAX_CONNECTIONS", "25"),
            ("PORT", "8080"),
            ("METRICS_PORT", "9000"),
            ("SLOT_CAPACITY", "8"),
        ]);
        assert_eq!(config.postgres.url, "postgres://db/bookings");
        assert_eq!(config.postgres.max_connections, 25);
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.metrics_port, Some(9000));
        assert_eq!(config.slot_capacity, 8);
    }

    #[test]
    fn invalid_values_fall_back() {
        let config = config(&[("PORT", "http"), ("SLOT_CAPACITY", "0")]);
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.slot_capacity, 6);
    }
}
