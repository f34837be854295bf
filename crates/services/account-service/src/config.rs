//! Account service configuration.

use std::env;
use std::str::FromStr;

use common::{DatabaseConfig, HasherConfig};

/// Account service configuration.
#[derive(Debug, Clone)]
pub struct AccountServiceConfig {
    /// Database connection settings
    pub database: DatabaseConfig,
    /// Argon2 cost parameters
    pub hasher: HasherConfig,
    /// Default log filter when RUST_LOG is unset
    pub log_level: String,
}

impl AccountServiceConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            database: DatabaseConfig {
                url: env::var("ACCOUNT_SERVICE_DATABASE_URL")
                    .or_else(|_| env::var("DATABASE_URL"))
                    .unwrap_or(defaults.database.url),
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS")
                    .unwrap_or(defaults.database.max_connections),
                min_connections: parse_var("DATABASE_MIN_CONNECTIONS")
                    .unwrap_or(defaults.database.min_connections),
            },
            hasher: HasherConfig {
                memory_kib: parse_var("ARGON2_MEMORY_KIB").unwrap_or(defaults.hasher.memory_kib),
                iterations: parse_var("ARGON2_ITERATIONS").unwrap_or(defaults.hasher.iterations),
                parallelism: parse_var("ARGON2_PARALLELISM")
                    .unwrap_or(defaults.hasher.parallelism),
            },
            log_level: env::var("LOG_LEVEL").unwrap_or(defaults.log_level),
        }
    }
}

impl Default for AccountServiceConfig {
    fn default() -> Self {
        Self {
            database: DatabaseConfig::default(),
            hasher: HasherConfig::default(),
            log_level: "info".to_string(),
        }
    }
}

/// Read and parse an environment variable, ignoring unset or malformed values.
fn parse_var<T: FromStr>(name: &str) -> Option<T> {
    env::var(name).ok().and_then(|v| v.parse().ok())
}
