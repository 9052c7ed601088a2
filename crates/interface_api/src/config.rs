//! API configuration

use std::time::Duration;

use domain_orders::adapters::DistanceMatrixConfig;
use infra_db::DatabaseConfig;
use serde::Deserialize;

/// API configuration
///
/// Loaded from `API_`-prefixed environment variables; every field has a
/// default so a bare environment still starts a local server.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Server host
    pub host: String,
    /// Server port
    pub port: u16,
    /// Database URL
    pub database_url: String,
    /// Log level
    pub log_level: String,
    /// Maximum pooled database connections
    pub db_max_connections: u32,
    /// Minimum pooled database connections
    pub db_min_connections: u32,
    /// Seconds to wait for a pooled connection
    pub db_acquire_timeout_secs: u64,
    /// Milliseconds a claim waits for an order's row lock
    pub claim_lock_timeout_ms: u64,
    /// Distance Matrix API key
    pub distance_api_key: String,
    /// Distance Matrix base URL
    pub distance_base_url: String,
    /// Distance lookup timeout in seconds
    pub distance_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        let distance = DistanceMatrixConfig::default();
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            database_url: "postgres://localhost/delivery".to_string(),
            log_level: "info".to_string(),
            db_max_connections: 10,
            db_min_connections: 2,
            db_acquire_timeout_secs: 30,
            claim_lock_timeout_ms: 5_000,
            distance_api_key: distance.api_key,
            distance_base_url: distance.base_url,
            distance_timeout_secs: distance.timeout_secs,
        }
    }
}

impl ApiConfig {
    /// Loads configuration from environment
    pub fn from_env() -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::Environment::with_prefix("API"))
            .build()?
            .try_deserialize()
    }

    /// Returns the server address
    pub fn server_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Connection pool settings
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.db_max_connections)
            .min_connections(self.db_min_connections)
            .acquire_timeout(Duration::from_secs(self.db_acquire_timeout_secs))
            .claim_lock_timeout(Duration::from_millis(self.claim_lock_timeout_ms))
    }

    /// Distance provider settings
    pub fn distance_config(&self) -> DistanceMatrixConfig {
        DistanceMatrixConfig {
            base_url: self.distance_base_url.clone(),
            api_key: self.distance_api_key.clone(),
            timeout_secs: self.distance_timeout_secs,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ApiConfig::default();
        assert_eq!(config.server_addr(), "0.0.0.0:8080");

        let db = config.database_config();
        assert_eq!(db.max_connections, 10);
        assert_eq!(db.claim_lock_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_distance_config() {
        let config = ApiConfig {
            distance_api_key: "key".to_string(),
            distance_timeout_secs: 3,
            ..ApiConfig::default()
        };

        let distance = config.distance_config();
        assert_eq!(distance.api_key, "key");
        assert_eq!(distance.timeout_secs, 3);
    }
}
