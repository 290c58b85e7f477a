//! Store settings from the environment
//!
//! Environment binding uses the `SHOP_` prefix (`SHOP_DATABASE_URL`,
//! `SHOP_MAX_CONNECTIONS`, ...); a local `.env` file is honored when
//! present.

use serde::Deserialize;
use std::time::Duration;

use crate::pool::DatabaseConfig;

/// Store-layer settings
#[derive(Debug, Clone, Deserialize)]
pub struct StoreSettings {
    /// PostgreSQL connection string
    pub database_url: String,
    /// Maximum pool connections
    pub max_connections: u32,
    /// Minimum pool connections
    pub min_connections: u32,
    /// Connection acquire timeout in seconds
    pub connect_timeout_secs: u64,
}

impl Default for StoreSettings {
    fn default() -> Self {
        Self {
            database_url: "postgres://localhost/shop".to_string(),
            max_connections: 10,
            min_connections: 2,
            connect_timeout_secs: 30,
        }
    }
}

impl StoreSettings {
    /// Loads settings from the environment, falling back to defaults
    pub fn from_env() -> Result<Self, config::ConfigError> {
        dotenvy::dotenv().ok();

        let defaults = StoreSettings::default();
        config::Config::builder()
            .set_default("database_url", defaults.database_url)?
            .set_default("max_connections", defaults.max_connections as i64)?
            .set_default("min_connections", defaults.min_connections as i64)?
            .set_default("connect_timeout_secs", defaults.connect_timeout_secs as i64)?
            .add_source(config::Environment::with_prefix("SHOP"))
            .build()?
            .try_deserialize()
    }

    /// Builds the pool configuration these settings describe
    pub fn database_config(&self) -> DatabaseConfig {
        DatabaseConfig::new(&self.database_url)
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_build_a_pool_config() {
        let settings = StoreSettings::default();
        let config = settings.database_config();
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.connect_timeout, Duration::from_secs(30));
    }
}
