use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shopfront_catalog::DatabaseConfig;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub bind_address: String,
    pub port: u16,
    /// Deployment name; selects the cross-origin policy.
    pub environment: String,
    pub log_level: String,
    pub database: DatabaseConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8000,
            environment: "development".to_string(),
            log_level: "info".to_string(),
            database: DatabaseConfig::default(),
        }
    }
}

impl ServerConfig {
    pub async fn from_file(path: &Path) -> Result<Self> {
        let content = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("reading config file {}", path.display()))?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ServerConfig = toml::from_str(content).context("parsing config file")?;
        config.database.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_file_keeps_defaults() {
        let config = ServerConfig::from_toml(
            r#"
            port = 9000
            environment = "production"

            [database]
            host = "db.internal"
            name = "catalog"
            max_connections = 8
            "#,
        )
        .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.environment, "production");
        assert_eq!(config.bind_address, "0.0.0.0");
        assert_eq!(config.database.host, "db.internal");
        assert_eq!(config.database.max_connections, 8);
        assert_eq!(config.database.min_connections, 1);
        assert_eq!(config.database.port, 5432);
    }

    #[test]
    fn example_config_parses() {
        let config =
            ServerConfig::from_toml(include_str!("../../../shopfront.example.toml")).unwrap();
        assert_eq!(config.database.name, "catalog");
        assert_eq!(config.database.acquire_timeout_secs, 30);
    }

    #[test]
    fn inverted_pool_bounds_are_rejected() {
        let result = ServerConfig::from_toml(
            r#"
            [database]
            min_connections = 10
            max_connections = 2
            "#,
        );
        assert!(result.is_err());
    }
}
