use std::{fmt, time::Duration};

use serde::{Deserialize, Serialize};
use sqlx::{
    pool::PoolConnection,
    postgres::{PgConnectOptions, PgPool, PgPoolOptions},
    Postgres,
};

use crate::error::{CatalogError, CatalogResult};

#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub host: String,
    pub port: u16,
    pub name: String,
    pub user: String,
    pub password: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// Upper bound on how long a request waits for a free connection.
    pub acquire_timeout_secs: u64,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            name: "postgres".to_string(),
            user: "postgres".to_string(),
            password: String::new(),
            min_connections: 1,
            max_connections: 20,
            acquire_timeout_secs: 30,
        }
    }
}

// Keeps the password out of startup logs.
impl fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("name", &self.name)
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("min_connections", &self.min_connections)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .finish()
    }
}

impl DatabaseConfig {
    pub fn validate(&self) -> CatalogResult<()> {
        if self.max_connections == 0 {
            return Err(CatalogError::InvalidInput(
                "Pool max size must be at least 1".to_string(),
            ));
        }
        if self.min_connections > self.max_connections {
            return Err(CatalogError::InvalidInput(format!(
                "Pool min size {} exceeds max size {}",
                self.min_connections, self.max_connections
            )));
        }
        Ok(())
    }

    pub fn connect_options(&self) -> PgConnectOptions {
        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .database(&self.name)
            .username(&self.user)
            .password(&self.password)
    }

    pub fn pool_options(&self) -> PgPoolOptions {
        PgPoolOptions::new()
            .min_connections(self.min_connections)
            .max_connections(self.max_connections)
            .acquire_timeout(Duration::from_secs(self.acquire_timeout_secs))
    }
}

/// Bounded set of reusable PostgreSQL connections shared by every request.
///
/// Connections are checked out with [`CatalogPool::acquire`]; the returned
/// guard hands the connection back when dropped, so release happens on every
/// exit path including errors and cancelled requests.
#[derive(Debug, Clone)]
pub struct CatalogPool {
    pool: PgPool,
}

impl CatalogPool {
    /// Opens the pool and verifies the store answers before returning.
    pub async fn connect(config: &DatabaseConfig) -> CatalogResult<Self> {
        config.validate()?;

        let pool = config
            .pool_options()
            .connect_with(config.connect_options())
            .await
            .map_err(|error| {
                tracing::error!(host = %config.host, port = config.port, %error, "Error connecting to database");
                CatalogError::from(error)
            })?;

        let catalog_pool = Self { pool };
        catalog_pool.ping().await?;

        tracing::info!(
            host = %config.host,
            database = %config.name,
            min = config.min_connections,
            max = config.max_connections,
            "Connected to PostgreSQL database"
        );
        Ok(catalog_pool)
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn acquire(&self) -> CatalogResult<PoolConnection<Postgres>> {
        self.pool.acquire().await.map_err(|error| {
            tracing::warn!(%error, size = self.pool.size(), "Failed to acquire database connection");
            CatalogError::from(error)
        })
    }

    pub async fn ping(&self) -> CatalogResult<()> {
        let mut conn = self.acquire().await?;
        sqlx::query("SELECT 1").execute(&mut *conn).await?;
        Ok(())
    }

    pub fn size(&self) -> u32 {
        self.pool.size()
    }

    /// Closes every connection; later acquisitions fail.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database connections closed");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_bounds_are_valid() {
        let config = DatabaseConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.min_connections, 1);
        assert_eq!(config.max_connections, 20);
    }

    #[test]
    fn min_above_max_is_rejected() {
        let config = DatabaseConfig {
            min_connections: 5,
            max_connections: 2,
            ..DatabaseConfig::default()
        };
        assert!(matches!(config.validate(), Err(CatalogError::InvalidInput(_))));
    }

    #[test]
    fn zero_max_is_rejected() {
        let config = DatabaseConfig {
            min_connections: 0,
            max_connections: 0,
            ..DatabaseConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn debug_output_redacts_password() {
        let config = DatabaseConfig {
            password: "hunter2".to_string(),
            ..DatabaseConfig::default()
        };
        let rendered = format!("{:?}", config);
        assert!(!rendered.contains("hunter2"));
        assert!(rendered.contains("<redacted>"));
    }

    #[test]
    fn pool_options_carry_configured_bounds() {
        let config = DatabaseConfig {
            min_connections: 2,
            max_connections: 7,
            acquire_timeout_secs: 3,
            ..DatabaseConfig::default()
        };
        let options = config.pool_options();
        assert_eq!(options.get_min_connections(), 2);
        assert_eq!(options.get_max_connections(), 7);
        assert_eq!(options.get_acquire_timeout(), Duration::from_secs(3));
    }

    #[tokio::test]
    async fn closed_pool_refuses_acquisition() {
        let config = DatabaseConfig {
            min_connections: 0,
            ..DatabaseConfig::default()
        };
        let pool = CatalogPool::from_pool(
            config.pool_options().connect_lazy_with(config.connect_options()),
        );
        pool.close().await;
        assert!(pool.acquire().await.is_err());
    }
}
