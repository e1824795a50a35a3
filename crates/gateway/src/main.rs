use anyhow::Result;
use clap::Parser;
use shopfront_catalog::DatabaseConfig;
use shopfront_gateway::{ServerConfig, ShopfrontServer};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about = "Read-only product catalog API", long_about = None)]
struct Args {
    #[arg(long, env = "BIND_ADDRESS", default_value = "0.0.0.0")]
    bind_address: String,

    #[arg(short, long, env = "PORT", default_value_t = 8000)]
    port: u16,

    #[arg(long, env = "ENVIRONMENT", default_value = "development")]
    environment: String,

    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    log_level: String,

    #[arg(long, env = "DB_HOST", default_value = "localhost")]
    db_host: String,

    #[arg(long, env = "DB_PORT", default_value_t = 5432)]
    db_port: u16,

    #[arg(long, env = "DB_NAME", default_value = "postgres")]
    db_name: String,

    #[arg(long, env = "DB_USER", default_value = "postgres")]
    db_user: String,

    #[arg(long, env = "DB_PASSWORD", default_value = "", hide_env_values = true)]
    db_password: String,

    #[arg(long, env = "DB_POOL_MIN", default_value_t = 1)]
    db_pool_min: u32,

    #[arg(long, env = "DB_POOL_MAX", default_value_t = 20)]
    db_pool_max: u32,

    /// Seconds a request may wait for a pooled connection.
    #[arg(long, env = "DB_ACQUIRE_TIMEOUT_SECS", default_value_t = 30)]
    db_acquire_timeout_secs: u64,

    #[arg(short, long)]
    config: Option<PathBuf>,
}

impl Args {
    fn into_config(self) -> ServerConfig {
        ServerConfig {
            bind_address: self.bind_address,
            port: self.port,
            environment: self.environment,
            log_level: self.log_level,
            database: DatabaseConfig {
                host: self.db_host,
                port: self.db_port,
                name: self.db_name,
                user: self.db_user,
                password: self.db_password,
                min_connections: self.db_pool_min,
                max_connections: self.db_pool_max,
                acquire_timeout_secs: self.db_acquire_timeout_secs,
            },
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = if let Some(config_path) = args.config.clone() {
        ServerConfig::from_file(&config_path).await?
    } else {
        let config = args.into_config();
        config.database.validate()?;
        config
    };

    let server = ShopfrontServer::new(config);
    server.run().await
}
