use std::{net::SocketAddr, sync::Arc};

use anyhow::{Context, Result};
use axum::{
    extract::Request,
    http::{header, HeaderValue},
    middleware::{self, Next},
    response::Response,
    Router,
};
use shopfront_api::{create_router, AppState};
use shopfront_catalog::{CatalogPool, CatalogStore, PgCatalogStore};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod config;
pub mod cors;

pub use config::ServerConfig;

pub struct ShopfrontServer {
    config: ServerConfig,
}

impl ShopfrontServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    pub async fn run(self) -> Result<()> {
        self.setup_tracing()?;

        tracing::info!("Starting Shopfront server...");
        tracing::info!("Configuration: {:?}", self.config);

        // Refuse to serve without a working pool.
        let pool = CatalogPool::connect(&self.config.database)
            .await
            .context("initial database connection failed")?;
        let store = Arc::new(PgCatalogStore::new(pool.clone()));

        let app = build_app(store, &self.config.environment);

        let addr: SocketAddr = format!("{}:{}", self.config.bind_address, self.config.port)
            .parse()
            .context("invalid bind address")?;
        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Shopfront listening on http://{}", addr);
        tracing::info!("Health check available at: http://{}/health", addr);

        let served = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await;

        pool.close().await;
        served?;

        tracing::info!("Shopfront stopped");
        Ok(())
    }

    fn setup_tracing(&self) -> Result<()> {
        let filter = tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&self.config.log_level));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .context("tracing subscriber already installed")?;

        Ok(())
    }
}

/// Full application: catalog routes, cross-origin policy and security headers.
pub fn build_app(store: Arc<dyn CatalogStore>, environment: &str) -> Router {
    create_router()
        .with_state(AppState::new(store))
        .layer(cors::cors_layer(environment))
        .layer(middleware::from_fn(security_headers_middleware))
}

async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;

    let headers = response.headers_mut();
    headers.insert(
        header::STRICT_TRANSPORT_SECURITY,
        HeaderValue::from_static("max-age=31536000; includeSubDomains"),
    );
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static("default-src 'none'; frame-ancestors 'none'"),
    );
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    response
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(error) = tokio::signal::ctrl_c().await {
            tracing::error!(%error, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(error) => {
                tracing::error!(%error, "Failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
