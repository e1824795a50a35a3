use std::sync::Arc;

use axum::{routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{compression::CompressionLayer, trace::TraceLayer};

use shopfront_catalog::CatalogStore;

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod responses;

pub use error::*;
pub use handlers::*;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn CatalogStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CatalogStore>) -> Self {
        Self { store }
    }
}

pub fn create_router() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::root))
        .route("/health", get(handlers::health_check))
        // Catalog routes
        .route("/api/products", get(handlers::list_products))
        .route("/api/products/:id", get(handlers::get_product))
        .route("/api/departments", get(handlers::list_departments))
        .route("/api/departments/:id", get(handlers::get_department))
        .route("/api/departments/:id/products", get(handlers::list_department_products))
        .fallback(handlers::endpoint_not_found)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CompressionLayer::new()),
        )
}
