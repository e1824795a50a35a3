use std::time::Duration;

use axum::http::{header, HeaderValue, Method};
use shopfront_api::{PAGE_COUNT_HEADER, PER_PAGE_HEADER, TOTAL_COUNT_HEADER};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

/// Front-end dev servers allowed outside production.
pub const LOCAL_ORIGINS: &[&str] = &[
    "http://localhost:3000",
    "http://localhost:3001",
    "http://localhost:8080",
    "http://localhost:8081",
    "http://localhost:4200",
    "http://localhost:5173",
    "http://localhost:5174",
    "http://127.0.0.1:3000",
    "http://127.0.0.1:8080",
    "http://127.0.0.1:4200",
    "http://127.0.0.1:5173",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginPolicy {
    Any,
    List(Vec<&'static str>),
}

impl OriginPolicy {
    pub fn for_environment(environment: &str) -> Self {
        match environment.trim().to_ascii_lowercase().as_str() {
            "production" => OriginPolicy::List(Vec::new()),
            "development" => OriginPolicy::Any,
            _ => OriginPolicy::List(LOCAL_ORIGINS.to_vec()),
        }
    }

    fn allow_origin(&self) -> AllowOrigin {
        match self {
            OriginPolicy::Any => AllowOrigin::from(Any),
            OriginPolicy::List(origins) => {
                AllowOrigin::list(origins.iter().copied().map(HeaderValue::from_static))
            }
        }
    }
}

pub fn cors_layer(environment: &str) -> CorsLayer {
    let policy = OriginPolicy::for_environment(environment);
    tracing::info!(environment, ?policy, "Configured cross-origin policy");

    CorsLayer::new()
        .allow_origin(policy.allow_origin())
        .allow_methods([Method::GET, Method::HEAD, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::ACCEPT_LANGUAGE,
            header::CONTENT_LANGUAGE,
            header::CONTENT_TYPE,
            header::CACHE_CONTROL,
        ])
        .expose_headers([TOTAL_COUNT_HEADER, PAGE_COUNT_HEADER, PER_PAGE_HEADER])
        .max_age(Duration::from_secs(3600))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::Request, routing::get, Router};
    use tower::ServiceExt;

    #[test]
    fn environment_selects_policy() {
        assert_eq!(OriginPolicy::for_environment("production"), OriginPolicy::List(vec![]));
        assert_eq!(OriginPolicy::for_environment("Development"), OriginPolicy::Any);
        assert_eq!(
            OriginPolicy::for_environment("staging"),
            OriginPolicy::List(LOCAL_ORIGINS.to_vec())
        );
    }

    async fn allowed_origin(environment: &str, origin: &str) -> Option<HeaderValue> {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(cors_layer(environment));

        let response = app
            .oneshot(
                Request::builder()
                    .uri("/")
                    .header(header::ORIGIN, origin)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .cloned()
    }

    #[tokio::test]
    async fn staging_allows_only_local_front_ends() {
        assert_eq!(
            allowed_origin("staging", "http://localhost:5173").await.unwrap(),
            "http://localhost:5173"
        );
        assert!(allowed_origin("staging", "https://evil.example").await.is_none());
    }

    #[tokio::test]
    async fn production_allows_no_origin() {
        assert!(allowed_origin("production", "http://localhost:3000").await.is_none());
    }

    #[tokio::test]
    async fn development_allows_anything() {
        assert_eq!(
            allowed_origin("development", "https://any.example").await.unwrap(),
            "*"
        );
    }
}
