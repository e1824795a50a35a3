use axum::{
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};

use shopfront_catalog::{paginate_products, Department, PageRequest, Product};

use crate::{
    error::{ApiError, ApiResult},
    extractors::{PageQuery, ResourceId},
    responses::*,
    AppState,
};

/// Largest id the store's INTEGER key column can hold.
pub const MAX_RESOURCE_ID: i64 = i32::MAX as i64;

pub const TOTAL_COUNT_HEADER: HeaderName = HeaderName::from_static("x-total-count");
pub const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");
pub const PER_PAGE_HEADER: HeaderName = HeaderName::from_static("x-per-page");

pub async fn root() -> Json<ServiceInfo> {
    Json(ServiceInfo {
        message: "Products API",
        version: env!("CARGO_PKG_VERSION"),
    })
}

pub async fn health_check(State(state): State<AppState>) -> Response {
    match state.store.ping().await {
        Ok(()) => Json(HealthStatus {
            status: "OK",
            database: "connected",
            timestamp: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
            error: None,
        })
        .into_response(),
        Err(error) => {
            tracing::error!(%error, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(HealthStatus {
                    status: "ERROR",
                    database: "disconnected",
                    timestamp: None,
                    error: Some("Database connection failed".to_string()),
                }),
            )
                .into_response()
        }
    }
}

pub async fn list_products(
    State(state): State<AppState>,
    query: PageQuery,
) -> ApiResult<Response> {
    let request = PageRequest::new(query.page, query.limit)?;

    let page = paginate_products(state.store.as_ref(), request)
        .await
        .map_err(|e| ApiError::from_catalog("fetching products", e))?;

    let mut headers = HeaderMap::new();
    headers.insert(TOTAL_COUNT_HEADER, HeaderValue::from(page.pagination.total_products));
    headers.insert(PAGE_COUNT_HEADER, HeaderValue::from(page.pagination.total_pages));
    headers.insert(PER_PAGE_HEADER, HeaderValue::from(page.pagination.limit));

    let body = ApiResponse::ok(ProductsPage {
        products: page.items,
        pagination: page.pagination,
    });

    Ok((headers, Json(body)).into_response())
}

pub async fn get_product(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<ApiResponse<Product>>> {
    validate_product_id(id)?;

    let product = state
        .store
        .get_product(id)
        .await
        .map_err(|e| ApiError::from_catalog("fetching product", e))?;

    Ok(Json(ApiResponse::ok(product)))
}

pub async fn list_departments(State(state): State<AppState>) -> ApiResult<Json<DepartmentList>> {
    let departments = state
        .store
        .list_departments()
        .await
        .map_err(|e| ApiError::from_catalog("fetching departments", e))?;

    Ok(Json(DepartmentList { departments }))
}

pub async fn get_department(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<Department>> {
    let department = find_department(&state, id, "fetching department").await?;
    Ok(Json(department))
}

pub async fn list_department_products(
    State(state): State<AppState>,
    ResourceId(id): ResourceId,
) -> ApiResult<Json<DepartmentProducts>> {
    let department = find_department(&state, id, "fetching department products").await?;

    let products = state
        .store
        .list_products_by_department(department.id)
        .await
        .map_err(|e| ApiError::from_catalog("fetching department products", e))?;

    Ok(Json(DepartmentProducts {
        department: department.name,
        products,
    }))
}

pub async fn endpoint_not_found() -> ApiError {
    ApiError::NotFound("Endpoint not found".to_string())
}

async fn find_department(state: &AppState, id: i64, action: &'static str) -> ApiResult<Department> {
    // No department can live outside the key column's range.
    if !(1..=MAX_RESOURCE_ID).contains(&id) {
        return Err(ApiError::NotFound("Department not found".to_string()));
    }

    state
        .store
        .get_department(id)
        .await
        .map_err(|e| ApiError::from_catalog(action, e))
}

fn validate_product_id(id: i64) -> ApiResult<()> {
    if id <= 0 {
        return Err(ApiError::BadRequest(
            "Invalid product ID. Product ID must be a positive integer.".to_string(),
        ));
    }

    if id > MAX_RESOURCE_ID {
        return Err(ApiError::BadRequest("Product ID is too large.".to_string()));
    }

    Ok(())
}
