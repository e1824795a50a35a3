use serde::Serialize;
use shopfront_catalog::{Department, PaginationInfo, Product};

/// Success envelope used by the product endpoints.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Serialize)]
pub struct ProductsPage {
    pub products: Vec<Product>,
    pub pagination: PaginationInfo,
}

#[derive(Debug, Serialize)]
pub struct DepartmentList {
    pub departments: Vec<Department>,
}

#[derive(Debug, Serialize)]
pub struct DepartmentProducts {
    pub department: String,
    pub products: Vec<Product>,
}

#[derive(Debug, Serialize)]
pub struct ServiceInfo {
    pub message: &'static str,
    pub version: &'static str,
}

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
    pub database: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}
