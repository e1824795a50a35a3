use async_trait::async_trait;

use crate::{
    error::CatalogResult,
    models::{Department, Product},
    pool::CatalogPool,
    repository::{DepartmentRepository, ProductRepository},
};

/// Read-only query surface the HTTP layer depends on.
///
/// Every call checks out at most one connection and returns it before the
/// call completes.
#[async_trait]
pub trait CatalogStore: Send + Sync {
    async fn count_products(&self) -> CatalogResult<i64>;

    /// Products ordered by id ascending.
    async fn list_products(&self, limit: i64, offset: i64) -> CatalogResult<Vec<Product>>;

    async fn get_product(&self, id: i64) -> CatalogResult<Product>;

    /// Departments ordered by id ascending.
    async fn list_departments(&self) -> CatalogResult<Vec<Department>>;

    async fn get_department(&self, id: i64) -> CatalogResult<Department>;

    async fn list_products_by_department(&self, department_id: i64) -> CatalogResult<Vec<Product>>;

    /// Round-trips a trivial query; used by the health check.
    async fn ping(&self) -> CatalogResult<()>;
}

#[derive(Debug, Clone)]
pub struct PgCatalogStore {
    pool: CatalogPool,
    products: ProductRepository,
    departments: DepartmentRepository,
}

impl PgCatalogStore {
    pub fn new(pool: CatalogPool) -> Self {
        Self {
            products: ProductRepository::new(pool.clone()),
            departments: DepartmentRepository::new(pool.clone()),
            pool,
        }
    }

    pub fn pool(&self) -> &CatalogPool {
        &self.pool
    }
}

#[async_trait]
impl CatalogStore for PgCatalogStore {
    async fn count_products(&self) -> CatalogResult<i64> {
        self.products.count().await
    }

    async fn list_products(&self, limit: i64, offset: i64) -> CatalogResult<Vec<Product>> {
        self.products.list(limit, offset).await
    }

    async fn get_product(&self, id: i64) -> CatalogResult<Product> {
        self.products.find_by_id(id).await
    }

    async fn list_departments(&self) -> CatalogResult<Vec<Department>> {
        self.departments.list().await
    }

    async fn get_department(&self, id: i64) -> CatalogResult<Department> {
        self.departments.find_by_id(id).await
    }

    async fn list_products_by_department(&self, department_id: i64) -> CatalogResult<Vec<Product>> {
        self.products.list_by_department(department_id).await
    }

    async fn ping(&self) -> CatalogResult<()> {
        self.pool.ping().await
    }
}
