use std::{
    collections::BTreeMap,
    sync::atomic::{AtomicUsize, Ordering},
};

use async_trait::async_trait;

use crate::{
    error::{CatalogError, CatalogResult},
    models::{Department, Product},
    store::CatalogStore,
};

/// In-process [`CatalogStore`] with the same join and ordering rules as the
/// PostgreSQL store, for router and pagination tests.
#[derive(Debug, Default)]
pub struct MemoryCatalogStore {
    departments: BTreeMap<i64, Department>,
    products: BTreeMap<i64, (Product, Option<i64>)>,
    failing: bool,
    queries: AtomicUsize,
}

impl MemoryCatalogStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_department(mut self, id: i64, name: &str, product_count: i64) -> Self {
        self.departments.insert(
            id,
            Department {
                id,
                name: name.to_string(),
                product_count,
            },
        );
        self
    }

    /// Adds a product referencing `department_id`. The `department` field of
    /// the given product is ignored and resolved on read.
    pub fn with_product(mut self, product: Product, department_id: Option<i64>) -> Self {
        self.products.insert(product.id, (product, department_id));
        self
    }

    /// Appends `count` products with consecutive ids after the current highest.
    pub fn with_numbered_products(mut self, count: i64, department_id: i64) -> Self {
        let start = self.products.keys().next_back().copied().unwrap_or(0) + 1;
        for id in start..start + count {
            let product = Product {
                id,
                cost: Some(id as f64 * 1.5),
                category: Some("Accessories".to_string()),
                name: Some(format!("Product {id}")),
                brand: Some("Acme".to_string()),
                retail_price: Some(id as f64 * 3.0),
                department: None,
                sku: Some(format!("SKU-{id:06}")),
                distribution_center_id: Some(1),
            };
            self.products.insert(id, (product, Some(department_id)));
        }
        self
    }

    /// Makes every subsequent call fail with a store error.
    pub fn failing(mut self) -> Self {
        self.failing = true;
        self
    }

    /// Number of store calls served so far, including failed ones.
    pub fn queries_issued(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin(&self) -> CatalogResult<()> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.failing {
            return Err(CatalogError::Store(sqlx::Error::Protocol(
                "simulated store failure".to_string(),
            )));
        }
        Ok(())
    }

    fn resolve(&self, product: &Product, department_id: Option<i64>) -> Product {
        let mut resolved = product.clone();
        resolved.department = department_id
            .and_then(|id| self.departments.get(&id))
            .map(|department| department.name.clone());
        resolved
    }
}

#[async_trait]
impl CatalogStore for MemoryCatalogStore {
    async fn count_products(&self) -> CatalogResult<i64> {
        self.begin()?;
        Ok(self.products.len() as i64)
    }

    async fn list_products(&self, limit: i64, offset: i64) -> CatalogResult<Vec<Product>> {
        self.begin()?;
        Ok(self
            .products
            .values()
            .skip(offset.max(0) as usize)
            .take(limit.max(0) as usize)
            .map(|(product, department_id)| self.resolve(product, *department_id))
            .collect())
    }

    async fn get_product(&self, id: i64) -> CatalogResult<Product> {
        self.begin()?;
        self.products
            .get(&id)
            .map(|(product, department_id)| self.resolve(product, *department_id))
            .ok_or(CatalogError::ProductNotFound(id))
    }

    async fn list_departments(&self) -> CatalogResult<Vec<Department>> {
        self.begin()?;
        Ok(self.departments.values().cloned().collect())
    }

    async fn get_department(&self, id: i64) -> CatalogResult<Department> {
        self.begin()?;
        self.departments
            .get(&id)
            .cloned()
            .ok_or(CatalogError::DepartmentNotFound(id))
    }

    async fn list_products_by_department(&self, department_id: i64) -> CatalogResult<Vec<Product>> {
        self.begin()?;
        if !self.departments.contains_key(&department_id) {
            return Ok(Vec::new());
        }
        Ok(self
            .products
            .values()
            .filter(|(_, owner)| *owner == Some(department_id))
            .map(|(product, owner)| self.resolve(product, *owner))
            .collect())
    }

    async fn ping(&self) -> CatalogResult<()> {
        self.begin()
    }
}
