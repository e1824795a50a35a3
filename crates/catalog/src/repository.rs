use sqlx::{postgres::PgRow, Row};

use crate::{
    error::{CatalogError, CatalogResult},
    models::*,
    pool::CatalogPool,
};

// Columns are cast explicitly so rows decode the same way regardless of how
// the bulk loader typed the underlying table.
const PRODUCT_COLUMNS: &str = r#"
    p.id::INT8 AS id,
    p.cost::FLOAT8 AS cost,
    p.category::TEXT AS category,
    p.name::TEXT AS name,
    p.brand::TEXT AS brand,
    p.retail_price::FLOAT8 AS retail_price,
    d.department_name::TEXT AS department,
    p.sku::TEXT AS sku,
    p.distribution_center_id::INT8 AS distribution_center_id
"#;

const DEPARTMENT_COLUMNS: &str =
    "id::INT8 AS id, department_name::TEXT AS name, product_count::INT8 AS product_count";

fn product_from_row(row: &PgRow) -> Result<Product, sqlx::Error> {
    Ok(Product {
        id: row.try_get("id")?,
        cost: row.try_get("cost")?,
        category: row.try_get("category")?,
        name: row.try_get("name")?,
        brand: row.try_get("brand")?,
        retail_price: row.try_get("retail_price")?,
        department: row.try_get("department")?,
        sku: row.try_get("sku")?,
        distribution_center_id: row.try_get("distribution_center_id")?,
    })
}

fn department_from_row(row: &PgRow) -> Result<Department, sqlx::Error> {
    Ok(Department {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        product_count: row.try_get("product_count")?,
    })
}

/// Logs a driver failure with the operation that hit it and converts it.
fn store_failure(operation: &'static str) -> impl FnOnce(sqlx::Error) -> CatalogError {
    move |error| {
        tracing::error!(operation, %error, "Database error");
        CatalogError::from(error)
    }
}

#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: CatalogPool,
}

impl ProductRepository {
    pub fn new(pool: CatalogPool) -> Self {
        Self { pool }
    }

    pub async fn count(&self) -> CatalogResult<i64> {
        let mut conn = self.pool.acquire().await?;
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM products")
            .fetch_one(&mut *conn)
            .await
            .map_err(store_failure("count_products"))?;

        Ok(total)
    }

    pub async fn list(&self, limit: i64, offset: i64) -> CatalogResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN departments d ON p.department = d.id
            ORDER BY p.id ASC
            LIMIT $1 OFFSET $2
            "#
        );

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await
            .map_err(store_failure("list_products"))?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_failure("list_products"))
    }

    pub async fn find_by_id(&self, id: i64) -> CatalogResult<Product> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            LEFT JOIN departments d ON p.department = d.id
            WHERE p.id = $1
            "#
        );

        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(store_failure("get_product"))?;

        match row {
            Some(row) => product_from_row(&row).map_err(store_failure("get_product")),
            None => Err(CatalogError::ProductNotFound(id)),
        }
    }

    /// Products of one department. The caller checks the department exists.
    pub async fn list_by_department(&self, department_id: i64) -> CatalogResult<Vec<Product>> {
        let sql = format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products p
            JOIN departments d ON p.department = d.id
            WHERE d.id = $1
            ORDER BY p.id ASC
            "#
        );

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&sql)
            .bind(department_id)
            .fetch_all(&mut *conn)
            .await
            .map_err(store_failure("list_products_by_department"))?;

        rows.iter()
            .map(product_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_failure("list_products_by_department"))
    }
}

#[derive(Debug, Clone)]
pub struct DepartmentRepository {
    pool: CatalogPool,
}

impl DepartmentRepository {
    pub fn new(pool: CatalogPool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> CatalogResult<Vec<Department>> {
        let sql = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments ORDER BY id ASC");

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&sql)
            .fetch_all(&mut *conn)
            .await
            .map_err(store_failure("list_departments"))?;

        rows.iter()
            .map(department_from_row)
            .collect::<Result<Vec<_>, _>>()
            .map_err(store_failure("list_departments"))
    }

    pub async fn find_by_id(&self, id: i64) -> CatalogResult<Department> {
        let sql = format!("SELECT {DEPARTMENT_COLUMNS} FROM departments WHERE id = $1");

        let mut conn = self.pool.acquire().await?;
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&mut *conn)
            .await
            .map_err(store_failure("get_department"))?;

        match row {
            Some(row) => department_from_row(&row).map_err(store_failure("get_department")),
            None => Err(CatalogError::DepartmentNotFound(id)),
        }
    }
}
