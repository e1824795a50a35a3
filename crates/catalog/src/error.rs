use thiserror::Error;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Product with ID {0} not found.")]
    ProductNotFound(i64),

    #[error("Department not found")]
    DepartmentNotFound(i64),

    #[error("Page {page} not found. Total available pages: {total_pages}.")]
    PageNotFound { page: i64, total_pages: i64 },

    #[error("{0}")]
    InvalidInput(String),

    #[error("Timed out waiting for a pooled database connection")]
    PoolExhausted,

    #[error("Database error: {0}")]
    Store(#[source] sqlx::Error),
}

impl From<sqlx::Error> for CatalogError {
    fn from(error: sqlx::Error) -> Self {
        match error {
            sqlx::Error::PoolTimedOut => CatalogError::PoolExhausted,
            other => CatalogError::Store(other),
        }
    }
}

pub type CatalogResult<T> = Result<T, CatalogError>;
