pub mod error;
#[cfg(any(test, feature = "test-util"))]
pub mod memory;
pub mod models;
pub mod pagination;
pub mod pool;
pub mod repository;
pub mod store;

pub use sqlx;

pub use error::*;
pub use models::*;
pub use pagination::{paginate_products, Page, PageRequest, PaginationInfo};
pub use pool::{CatalogPool, DatabaseConfig};
pub use repository::*;
pub use store::*;
