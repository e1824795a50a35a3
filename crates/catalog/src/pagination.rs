use serde::Serialize;

use crate::{
    error::{CatalogError, CatalogResult},
    models::Product,
    store::CatalogStore,
};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MIN_LIMIT: i64 = 1;
pub const MAX_LIMIT: i64 = 100;
/// Pages beyond this are rejected outright instead of turning into huge offsets.
pub const MAX_PAGE: i64 = 1_000_000;

/// A validated `(page, limit)` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: i64, limit: i64) -> CatalogResult<Self> {
        if page > MAX_PAGE {
            return Err(CatalogError::InvalidInput(
                "Page number is too large. Maximum allowed page is 1,000,000.".to_string(),
            ));
        }
        if page < 1 {
            return Err(CatalogError::InvalidInput(
                "Page number must be at least 1.".to_string(),
            ));
        }
        if !(MIN_LIMIT..=MAX_LIMIT).contains(&limit) {
            return Err(CatalogError::InvalidInput(format!(
                "Limit must be between {} and {}.",
                MIN_LIMIT, MAX_LIMIT
            )));
        }
        Ok(Self { page, limit })
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.limit
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

/// Ceiling division in integer arithmetic. `limit` is at least 1.
pub fn total_pages(total: i64, limit: i64) -> i64 {
    (total + limit - 1) / limit
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: i64,
    pub total_pages: i64,
    pub total_products: i64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub limit: i64,
    pub offset: i64,
}

impl PaginationInfo {
    fn empty(request: PageRequest) -> Self {
        Self {
            current_page: request.page,
            total_pages: 0,
            total_products: 0,
            has_next_page: false,
            has_prev_page: false,
            limit: request.limit,
            offset: request.offset(),
        }
    }

    fn within(request: PageRequest, total: i64, pages: i64) -> Self {
        Self {
            current_page: request.page,
            total_pages: pages,
            total_products: total,
            has_next_page: request.page < pages,
            has_prev_page: request.page > 1,
            limit: request.limit,
            offset: request.offset(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: PaginationInfo,
}

/// Resolves one page of the product listing.
///
/// An empty catalog yields an empty page for any requested page number; a
/// non-empty catalog rejects pages past the end with
/// [`CatalogError::PageNotFound`]. Count and fetch run as two independent
/// queries, so the total can lag behind the rows under concurrent writes.
pub async fn paginate_products(
    store: &dyn CatalogStore,
    request: PageRequest,
) -> CatalogResult<Page<Product>> {
    let total = store.count_products().await?;

    if total == 0 {
        return Ok(Page {
            items: Vec::new(),
            pagination: PaginationInfo::empty(request),
        });
    }

    let pages = total_pages(total, request.limit);
    if request.page > pages {
        return Err(CatalogError::PageNotFound {
            page: request.page,
            total_pages: pages,
        });
    }

    let items = store.list_products(request.limit, request.offset()).await?;

    Ok(Page {
        items,
        pagination: PaginationInfo::within(request, total, pages),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryCatalogStore;

    fn catalog(products: i64) -> MemoryCatalogStore {
        MemoryCatalogStore::new()
            .with_department(1, "Women", products)
            .with_numbered_products(products, 1)
    }

    #[test]
    fn offset_is_zero_based() {
        assert_eq!(PageRequest::new(1, 10).unwrap().offset(), 0);
        assert_eq!(PageRequest::new(3, 10).unwrap().offset(), 20);
        assert_eq!(PageRequest::new(7, 25).unwrap().offset(), 150);
    }

    #[test]
    fn request_bounds() {
        assert!(PageRequest::new(0, 10).is_err());
        assert!(PageRequest::new(-3, 10).is_err());
        assert!(PageRequest::new(1, 0).is_err());
        assert!(PageRequest::new(1, 101).is_err());
        assert!(PageRequest::new(1, 100).is_ok());
        assert!(PageRequest::new(MAX_PAGE, 1).is_ok());
    }

    #[test]
    fn oversized_page_is_invalid_input() {
        let err = PageRequest::new(MAX_PAGE + 1, 10).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidInput(_)));
        assert_eq!(
            err.to_string(),
            "Page number is too large. Maximum allowed page is 1,000,000."
        );
    }

    #[test]
    fn ceiling_division() {
        assert_eq!(total_pages(0, 10), 0);
        assert_eq!(total_pages(1, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(25, 10), 3);
        assert_eq!(total_pages(100, 1), 100);

        for total in 0..=250 {
            for limit in 1..=100 {
                let expected = if total % limit == 0 { total / limit } else { total / limit + 1 };
                assert_eq!(total_pages(total, limit), expected, "total={total} limit={limit}");
            }
        }
    }

    #[tokio::test]
    async fn twenty_five_products_in_pages_of_ten() {
        let store = catalog(25);

        let first = paginate_products(&store, PageRequest::new(1, 10).unwrap()).await.unwrap();
        assert_eq!(first.items.len(), 10);
        assert_eq!(first.items[0].id, 1);
        assert_eq!(first.pagination.total_pages, 3);
        assert_eq!(first.pagination.total_products, 25);
        assert!(first.pagination.has_next_page);
        assert!(!first.pagination.has_prev_page);

        let last = paginate_products(&store, PageRequest::new(3, 10).unwrap()).await.unwrap();
        assert_eq!(last.items.len(), 5);
        assert_eq!(last.items[0].id, 21);
        assert_eq!(last.pagination.offset, 20);
        assert!(!last.pagination.has_next_page);
        assert!(last.pagination.has_prev_page);

        let beyond = paginate_products(&store, PageRequest::new(4, 10).unwrap()).await;
        assert!(matches!(
            beyond,
            Err(CatalogError::PageNotFound { page: 4, total_pages: 3 })
        ));
    }

    #[tokio::test]
    async fn empty_catalog_never_reports_page_out_of_range() {
        let store = MemoryCatalogStore::new();

        for page in [1, 5, MAX_PAGE] {
            let result = paginate_products(&store, PageRequest::new(page, 10).unwrap())
                .await
                .unwrap();
            assert!(result.items.is_empty());
            assert_eq!(result.pagination.total_pages, 0);
            assert_eq!(result.pagination.total_products, 0);
            assert_eq!(result.pagination.current_page, page);
            assert!(!result.pagination.has_next_page);
            assert!(!result.pagination.has_prev_page);
        }
        // Only the count runs for an empty catalog.
        assert_eq!(store.queries_issued(), 3);
    }

    #[tokio::test]
    async fn page_sizes_cover_the_catalog_exactly() {
        for total in [1_i64, 9, 10, 11, 37] {
            let store = catalog(total);
            for limit in [1_i64, 3, 10, 100] {
                let pages = total_pages(total, limit);
                let mut seen = 0;
                for page in 1..=pages {
                    let result = paginate_products(&store, PageRequest::new(page, limit).unwrap())
                        .await
                        .unwrap();
                    let expected = limit.min(total - (page - 1) * limit);
                    assert_eq!(result.items.len() as i64, expected);
                    assert_eq!(result.pagination.has_next_page, page < pages);
                    assert_eq!(result.pagination.has_prev_page, page > 1);
                    seen += result.items.len() as i64;
                }
                assert_eq!(seen, total);

                let past_end = paginate_products(&store, PageRequest::new(pages + 1, limit).unwrap()).await;
                assert!(matches!(past_end, Err(CatalogError::PageNotFound { .. })));
            }
        }
    }

    #[tokio::test]
    async fn store_failure_propagates() {
        let store = MemoryCatalogStore::new().failing();
        let result = paginate_products(&store, PageRequest::default()).await;
        assert!(matches!(result, Err(CatalogError::Store(_))));
    }
}
