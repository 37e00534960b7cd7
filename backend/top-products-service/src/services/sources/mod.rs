mod best_seller;
mod catalog;
mod most_viewed;

use crate::error::{ConfigError, SourceResult};
use crate::models::{
    CategoryId, CategoryRecord, ProductId, ProductRecord, ReportPeriod, StoreId, ViewedProduct,
};
use async_trait::async_trait;

pub use best_seller::PgBestSellerSource;
pub use catalog::PgProductCatalog;
pub use most_viewed::RedisMostViewedSource;

/// Primary ranked source: products by aggregated sales volume.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BestSellerSource: Send + Sync {
    /// Ids ordered by descending rank, at most `page_size` of them.
    async fn top_sellers(
        &self,
        store: StoreId,
        category: Option<CategoryId>,
        period: ReportPeriod,
        page_size: i32,
        page: i32,
    ) -> SourceResult<Vec<ProductId>>;
}

/// Fallback ranked source: products by page views. Store-wide only.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MostViewedSource: Send + Sync {
    async fn most_viewed(
        &self,
        store: StoreId,
        page_size: i32,
        page: i32,
    ) -> SourceResult<Vec<ViewedProduct>>;
}

/// Product and category lookups against the catalog.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Records for `ids`, restricted to members of `category` when given.
    /// Result order is unspecified.
    async fn find_by_ids(
        &self,
        ids: &[ProductId],
        category: Option<CategoryId>,
    ) -> SourceResult<Vec<ProductRecord>>;

    async fn find_category_by_id(&self, id: CategoryId) -> SourceResult<Option<CategoryRecord>>;
}

/// Store-scoped listing settings.
#[cfg_attr(test, mockall::automock)]
pub trait ConfigProvider: Send + Sync {
    fn is_enabled(&self, store: StoreId) -> Result<bool, ConfigError>;

    /// `None` or `Some(0)` means "use the default limit".
    fn limit(&self, store: StoreId) -> Result<Option<u32>, ConfigError>;
}

/// Offset/limit for a 1-based page. `None` when nothing can be returned.
pub(crate) fn page_window(page_size: i32, page: i32) -> Option<(i64, i64)> {
    if page_size <= 0 {
        return None;
    }
    let page = i64::from(page.max(1));
    let size = i64::from(page_size);
    Some(((page - 1) * size, size))
}
