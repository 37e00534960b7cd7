#![allow(dead_code)]

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use top_products_service::error::{ConfigError, SourceResult};
use top_products_service::models::{
    CategoryId, CategoryRecord, ProductId, ProductRecord, ReportPeriod, StoreId, ViewedProduct,
};
use top_products_service::services::sources::{
    BestSellerSource, ConfigProvider, MostViewedSource, ProductCatalog,
};
use top_products_service::{
    ListingRequest, ProductResolver, SourceQueryError, TopProductSelector, TopProductsListing,
};

pub const STORE: StoreId = StoreId(1);

/// Best sellers per category, with call recording.
#[derive(Default)]
pub struct StubBestSellers {
    by_category: HashMap<Option<CategoryId>, Vec<ProductId>>,
    calls: AtomicUsize,
    requested_sizes: Mutex<Vec<i32>>,
}

impl StubBestSellers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, category: Option<CategoryId>, ids: &[i64]) -> Self {
        self.by_category
            .insert(category, ids.iter().copied().map(ProductId).collect());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl BestSellerSource for StubBestSellers {
    async fn top_sellers(
        &self,
        _store: StoreId,
        category: Option<CategoryId>,
        _period: ReportPeriod,
        page_size: i32,
        _page: i32,
    ) -> SourceResult<Vec<ProductId>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_sizes.lock().unwrap().push(page_size);
        let mut ids = self.by_category.get(&category).cloned().unwrap_or_default();
        ids.truncate(page_size.max(0) as usize);
        Ok(ids)
    }
}

/// Store-wide most-viewed ranking, optionally failing.
#[derive(Default)]
pub struct StubMostViewed {
    ranking: Vec<ProductId>,
    fail: bool,
    calls: AtomicUsize,
    requested_sizes: Mutex<Vec<i32>>,
}

impl StubMostViewed {
    pub fn new(ids: &[i64]) -> Self {
        Self {
            ranking: ids.iter().copied().map(ProductId).collect(),
            ..Self::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested_sizes(&self) -> Vec<i32> {
        self.requested_sizes.lock().unwrap().clone()
    }
}

#[async_trait]
impl MostViewedSource for StubMostViewed {
    async fn most_viewed(
        &self,
        _store: StoreId,
        page_size: i32,
        _page: i32,
    ) -> SourceResult<Vec<ViewedProduct>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested_sizes.lock().unwrap().push(page_size);
        if self.fail {
            return Err(SourceQueryError::InvalidData(
                "view statistics unavailable".to_string(),
            ));
        }
        Ok(self
            .ranking
            .iter()
            .take(page_size.max(0) as usize)
            .enumerate()
            .map(|(rank, id)| ViewedProduct {
                product_id: *id,
                views: 500 - rank as u64,
            })
            .collect())
    }
}

/// Catalog backed by a map. Returns records in reverse id order to mimic
/// an engine that ignores the requested order.
#[derive(Default)]
pub struct InMemoryCatalog {
    products: HashMap<ProductId, ProductRecord>,
    categories: HashMap<CategoryId, String>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn product(mut self, id: i64, categories: &[i64]) -> Self {
        let record = ProductRecord {
            id: ProductId(id),
            sku: format!("SKU-{id}"),
            name: format!("Product {id}"),
            url_key: Some(format!("product-{id}")),
            price: Some(19.99),
            category_ids: categories.iter().copied().map(CategoryId).collect(),
        };
        self.products.insert(record.id, record);
        self
    }

    pub fn category(mut self, id: i64, name: &str) -> Self {
        self.categories.insert(CategoryId(id), name.to_string());
        self
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn find_by_ids(
        &self,
        ids: &[ProductId],
        category: Option<CategoryId>,
    ) -> SourceResult<Vec<ProductRecord>> {
        let mut found: Vec<ProductRecord> = self
            .products
            .values()
            .filter(|p| ids.contains(&p.id))
            .filter(|p| category.map_or(true, |c| p.belongs_to(c)))
            .cloned()
            .collect();
        found.sort_by(|a, b| b.id.cmp(&a.id));
        Ok(found)
    }

    async fn find_category_by_id(&self, id: CategoryId) -> SourceResult<Option<CategoryRecord>> {
        Ok(self.categories.get(&id).map(|name| CategoryRecord {
            id,
            name: name.clone(),
        }))
    }
}

pub struct FixedConfig {
    pub enabled: bool,
    pub limit: Option<u32>,
    pub unavailable: bool,
    pub status_unavailable: bool,
}

impl FixedConfig {
    pub fn enabled(limit: Option<u32>) -> Self {
        Self {
            enabled: true,
            limit,
            unavailable: false,
            status_unavailable: false,
        }
    }

    pub fn disabled() -> Self {
        Self {
            enabled: false,
            limit: None,
            unavailable: false,
            status_unavailable: false,
        }
    }
}

impl ConfigProvider for FixedConfig {
    fn is_enabled(&self, _store: StoreId) -> Result<bool, ConfigError> {
        if self.status_unavailable {
            return Err(ConfigError::Unavailable("status lookup failed".to_string()));
        }
        Ok(self.enabled)
    }

    fn limit(&self, _store: StoreId) -> Result<Option<u32>, ConfigError> {
        if self.unavailable {
            return Err(ConfigError::Unavailable("config store offline".to_string()));
        }
        Ok(self.limit)
    }
}

pub struct Harness {
    pub best_sellers: Arc<StubBestSellers>,
    pub most_viewed: Arc<StubMostViewed>,
    pub selector: Arc<TopProductSelector>,
    pub resolver: Arc<ProductResolver>,
}

impl Harness {
    pub fn new(best: StubBestSellers, viewed: StubMostViewed, catalog: InMemoryCatalog) -> Self {
        let best_sellers = Arc::new(best);
        let most_viewed = Arc::new(viewed);
        let selector = Arc::new(TopProductSelector::new(
            best_sellers.clone(),
            most_viewed.clone(),
        ));
        let resolver = Arc::new(ProductResolver::new(Arc::new(catalog)));
        Self {
            best_sellers,
            most_viewed,
            selector,
            resolver,
        }
    }

    pub fn listing(&self, config: FixedConfig, params: &[(&str, &str)]) -> TopProductsListing {
        TopProductsListing::new(
            self.selector.clone(),
            self.resolver.clone(),
            Arc::new(config),
            STORE,
            ListingRequest::from_pairs(params.iter().copied()),
        )
    }
}
