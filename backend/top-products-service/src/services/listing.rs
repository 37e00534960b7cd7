use crate::error::SelectionResult;
use crate::models::{ListingLimit, ProductRecord, StoreId};
use crate::services::policy::{ListingPolicy, ListingRequest};
use crate::services::selection::{ProductResolver, TopProductSelector};
use crate::services::sources::ConfigProvider;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, warn};

/// Snapshot handed to the page template.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ListingView {
    pub visible: bool,
    pub category_name: String,
    pub products: Vec<ProductRecord>,
}

/// Per-request entry point for the category page's top products block.
///
/// Failures in selection or resolution are logged here and nowhere else;
/// callers only ever see an empty listing.
pub struct TopProductsListing {
    selector: Arc<TopProductSelector>,
    resolver: Arc<ProductResolver>,
    config: Arc<dyn ConfigProvider>,
    store: StoreId,
    request: ListingRequest,
}

impl TopProductsListing {
    pub fn new(
        selector: Arc<TopProductSelector>,
        resolver: Arc<ProductResolver>,
        config: Arc<dyn ConfigProvider>,
        store: StoreId,
        request: ListingRequest,
    ) -> Self {
        Self {
            selector,
            resolver,
            config,
            store,
            request,
        }
    }

    pub fn should_show_listing(&self) -> bool {
        let enabled = match self.config.is_enabled(self.store) {
            Ok(enabled) => enabled,
            Err(e) => {
                debug!(store_id = %self.store, error = %e, "Listing status unavailable, treating as disabled");
                false
            }
        };
        ListingPolicy::should_show(self.request.page_number(), enabled)
    }

    fn limit(&self) -> ListingLimit {
        let configured = self.config.limit(self.store).unwrap_or_else(|e| {
            debug!(store_id = %self.store, error = %e, "Listing limit unavailable, using default");
            None
        });
        ListingLimit::from_configured(configured)
    }

    async fn load(&self) -> SelectionResult<Vec<ProductRecord>> {
        let category = self.request.category_id();
        let set = self
            .selector
            .select(self.store, category, self.limit().as_i32())
            .await?;
        self.resolver.resolve(&set.into_ids(), category).await
    }

    /// `None` when the listing is gated off or anything failed.
    pub async fn try_top_products(&self) -> Option<Vec<ProductRecord>> {
        if !self.should_show_listing() {
            return None;
        }

        match self.load().await {
            Ok(products) => Some(products),
            Err(e) => {
                warn!(
                    store_id = %self.store,
                    category_id = ?self.request.category_id(),
                    error = %e,
                    "TopProductError: listing degraded to empty"
                );
                None
            }
        }
    }

    pub async fn top_products(&self) -> Vec<ProductRecord> {
        self.try_top_products().await.unwrap_or_default()
    }

    pub async fn current_category_name(&self) -> String {
        self.resolver
            .resolve_category_name(self.request.category_id())
            .await
    }

    pub async fn render(&self) -> ListingView {
        match self.try_top_products().await {
            Some(products) => ListingView {
                visible: true,
                category_name: self.current_category_name().await,
                products,
            },
            None => ListingView::default(),
        }
    }
}
