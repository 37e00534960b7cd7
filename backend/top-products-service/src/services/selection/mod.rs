mod resolver;

use crate::error::{SelectionError, SelectionResult};
use crate::models::{
    CategoryId, ProductId, RankedSource, ReportPeriod, SourceOverlap, StoreId, TopProductSet,
};
use crate::services::sources::{BestSellerSource, MostViewedSource};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, info};

pub use resolver::ProductResolver;

/// Blends best sellers with a most-viewed fallback into one bounded id list.
///
/// Best sellers are category-scoped and always come first. Most-viewed
/// ids are store-wide and only fill the slots best sellers left open; the
/// fallback source is not queried at all once best sellers meet the limit.
pub struct TopProductSelector {
    best_sellers: Arc<dyn BestSellerSource>,
    most_viewed: Arc<dyn MostViewedSource>,
    period: ReportPeriod,
    overlap: SourceOverlap,
}

impl TopProductSelector {
    pub fn new(
        best_sellers: Arc<dyn BestSellerSource>,
        most_viewed: Arc<dyn MostViewedSource>,
    ) -> Self {
        Self {
            best_sellers,
            most_viewed,
            period: ReportPeriod::default(),
            overlap: SourceOverlap::default(),
        }
    }

    pub fn with_period(mut self, period: ReportPeriod) -> Self {
        self.period = period;
        self
    }

    pub fn with_overlap(mut self, overlap: SourceOverlap) -> Self {
        self.overlap = overlap;
        self
    }

    pub async fn select(
        &self,
        store: StoreId,
        category: Option<CategoryId>,
        limit: i32,
    ) -> SelectionResult<TopProductSet> {
        if limit <= 0 {
            debug!(limit, "Non-positive limit, skipping top product selection");
            return Ok(TopProductSet::empty());
        }
        let wanted = limit as usize;

        let mut best_sellers = self
            .best_sellers
            .top_sellers(store, category, self.period, limit, 1)
            .await
            .map_err(SelectionError::BestSellers)?;
        best_sellers.truncate(wanted);

        let mut most_viewed = Vec::new();
        if best_sellers.len() < wanted {
            let remaining = wanted - best_sellers.len();
            most_viewed = self.fallback_ids(store, remaining, &best_sellers).await?;
        }

        let set = TopProductSet::from_parts(best_sellers, most_viewed);

        info!(
            store_id = %store,
            category_id = ?category,
            limit,
            best_sellers = set.by_source(RankedSource::BestSellers).len(),
            most_viewed = set.by_source(RankedSource::MostViewed).len(),
            total = set.len(),
            "Top product selection completed"
        );

        Ok(set)
    }

    async fn fallback_ids(
        &self,
        store: StoreId,
        remaining: usize,
        picked: &[ProductId],
    ) -> SelectionResult<Vec<ProductId>> {
        // remaining < limit, which already fits in i32
        let page_size = remaining as i32;
        let viewed = self
            .most_viewed
            .most_viewed(store, page_size, 1)
            .await
            .map_err(SelectionError::MostViewed)?;

        debug!(
            store_id = %store,
            source = %RankedSource::MostViewed,
            requested = remaining,
            returned = viewed.len(),
            top_views = ?viewed.first().map(|v| v.views),
            "Fallback source queried"
        );

        let mut ids: Vec<ProductId> = viewed.into_iter().map(|v| v.product_id).collect();
        ids.truncate(remaining);

        if self.overlap == SourceOverlap::Dedupe {
            let seen: HashSet<ProductId> = picked.iter().copied().collect();
            ids.retain(|id| !seen.contains(id));
        }

        Ok(ids)
    }
}
