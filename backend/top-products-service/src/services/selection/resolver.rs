use crate::error::{SelectionError, SelectionResult};
use crate::models::{CategoryId, ProductId, ProductRecord};
use crate::services::sources::ProductCatalog;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Turns selected ids into display records.
pub struct ProductResolver {
    catalog: Arc<dyn ProductCatalog>,
}

impl ProductResolver {
    pub fn new(catalog: Arc<dyn ProductCatalog>) -> Self {
        Self { catalog }
    }

    /// Load records for `ids`, keeping only members of `category` when given.
    ///
    /// Output follows first-occurrence order of `ids`. Ids the catalog does
    /// not return, or that fall outside `category`, are dropped without
    /// backfill, so the result may be shorter than `ids`.
    pub async fn resolve(
        &self,
        ids: &[ProductId],
        category: Option<CategoryId>,
    ) -> SelectionResult<Vec<ProductRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let records = self
            .catalog
            .find_by_ids(ids, category)
            .await
            .map_err(SelectionError::Catalog)?;

        let mut by_id: HashMap<ProductId, ProductRecord> = records
            .into_iter()
            .filter(|record| category.map_or(true, |c| record.belongs_to(c)))
            .map(|record| (record.id, record))
            .collect();

        let resolved: Vec<ProductRecord> =
            ids.iter().filter_map(|id| by_id.remove(id)).collect();

        if resolved.len() < ids.len() {
            debug!(
                requested = ids.len(),
                resolved = resolved.len(),
                category_id = ?category,
                "Some selected products were not resolved"
            );
        }

        Ok(resolved)
    }

    /// Category display name, or empty when absent or unknown.
    pub async fn resolve_category_name(&self, category: Option<CategoryId>) -> String {
        let Some(category) = category else {
            return String::new();
        };

        match self.catalog.find_category_by_id(category).await {
            Ok(Some(record)) => record.name,
            Ok(None) => String::new(),
            Err(e) => {
                warn!(category_id = %category, error = %e, "Category lookup failed");
                String::new()
            }
        }
    }
}
