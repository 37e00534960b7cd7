use super::{page_window, BestSellerSource};
use crate::error::SourceResult;
use crate::models::{CategoryId, ProductId, ReportPeriod, StoreId};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::debug;

/// Best sellers read from the pre-aggregated sales report table.
///
/// Table: `sales_bestsellers_aggregated`
/// (period, period_start, store_id, product_id, qty_ordered)
///
/// The category filter is an `EXISTS` on `catalog_category_product` so a
/// product linked to the category twice still yields a single row.
pub struct PgBestSellerSource {
    pool: PgPool,
}

const TOP_SELLERS_SQL: &str = r#"
    SELECT b.product_id
    FROM sales_bestsellers_aggregated b
    WHERE b.period = $1
      AND b.period_start = $2
      AND b.store_id = $3
      AND ($4::BIGINT IS NULL OR EXISTS (
          SELECT 1 FROM catalog_category_product c
          WHERE c.product_id = b.product_id AND c.category_id = $4
      ))
    ORDER BY b.qty_ordered DESC, b.product_id ASC
    LIMIT $5 OFFSET $6
"#;

impl PgBestSellerSource {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch(
        &self,
        store: StoreId,
        category: Option<CategoryId>,
        period: ReportPeriod,
        period_start: NaiveDate,
        limit: i64,
        offset: i64,
    ) -> SourceResult<Vec<ProductId>> {
        let rows: Vec<(i64,)> = sqlx::query_as(TOP_SELLERS_SQL)
            .bind(period.as_str())
            .bind(period_start)
            .bind(store.get())
            .bind(category.map(CategoryId::get))
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|(id,)| ProductId(id)).collect())
    }
}

#[async_trait]
impl BestSellerSource for PgBestSellerSource {
    async fn top_sellers(
        &self,
        store: StoreId,
        category: Option<CategoryId>,
        period: ReportPeriod,
        page_size: i32,
        page: i32,
    ) -> SourceResult<Vec<ProductId>> {
        let Some((offset, limit)) = page_window(page_size, page) else {
            return Ok(Vec::new());
        };

        let period_start = period.period_start(Utc::now().date_naive());
        let ids = self
            .fetch(store, category, period, period_start, limit, offset)
            .await?;

        debug!(
            store_id = %store,
            category_id = ?category,
            period = %period,
            %period_start,
            count = ids.len(),
            "Fetched best sellers"
        );

        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_orders_by_quantity_and_pages() {
        assert!(TOP_SELLERS_SQL.contains("ORDER BY b.qty_ordered DESC"));
        assert!(TOP_SELLERS_SQL.contains("LIMIT $5 OFFSET $6"));
    }

    #[tokio::test]
    async fn test_non_positive_page_size_skips_database() {
        // connect_lazy never dials out, so an empty result proves no query ran.
        let pool = PgPool::connect_lazy("postgres://localhost/unused").unwrap();
        let source = PgBestSellerSource::new(pool);

        let ids = source
            .top_sellers(StoreId(1), None, ReportPeriod::Month, 0, 1)
            .await
            .unwrap();

        assert!(ids.is_empty());
    }
}
