use super::ProductCatalog;
use crate::error::SourceResult;
use crate::models::{CategoryId, CategoryRecord, ProductId, ProductRecord};
use async_trait::async_trait;
use sqlx::{FromRow, PgPool};
use tracing::debug;

/// Postgres-backed catalog.
///
/// Tables: `catalog_product_entity`, `catalog_category_product`,
/// `catalog_category_entity`.
pub struct PgProductCatalog {
    pool: PgPool,
}

const FIND_BY_IDS_SQL: &str = r#"
    SELECT p.id,
           p.sku,
           p.name,
           p.url_key,
           p.price::FLOAT8 AS price,
           COALESCE(
               ARRAY_AGG(cp.category_id) FILTER (WHERE cp.category_id IS NOT NULL),
               '{}'
           ) AS category_ids
    FROM catalog_product_entity p
    LEFT JOIN catalog_category_product cp ON cp.product_id = p.id
    WHERE p.id = ANY($1)
      AND ($2::BIGINT IS NULL OR EXISTS (
          SELECT 1 FROM catalog_category_product c
          WHERE c.product_id = p.id AND c.category_id = $2
      ))
    GROUP BY p.id, p.sku, p.name, p.url_key, p.price
"#;

const FIND_CATEGORY_SQL: &str = r#"
    SELECT id, name FROM catalog_category_entity WHERE id = $1
"#;

#[derive(Debug, FromRow)]
struct ProductRow {
    id: i64,
    sku: String,
    name: String,
    url_key: Option<String>,
    price: Option<f64>,
    category_ids: Vec<i64>,
}

impl From<ProductRow> for ProductRecord {
    fn from(row: ProductRow) -> Self {
        ProductRecord {
            id: ProductId(row.id),
            sku: row.sku,
            name: row.name,
            url_key: row.url_key,
            price: row.price,
            category_ids: row.category_ids.into_iter().map(CategoryId).collect(),
        }
    }
}

#[derive(Debug, FromRow)]
struct CategoryRow {
    id: i64,
    name: String,
}

impl PgProductCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProductCatalog for PgProductCatalog {
    async fn find_by_ids(
        &self,
        ids: &[ProductId],
        category: Option<CategoryId>,
    ) -> SourceResult<Vec<ProductRecord>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let raw_ids: Vec<i64> = ids.iter().map(|id| id.get()).collect();
        let rows: Vec<ProductRow> = sqlx::query_as(FIND_BY_IDS_SQL)
            .bind(raw_ids)
            .bind(category.map(CategoryId::get))
            .fetch_all(&self.pool)
            .await?;

        debug!(
            requested = ids.len(),
            found = rows.len(),
            category_id = ?category,
            "Loaded catalog products"
        );

        Ok(rows.into_iter().map(ProductRecord::from).collect())
    }

    async fn find_category_by_id(&self, id: CategoryId) -> SourceResult<Option<CategoryRecord>> {
        let row: Option<CategoryRow> = sqlx::query_as(FIND_CATEGORY_SQL)
            .bind(id.get())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(|row| CategoryRecord {
            id: CategoryId(row.id),
            name: row.name,
        }))
    }
}
