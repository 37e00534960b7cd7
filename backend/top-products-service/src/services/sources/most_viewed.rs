use super::{page_window, MostViewedSource};
use crate::error::SourceResult;
use crate::models::{ProductId, StoreId, ViewedProduct};
use async_trait::async_trait;
use redis::AsyncCommands;
use tracing::{debug, warn};

/// Most-viewed fallback source.
/// Reads the store-wide page-view ranking from a Redis sorted set.
///
/// Key: "v1:most_viewed:store:{store_id}"
/// Member: product id, Score: view count
pub struct RedisMostViewedSource {
    redis_client: redis::Client,
}

const KEY_VERSION: u32 = 1;

fn most_viewed_key(store: StoreId) -> String {
    format!("v{}:most_viewed:store:{}", KEY_VERSION, store)
}

impl RedisMostViewedSource {
    pub fn new(redis_client: redis::Client) -> Self {
        Self { redis_client }
    }

    /// ZREVRANGE {key} {start} {stop} WITHSCORES
    async fn get_most_viewed(
        &self,
        store: StoreId,
        start: isize,
        stop: isize,
    ) -> SourceResult<Vec<(String, f64)>> {
        let mut conn = self
            .redis_client
            .get_multiplexed_async_connection()
            .await?;

        let results: Vec<(String, f64)> = conn
            .zrevrange_withscores(most_viewed_key(store), start, stop)
            .await?;

        Ok(results)
    }
}

#[async_trait]
impl MostViewedSource for RedisMostViewedSource {
    async fn most_viewed(
        &self,
        store: StoreId,
        page_size: i32,
        page: i32,
    ) -> SourceResult<Vec<ViewedProduct>> {
        let Some((offset, limit)) = page_window(page_size, page) else {
            return Ok(Vec::new());
        };

        let start = offset as isize;
        let stop = (offset + limit - 1) as isize;
        let raw = self.get_most_viewed(store, start, stop).await?;

        if raw.is_empty() {
            debug!(store_id = %store, "No most-viewed products in Redis");
            return Ok(Vec::new());
        }

        Ok(parse_members(store, raw))
    }
}

fn parse_members(store: StoreId, raw: Vec<(String, f64)>) -> Vec<ViewedProduct> {
    raw.into_iter()
        .filter_map(|(member, score)| match member.parse::<i64>() {
            Ok(id) => Some(ViewedProduct {
                product_id: ProductId(id),
                views: score.max(0.0) as u64,
            }),
            Err(_) => {
                warn!(store_id = %store, member = %member, "Skipping non-numeric most-viewed member");
                None
            }
        })
        .collect()
}
