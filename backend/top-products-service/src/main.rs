use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use top_products_service::services::policy::{CATEGORY_PARAM, PAGE_PARAM};
use top_products_service::services::sources::{
    PgBestSellerSource, PgProductCatalog, RedisMostViewedSource,
};
use top_products_service::{
    Config, ListingRequest, ProductResolver, StaticConfigProvider, TopProductSelector,
    TopProductsListing,
};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Renders the top products block for one category page and prints it as JSON.
///
/// Request parameters come from `LISTING_CATEGORY_ID` and `LISTING_PAGE`.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let config = Config::from_env().context("Failed to load config")?;

    info!(
        "Starting {} for store {}",
        config.service.service_name, config.service.store_id
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .connect(&config.database.url)
        .await
        .context("Failed to connect to Postgres")?;
    let redis_client =
        redis::Client::open(config.redis.url.clone()).context("Failed to create Redis client")?;

    let selector = TopProductSelector::new(
        Arc::new(PgBestSellerSource::new(pool.clone())),
        Arc::new(RedisMostViewedSource::new(redis_client)),
    )
    .with_period(config.listing.bestseller_period)
    .with_overlap(config.listing.source_overlap);
    let resolver = ProductResolver::new(Arc::new(PgProductCatalog::new(pool)));
    let provider = StaticConfigProvider::new(config.listing.clone());

    let mut params = Vec::new();
    if let Ok(category) = std::env::var("LISTING_CATEGORY_ID") {
        params.push((CATEGORY_PARAM, category));
    }
    if let Ok(page) = std::env::var("LISTING_PAGE") {
        params.push((PAGE_PARAM, page));
    }

    let listing = TopProductsListing::new(
        Arc::new(selector),
        Arc::new(resolver),
        Arc::new(provider),
        config.service.store_id,
        ListingRequest::from_pairs(params),
    );

    let view = listing.render().await;
    info!(
        visible = view.visible,
        products = view.products.len(),
        "Listing rendered"
    );

    println!(
        "{}",
        serde_json::to_string_pretty(&view).context("Failed to serialize listing")?
    );

    Ok(())
}
