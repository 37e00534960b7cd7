use crate::error::ConfigError;
use crate::models::{ReportPeriod, SourceOverlap, StoreId};
use crate::services::sources::ConfigProvider;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;

/// Prefix of every listing setting in the environment.
pub const LISTING_ENV_PREFIX: &str = "TOP_PRODUCTS_";

#[derive(Debug, Clone)]
pub struct Config {
    pub service: ServiceConfig,
    pub database: DatabaseConfig,
    pub redis: RedisConfig,
    pub listing: ListingSettings,
}

#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub service_name: String,
    pub store_id: StoreId,
}

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub max_connections: u32,
}

#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
}

/// Raw `TOP_PRODUCTS_*` variables as envy sees them.
#[derive(Debug, Deserialize)]
struct ListingEnv {
    #[serde(default)]
    enabled: bool,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    bestseller_period: ReportPeriod,
    #[serde(default)]
    source_overlap: SourceOverlap,
    #[serde(default)]
    store_overrides: Option<String>,
}

/// Per-store values that win over the store-wide defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoreOverride {
    #[serde(default)]
    pub enabled: Option<bool>,
    #[serde(default)]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, Default)]
pub struct ListingSettings {
    pub enabled: bool,
    pub limit: Option<u32>,
    pub bestseller_period: ReportPeriod,
    pub source_overlap: SourceOverlap,
    pub store_overrides: HashMap<StoreId, StoreOverride>,
}

impl ListingSettings {
    pub fn from_env() -> Result<Self, ConfigError> {
        let raw: ListingEnv = envy::prefixed(LISTING_ENV_PREFIX).from_env()?;
        Self::from_raw(raw)
    }

    pub fn from_vars<I>(vars: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let raw: ListingEnv = envy::prefixed(LISTING_ENV_PREFIX).from_iter(vars)?;
        Self::from_raw(raw)
    }

    fn from_raw(raw: ListingEnv) -> Result<Self, ConfigError> {
        let store_overrides = match raw.store_overrides.as_deref() {
            Some(json) if !json.trim().is_empty() => parse_store_overrides(json)?,
            _ => HashMap::new(),
        };

        Ok(Self {
            enabled: raw.enabled,
            limit: raw.limit,
            bestseller_period: raw.bestseller_period,
            source_overlap: raw.source_overlap,
            store_overrides,
        })
    }
}

/// `{"<store_id>": {"enabled": bool, "limit": u32}}`
fn parse_store_overrides(json: &str) -> Result<HashMap<StoreId, StoreOverride>, ConfigError> {
    let by_key: HashMap<String, StoreOverride> = serde_json::from_str(json)?;
    by_key
        .into_iter()
        .map(|(key, value)| {
            key.trim()
                .parse::<i64>()
                .map(|id| (StoreId(id), value))
                .map_err(|_| ConfigError::InvalidStoreId(key.clone()))
        })
        .collect()
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Ok(Config {
            service: ServiceConfig {
                service_name: env::var("SERVICE_NAME")
                    .unwrap_or_else(|_| "top-products-service".to_string()),
                store_id: StoreId(parse_var("STORE_ID", 1)?),
            },
            database: DatabaseConfig {
                url: env::var("DATABASE_URL")
                    .map_err(|_| ConfigError::Unavailable("DATABASE_URL must be set".to_string()))?,
                max_connections: parse_var("DATABASE_MAX_CONNECTIONS", 10)?,
            },
            redis: RedisConfig {
                url: env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            },
            listing: ListingSettings::from_env()?,
        })
    }
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::Unavailable(format!("{name} has an invalid value: {raw}"))),
        Err(_) => Ok(default),
    }
}

/// Config provider over settings loaded once at startup.
#[derive(Debug, Clone, Default)]
pub struct StaticConfigProvider {
    settings: ListingSettings,
}

impl StaticConfigProvider {
    pub fn new(settings: ListingSettings) -> Self {
        Self { settings }
    }

    fn store_override(&self, store: StoreId) -> Option<&StoreOverride> {
        self.settings.store_overrides.get(&store)
    }
}

impl ConfigProvider for StaticConfigProvider {
    fn is_enabled(&self, store: StoreId) -> Result<bool, ConfigError> {
        Ok(self
            .store_override(store)
            .and_then(|o| o.enabled)
            .unwrap_or(self.settings.enabled))
    }

    fn limit(&self, store: StoreId) -> Result<Option<u32>, ConfigError> {
        Ok(self
            .store_override(store)
            .and_then(|o| o.limit)
            .or(self.settings.limit))
    }
}
