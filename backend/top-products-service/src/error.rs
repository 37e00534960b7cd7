//! Error types for the top products pipeline

use thiserror::Error;

/// A ranked source or catalog query failed.
#[derive(Error, Debug)]
pub enum SourceQueryError {
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Invalid source data: {0}")]
    InvalidData(String),
}

/// Failure anywhere in select → resolve. Never reaches the presentation layer.
#[derive(Error, Debug)]
pub enum SelectionError {
    #[error("best-seller query failed: {0}")]
    BestSellers(#[source] SourceQueryError),

    #[error("most-viewed query failed: {0}")]
    MostViewed(#[source] SourceQueryError),

    #[error("product resolution failed: {0}")]
    Catalog(#[source] SourceQueryError),
}

/// Configuration lookup failed. Callers fall back to defaults.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment error: {0}")]
    Env(#[from] envy::Error),

    #[error("Invalid store overrides: {0}")]
    InvalidOverrides(#[from] serde_json::Error),

    #[error("Invalid store id in overrides: {0}")]
    InvalidStoreId(String),

    #[error("Configuration unavailable: {0}")]
    Unavailable(String),
}

pub type SourceResult<T> = Result<T, SourceQueryError>;
pub type SelectionResult<T> = Result<T, SelectionError>;
