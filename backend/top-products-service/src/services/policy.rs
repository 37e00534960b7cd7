//! Page gating and request parameters for the category listing

use crate::models::CategoryId;
use std::collections::HashMap;

/// Query parameter carrying the current category id.
pub const CATEGORY_PARAM: &str = "id";
/// Query parameter carrying the current page number.
pub const PAGE_PARAM: &str = "p";

pub struct ListingPolicy;

impl ListingPolicy {
    /// The listing only renders on the first page of a category, and only
    /// when the feature is enabled.
    pub fn should_show(page_number: i64, feature_enabled: bool) -> bool {
        if page_number > 1 {
            return false;
        }
        feature_enabled
    }
}

/// Read-only view of the current request's query parameters.
#[derive(Debug, Clone, Default)]
pub struct ListingRequest {
    params: HashMap<String, String>,
}

impl ListingRequest {
    pub fn new(params: HashMap<String, String>) -> Self {
        Self { params }
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::new(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Missing, non-numeric and non-positive ids all mean store-wide.
    pub fn category_id(&self) -> Option<CategoryId> {
        self.param(CATEGORY_PARAM)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .filter(|id| *id > 0)
            .map(CategoryId)
    }

    /// Defaults to 0 (first page) when missing or unparseable.
    pub fn page_number(&self) -> i64 {
        self.param(PAGE_PARAM)
            .and_then(|raw| raw.trim().parse::<i64>().ok())
            .unwrap_or(0)
    }
}
