use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

macro_rules! id_newtype {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub i64);

        impl $name {
            pub fn get(self) -> i64 {
                self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<i64> for $name {
            fn from(value: i64) -> Self {
                Self(value)
            }
        }
    };
}

id_newtype!(
    /// Catalog product identifier, stable across ranking sources.
    ProductId
);
id_newtype!(
    /// Category identifier. `None` in a scope means store-wide.
    CategoryId
);
id_newtype!(
    /// Storefront / sales channel all queries are scoped to.
    StoreId
);

/// Which ranked source an id came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RankedSource {
    BestSellers, // primary, category-scoped
    MostViewed,  // fallback, store-wide
}

impl RankedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            RankedSource::BestSellers => "best_sellers",
            RankedSource::MostViewed => "most_viewed",
        }
    }
}

impl fmt::Display for RankedSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Row returned by the most-viewed source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ViewedProduct {
    pub product_id: ProductId,
    pub views: u64,
}

/// Merged selection result: best-seller ids first, most-viewed fallback after.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TopProductSet {
    ids: Vec<ProductId>,
    best_seller_count: usize,
}

impl TopProductSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub(crate) fn from_parts(best_sellers: Vec<ProductId>, most_viewed: Vec<ProductId>) -> Self {
        let best_seller_count = best_sellers.len();
        let mut ids = best_sellers;
        ids.extend(most_viewed);
        Self {
            ids,
            best_seller_count,
        }
    }

    pub fn ids(&self) -> &[ProductId] {
        &self.ids
    }

    pub fn best_sellers(&self) -> &[ProductId] {
        &self.ids[..self.best_seller_count]
    }

    pub fn most_viewed(&self) -> &[ProductId] {
        &self.ids[self.best_seller_count..]
    }

    pub fn by_source(&self, source: RankedSource) -> &[ProductId] {
        match source {
            RankedSource::BestSellers => self.best_sellers(),
            RankedSource::MostViewed => self.most_viewed(),
        }
    }

    /// Ids in merged order, tagged with the source that ranked them.
    pub fn entries(&self) -> impl Iterator<Item = (ProductId, RankedSource)> + '_ {
        self.ids.iter().enumerate().map(move |(position, id)| {
            let source = if position < self.best_seller_count {
                RankedSource::BestSellers
            } else {
                RankedSource::MostViewed
            };
            (*id, source)
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn into_ids(self) -> Vec<ProductId> {
        self.ids
    }
}

/// Display-ready product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub id: ProductId,
    pub sku: String,
    pub name: String,
    pub url_key: Option<String>,
    pub price: Option<f64>,
    pub category_ids: Vec<CategoryId>,
}

impl ProductRecord {
    pub fn belongs_to(&self, category: CategoryId) -> bool {
        self.category_ids.contains(&category)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRecord {
    pub id: CategoryId,
    pub name: String,
}

/// Number of products to show. Zero is never a valid configured value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListingLimit(u32);

impl ListingLimit {
    pub const DEFAULT: ListingLimit = ListingLimit(5);

    /// `None` and `Some(0)` fall back to [`ListingLimit::DEFAULT`].
    pub fn from_configured(configured: Option<u32>) -> Self {
        match configured {
            Some(value) if value > 0 => Self(value),
            _ => Self::DEFAULT,
        }
    }

    pub fn get(self) -> u32 {
        self.0
    }

    /// Limit as passed to the selector.
    pub fn as_i32(self) -> i32 {
        i32::try_from(self.0).unwrap_or(i32::MAX)
    }
}

impl Default for ListingLimit {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Aggregation window of the best-seller report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportPeriod {
    Day,
    #[default]
    Month,
    Year,
}

impl ReportPeriod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// First day of the calendar window containing `today`.
    pub fn period_start(&self, today: NaiveDate) -> NaiveDate {
        match self {
            Self::Day => today,
            Self::Month => today.with_day(1).unwrap_or(today),
            Self::Year => NaiveDate::from_ymd_opt(today.year(), 1, 1).unwrap_or(today),
        }
    }
}

impl fmt::Display for ReportPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How ids that both sources return are handled when merging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceOverlap {
    /// Each occurrence takes its own position.
    #[default]
    Keep,
    /// Fallback ids already picked as best sellers are dropped.
    Dedupe,
}
