pub mod config;
pub mod error;
pub mod models;
pub mod services;

pub use config::{Config, StaticConfigProvider};
pub use error::{ConfigError, SelectionError, SourceQueryError};
pub use services::{
    ListingPolicy, ListingRequest, ListingView, ProductResolver, TopProductSelector,
    TopProductsListing,
};
