pub mod listing;
pub mod policy;
pub mod selection;
pub mod sources;

pub use listing::{ListingView, TopProductsListing};
pub use policy::{ListingPolicy, ListingRequest};
pub use selection::{ProductResolver, TopProductSelector};
