pub mod cache;
pub mod client;
pub mod resolver;

pub use cache::{CacheConfig, Clock, PriceCache, SystemClock};
pub use client::{CatalogClient, CatalogError, HttpCatalogClient, PriceRecord};
pub use resolver::{PriceResolver, ResolveError};
