pub mod cache;
pub mod service;
pub mod source;
pub mod yahoo;

#[cfg(test)]
pub mod fake;

pub use cache::TtlCache;
pub use service::{CacheStats, MarketDataService};
pub use source::MarketDataSource;
pub use yahoo::YahooClient;
