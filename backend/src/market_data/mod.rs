pub mod rate_limit;
pub mod series;
pub mod yahoo;

// Re-export the core types for convenient access (e.g. `use crate::market_data::PriceSeries`).
pub use rate_limit::RateLimiter;
pub use series::PriceSeries;
pub use yahoo::YahooClient;
