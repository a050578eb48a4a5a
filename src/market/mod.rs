//! Historical market data: annual return and CD issuance rate series

pub mod loader;
pub mod series;

pub use loader::load_return_series;
pub use series::{MarketYear, ReturnSeries};
