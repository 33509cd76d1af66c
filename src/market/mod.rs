pub mod alphavantage;
pub mod cache;
pub mod loader;
