// Engine library root
// Chart data preparation for stock symbols, the market data sources feeding
// it, and the gRPC service exposing both.

pub mod chart;
pub mod config;
pub mod data;
pub mod error;
pub mod indicators;
pub mod services;
