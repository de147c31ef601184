pub mod analysis;
pub mod app;
pub mod chart;
pub mod cli;
pub mod config;
pub mod hyperliquid;
pub mod models;
pub mod server;
pub mod services;
pub mod source;
pub mod statistics;
