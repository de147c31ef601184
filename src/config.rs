use std::time::Duration;
use thiserror::Error;

use crate::models::Interval;

pub const DEFAULT_PAIR: &str = "XRP";
pub const DEFAULT_INTERVAL: Interval = Interval::OneMinute;
pub const DEFAULT_REFRESH: Duration = Duration::from_secs(5);
pub const DEFAULT_WINDOW: usize = 60;
/// Upper bound on one fetch. May exceed the refresh; the loop then skips ticks.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 8050;

pub const DEFAULT_TICKERS: [&str; 4] = ["BTC", "ETH", "SOL", "XRP"];
pub const DEFAULT_HISTORY_DAYS: usize = 365;
pub const DEFAULT_BAND_WINDOW: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

pub const SIMULATED_START_PRICE: f64 = 60_000.0;
pub const SIMULATED_VOLATILITY: f64 = 0.001;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("refresh interval must be greater than zero")]
    ZeroRefresh,
    #[error("fetch timeout must be greater than zero")]
    ZeroTimeout,
    #[error("window must hold at least one bar")]
    ZeroWindow,
    #[error("at least one ticker is required")]
    NoTickers,
}

/// Settings for the live dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardConfig {
    pub pair: String,
    pub interval: Interval,
    pub refresh: Duration,
    pub fetch_timeout: Duration,
    pub window: usize,
    pub host: String,
    pub port: u16,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            pair: DEFAULT_PAIR.to_string(),
            interval: DEFAULT_INTERVAL,
            refresh: DEFAULT_REFRESH,
            fetch_timeout: DEFAULT_FETCH_TIMEOUT,
            window: DEFAULT_WINDOW,
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl DashboardConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.refresh.is_zero() {
            return Err(ConfigError::ZeroRefresh);
        }
        if self.fetch_timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }
        if self.window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Settings for the historical batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisConfig {
    pub tickers: Vec<String>,
    pub interval: Interval,
    pub history: usize,
    pub band_window: usize,
    pub num_std: f64,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            tickers: DEFAULT_TICKERS.iter().map(|t| t.to_string()).collect(),
            interval: Interval::OneDay,
            history: DEFAULT_HISTORY_DAYS,
            band_window: DEFAULT_BAND_WINDOW,
            num_std: DEFAULT_NUM_STD,
        }
    }
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tickers.is_empty() {
            return Err(ConfigError::NoTickers);
        }
        if self.history == 0 || self.band_window == 0 {
            return Err(ConfigError::ZeroWindow);
        }
        Ok(())
    }
}
