use std::time::Duration;
use thiserror::Error;

use crate::hyperliquid;
use crate::models::Interval;

/// Failures while obtaining a window of bars.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("upstream request failed: {0}")]
    Upstream(String),

    #[error("malformed upstream data: {0}")]
    Malformed(String),

    #[error("no bars returned for {pair} {interval}")]
    Empty { pair: String, interval: Interval },

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),
}

/// Rejected parameters for the offline random walk.
#[derive(Debug, Error, PartialEq)]
pub enum SimulationError {
    #[error("volatility must be finite and non-negative, got {0}")]
    InvalidVolatility(f64),

    #[error("initial price must be finite and positive, got {0}")]
    InvalidPrice(f64),
}

impl From<hyperliquid::Error> for SourceError {
    fn from(e: hyperliquid::Error) -> Self {
        match e {
            hyperliquid::Error::JsonParse(_) | hyperliquid::Error::FloatStringParse { .. } => {
                SourceError::Malformed(e.to_string())
            }
            other => SourceError::Upstream(other.to_string()),
        }
    }
}
