mod errors;
mod hyperliquid;
mod simulated;

pub use errors::{SimulationError, SourceError};
pub use hyperliquid::HyperliquidSource;
pub use simulated::SimulatedSource;

use async_trait::async_trait;

use crate::models::{Interval, SeriesWindow};

/// Anything that can hand back the latest window of bars for a pair.
#[async_trait]
pub trait BarSource: Send + Sync {
    fn name(&self) -> &str;

    async fn fetch_window(
        &self,
        pair: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<SeriesWindow, SourceError>;
}
