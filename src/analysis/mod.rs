//! Batch analysis over a basket of daily series: descriptive statistics,
//! return extrema and Bollinger bands.

mod report;

pub use report::{bollinger_chart, candle_chart, format_date, format_report};

use log::{info, warn};

use crate::config::AnalysisConfig;
use crate::models::SeriesWindow;
use crate::source::{BarSource, SourceError};
use crate::statistics::{describe, return_extrema, BollingerBands, ReturnExtrema, StatsError, Summary};

#[derive(Debug, Clone)]
pub struct TickerReport {
    pub ticker: String,
    pub window: SeriesWindow,
    pub summary: Option<Summary>,
    pub extrema: Option<ReturnExtrema>,
    pub bands: BollingerBands,
}

impl TickerReport {
    pub fn first_timestamp(&self) -> Option<u64> {
        self.window.bars().first().map(|b| b.timestamp)
    }

    pub fn last_timestamp(&self) -> Option<u64> {
        self.window.last().map(|b| b.timestamp)
    }
}

pub fn analyze_ticker(
    window: SeriesWindow,
    band_window: usize,
    num_std: f64,
) -> Result<TickerReport, StatsError> {
    let closes = window.closes();
    let bands = BollingerBands::compute(&closes, band_window, num_std)?;

    Ok(TickerReport {
        ticker: window.pair().to_string(),
        summary: describe(&closes),
        extrema: return_extrema(window.bars()),
        bands,
        window,
    })
}

/// Load and analyze every ticker once. Tickers that cannot be loaded are
/// logged and left out of the result.
pub async fn run(source: &dyn BarSource, config: &AnalysisConfig) -> Vec<TickerReport> {
    let mut reports = Vec::with_capacity(config.tickers.len());

    for ticker in &config.tickers {
        let window = match source
            .fetch_window(ticker, config.interval, config.history)
            .await
        {
            Ok(window) if window.is_empty() => {
                warn!(
                    "{ticker}: {}",
                    SourceError::Empty {
                        pair: ticker.clone(),
                        interval: config.interval,
                    }
                );
                continue;
            }
            Ok(window) => window,
            Err(e) => {
                warn!("{ticker}: skipped: {e}");
                continue;
            }
        };
        info!("{ticker}: loaded {} {} bars", window.len(), config.interval);

        match analyze_ticker(window, config.band_window, config.num_std) {
            Ok(report) => reports.push(report),
            Err(e) => warn!("{ticker}: skipped: {e}"),
        }
    }

    reports
}
