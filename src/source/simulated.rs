use async_trait::async_trait;
use chrono::Utc;
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};
use std::sync::Mutex;

use super::{BarSource, SimulationError, SourceError};
use crate::models::{Bar, Interval, SeriesWindow};

struct WalkState {
    rng: StdRng,
    price: f64,
}

/// Offline source producing a geometric random walk of bars.
///
/// The walk continues across calls, so successive windows drift the way a
/// live market would.
pub struct SimulatedSource {
    state: Mutex<WalkState>,
    returns: Normal<f64>,
}

impl SimulatedSource {
    pub fn new(initial_price: f64, volatility: f64) -> Result<Self, SimulationError> {
        Self::build(StdRng::from_os_rng(), initial_price, volatility)
    }

    pub fn with_seed(seed: u64, initial_price: f64, volatility: f64) -> Result<Self, SimulationError> {
        Self::build(StdRng::seed_from_u64(seed), initial_price, volatility)
    }

    fn build(rng: StdRng, initial_price: f64, volatility: f64) -> Result<Self, SimulationError> {
        if !(initial_price.is_finite() && initial_price > 0.0) {
            return Err(SimulationError::InvalidPrice(initial_price));
        }
        // rand_distr accepts a negative std dev, so the sign is checked here
        if !(volatility.is_finite() && volatility >= 0.0) {
            return Err(SimulationError::InvalidVolatility(volatility));
        }
        let returns = Normal::new(0.0, volatility)
            .map_err(|_| SimulationError::InvalidVolatility(volatility))?;
        Ok(Self {
            state: Mutex::new(WalkState {
                rng,
                price: initial_price,
            }),
            returns,
        })
    }

    /// Generate `limit` bars whose last bar opens at the interval boundary
    /// at or before `end_ms`.
    pub fn generate(&self, pair: &str, interval: Interval, limit: usize, end_ms: u64) -> SeriesWindow {
        let step = interval.duration_ms();
        let last_open = end_ms - end_ms % step;
        let first_open = last_open.saturating_sub(step.saturating_mul(limit.saturating_sub(1) as u64));

        let mut state = self.state.lock().unwrap_or_else(|e| e.into_inner());
        let mut bars = Vec::with_capacity(limit);
        for i in 0..limit as u64 {
            let timestamp = first_open + i * step;
            if timestamp > last_open {
                break;
            }
            let open = state.price;
            let close = open * (1.0 + self.returns.sample(&mut state.rng));
            let wick_up = self.returns.sample(&mut state.rng).abs() / 2.0;
            let wick_down = self.returns.sample(&mut state.rng).abs() / 2.0;
            let volume = 100.0 * (1.0 + self.returns.sample(&mut state.rng).abs() * 50.0);

            bars.push(Bar::new(
                timestamp,
                open,
                open.max(close) * (1.0 + wick_up),
                open.min(close) * (1.0 - wick_down),
                close,
                volume,
            ));
            state.price = close;
        }

        SeriesWindow::new(pair, interval, bars)
    }
}

#[async_trait]
impl BarSource for SimulatedSource {
    fn name(&self) -> &str {
        "simulated"
    }

    async fn fetch_window(
        &self,
        pair: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<SeriesWindow, SourceError> {
        let now = Utc::now().timestamp_millis().max(0) as u64;
        Ok(self.generate(pair, interval, limit, now))
    }
}
