use super::rolling_stats::{RollingStats, StatsError};

pub const DEFAULT_WINDOW: usize = 20;
pub const DEFAULT_NUM_STD: f64 = 2.0;

/// Rolling mean with `±k` standard deviation envelopes.
///
/// All three series share the leading-`None` convention of [`RollingStats`].
#[derive(Debug, Clone, PartialEq)]
pub struct BollingerBands {
    pub window: usize,
    pub num_std: f64,
    pub middle: Vec<Option<f64>>,
    pub upper: Vec<Option<f64>>,
    pub lower: Vec<Option<f64>>,
}

impl BollingerBands {
    pub fn compute(values: &[f64], window: usize, num_std: f64) -> Result<Self, StatsError> {
        let middle = RollingStats::mean(values, window)?;
        let std = RollingStats::std_dev(values, window)?;

        let (upper, lower) = middle
            .iter()
            .zip(std.iter())
            .map(|(m, s)| match (m, s) {
                (Some(m), Some(s)) => (Some(m + num_std * s), Some(m - num_std * s)),
                _ => (None, None),
            })
            .unzip();

        Ok(Self {
            window,
            num_std,
            middle,
            upper,
            lower,
        })
    }

    pub fn len(&self) -> usize {
        self.middle.len()
    }

    pub fn is_empty(&self) -> bool {
        self.middle.is_empty()
    }

    /// Number of positions where the bands are defined.
    pub fn defined(&self) -> usize {
        self.middle.iter().filter(|m| m.is_some()).count()
    }
}
