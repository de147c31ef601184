use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum StatsError {
    #[error("rolling window length must be at least 1")]
    ZeroWindow,
}

/// Trailing-window statistics.
///
/// Every output has the same length as its input. The first `window - 1`
/// positions are `None`, so a series of `n >= window` points yields exactly
/// `n - window + 1` defined values.
pub struct RollingStats;

impl RollingStats {
    pub fn mean(values: &[f64], window: usize) -> Result<Vec<Option<f64>>, StatsError> {
        Self::apply(values, window, |slice| {
            slice.iter().sum::<f64>() / slice.len() as f64
        })
    }

    /// Sample standard deviation (n - 1 denominator). A window of one has no
    /// spread and yields `0.0`.
    pub fn std_dev(values: &[f64], window: usize) -> Result<Vec<Option<f64>>, StatsError> {
        Self::apply(values, window, sample_std)
    }

    fn apply<F>(values: &[f64], window: usize, f: F) -> Result<Vec<Option<f64>>, StatsError>
    where
        F: Fn(&[f64]) -> f64,
    {
        if window == 0 {
            return Err(StatsError::ZeroWindow);
        }

        let mut out = vec![None; values.len()];
        for (end, slot) in out.iter_mut().enumerate().skip(window - 1) {
            *slot = Some(f(&values[end + 1 - window..=end]));
        }
        Ok(out)
    }
}

pub(crate) fn sample_std(values: &[f64]) -> f64 {
    if values.len() <= 1 {
        return 0.0;
    }
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|&x| (x - mean).powi(2)).sum::<f64>()
        / (values.len() - 1) as f64;
    variance.sqrt()
}
