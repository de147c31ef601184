use crate::models::Bar;

/// Largest and smallest single-period close-to-close return, each paired with
/// the timestamp of the bar at which it was realised.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnExtrema {
    pub max: (u64, f64),
    pub min: (u64, f64),
}

/// Simple percentage change between consecutive values, as fractions.
pub fn returns(values: &[f64]) -> Vec<f64> {
    values.windows(2).map(|w| (w[1] - w[0]) / w[0]).collect()
}

/// Ties resolve to the earliest bar. Non-finite returns (a zero close) are
/// skipped.
pub fn return_extrema(bars: &[Bar]) -> Option<ReturnExtrema> {
    let mut extrema: Option<ReturnExtrema> = None;

    for pair in bars.windows(2) {
        let r = (pair[1].close - pair[0].close) / pair[0].close;
        if !r.is_finite() {
            continue;
        }
        let point = (pair[1].timestamp, r);
        extrema = Some(match extrema {
            None => ReturnExtrema {
                max: point,
                min: point,
            },
            Some(mut e) => {
                if r > e.max.1 {
                    e.max = point;
                }
                if r < e.min.1 {
                    e.min = point;
                }
                e
            }
        });
    }

    extrema
}
