use super::{Bar, Direction, Interval};

/// The most recent bars for one trading pair and interval.
///
/// Construction normalizes the bars: they are sorted by timestamp and
/// duplicate timestamps collapse to the last bar that was supplied, so the
/// window is always strictly increasing in time.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesWindow {
    pair: String,
    interval: Interval,
    bars: Vec<Bar>,
}

impl SeriesWindow {
    pub fn new(pair: impl Into<String>, interval: Interval, mut bars: Vec<Bar>) -> Self {
        // stable sort keeps fetch order among equal timestamps
        bars.sort_by_key(|b| b.timestamp);

        let mut deduped: Vec<Bar> = Vec::with_capacity(bars.len());
        for bar in bars {
            match deduped.last_mut() {
                Some(last) if last.timestamp == bar.timestamp => *last = bar,
                _ => deduped.push(bar),
            }
        }

        Self {
            pair: pair.into(),
            interval,
            bars: deduped,
        }
    }

    pub fn empty(pair: impl Into<String>, interval: Interval) -> Self {
        Self::new(pair, interval, Vec::new())
    }

    /// Keep only the newest `limit` bars.
    pub fn truncate_to_latest(mut self, limit: usize) -> Self {
        if self.bars.len() > limit {
            let excess = self.bars.len() - limit;
            self.bars.drain(..excess);
        }
        self
    }

    pub fn pair(&self) -> &str {
        &self.pair
    }

    pub fn interval(&self) -> Interval {
        self.interval
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn last(&self) -> Option<&Bar> {
        self.bars.last()
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn directions(&self) -> Vec<Direction> {
        self.bars.iter().map(Bar::direction).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(ts: u64, close: f64) -> Bar {
        Bar::new(ts, close, close, close, close, 1.0)
    }

    #[test]
    fn test_window_is_sorted_and_unique() {
        let window = SeriesWindow::new(
            "BTC",
            Interval::OneMinute,
            vec![bar(3, 3.0), bar(1, 1.0), bar(2, 2.0), bar(1, 1.5)],
        );

        let timestamps: Vec<u64> = window.bars().iter().map(|b| b.timestamp).collect();
        assert_eq!(timestamps, vec![1, 2, 3]);
        assert!(window.bars().windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn test_duplicate_timestamp_keeps_last_supplied() {
        let window = SeriesWindow::new(
            "BTC",
            Interval::OneMinute,
            vec![bar(5, 1.0), bar(5, 2.0), bar(5, 3.0)],
        );
        assert_eq!(window.len(), 1);
        assert_eq!(window.closes(), vec![3.0]);
    }

    #[test]
    fn test_truncate_keeps_newest() {
        let bars = (0..10).map(|i| bar(i, i as f64)).collect();
        let window = SeriesWindow::new("ETH", Interval::OneHour, bars).truncate_to_latest(3);
        assert_eq!(window.closes(), vec![7.0, 8.0, 9.0]);
        assert_eq!(window.last().map(|b| b.timestamp), Some(9));
    }

    #[test]
    fn test_empty_window() {
        let window = SeriesWindow::empty("BTC", Interval::OneMinute);
        assert!(window.is_empty());
        assert!(window.last().is_none());
        assert!(window.directions().is_empty());
    }
}
