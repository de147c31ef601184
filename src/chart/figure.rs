use crate::models::Direction;

pub const UP_COLOR: &str = "green";
pub const DOWN_COLOR: &str = "red";

pub fn color_for(direction: Direction) -> &'static str {
    match direction {
        Direction::Up => UP_COLOR,
        Direction::Down => DOWN_COLOR,
    }
}

/// Canvas size and how it splits between the two stacked panes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Layout {
    pub width: f64,
    pub height: f64,
    /// Share of the plot height given to the candlestick pane; the volume
    /// pane gets the rest.
    pub candle_share: f64,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            width: 1000.0,
            height: 600.0,
            candle_share: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct CandleGlyph {
    pub timestamp: u64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub direction: Direction,
    pub color: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VolumeBar {
    pub timestamp: u64,
    pub volume: f64,
    pub color: &'static str,
}

/// Visual description of one window: candlesticks above, volume below.
#[derive(Debug, Clone, PartialEq)]
pub struct Figure {
    pub title: String,
    pub layout: Layout,
    pub candles: Vec<CandleGlyph>,
    pub volume: Vec<VolumeBar>,
    /// `(low, high)` across all candles, `None` when there are none.
    pub price_range: Option<(f64, f64)>,
    pub volume_max: f64,
}

impl Figure {
    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }
}
