use super::figure::{color_for, CandleGlyph, Figure, Layout, VolumeBar};
use crate::models::SeriesWindow;

pub fn render(window: &SeriesWindow) -> Figure {
    render_with_layout(window, Layout::default())
}

pub fn render_with_layout(window: &SeriesWindow, layout: Layout) -> Figure {
    let mut candles = Vec::with_capacity(window.len());
    let mut volume = Vec::with_capacity(window.len());
    let mut price_range: Option<(f64, f64)> = None;
    let mut volume_max: f64 = 0.0;

    for bar in window.bars() {
        let direction = bar.direction();
        let color = color_for(direction);

        candles.push(CandleGlyph {
            timestamp: bar.timestamp,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            direction,
            color,
        });
        volume.push(VolumeBar {
            timestamp: bar.timestamp,
            volume: bar.volume,
            color,
        });

        price_range = Some(match price_range {
            None => (bar.low, bar.high),
            Some((lo, hi)) => (lo.min(bar.low), hi.max(bar.high)),
        });
        volume_max = volume_max.max(bar.volume);
    }

    Figure {
        title: format!("{} {}", window.pair(), window.interval()),
        layout,
        candles,
        volume,
        price_range,
        volume_max,
    }
}
