use chrono::DateTime;

use super::figure::{Figure, Layout};

const MARGIN_LEFT: f64 = 70.0;
const MARGIN_RIGHT: f64 = 15.0;
const MARGIN_TOP: f64 = 35.0;
const MARGIN_BOTTOM: f64 = 25.0;
const PANE_GAP: f64 = 12.0;
const BODY_FILL: f64 = 0.7;
const TWO_DAYS_MS: u64 = 2 * 86_400_000;

/// A named polyline for [`line_chart`]. `None` values leave a gap.
pub struct LineSeries<'a> {
    pub name: &'a str,
    pub color: &'a str,
    pub values: &'a [Option<f64>],
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn format_ts(ts: u64, span_ms: u64) -> String {
    let fmt = if span_ms >= TWO_DAYS_MS { "%Y-%m-%d" } else { "%H:%M" };
    DateTime::from_timestamp_millis(ts as i64)
        .map(|d| d.format(fmt).to_string())
        .unwrap_or_default()
}

fn open_svg(out: &mut String, title: &str, layout: &Layout) {
    out.push_str(&format!(
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w:.0}" height="{h:.0}" viewBox="0 0 {w:.0} {h:.0}" font-family="sans-serif" font-size="11">"#,
        w = layout.width,
        h = layout.height,
    ));
    out.push_str(&format!(
        r#"<rect x="0" y="0" width="{:.0}" height="{:.0}" fill="white"/>"#,
        layout.width, layout.height
    ));
    out.push_str(&format!(
        r#"<text class="title" x="{:.1}" y="20" font-size="15">{}</text>"#,
        MARGIN_LEFT,
        escape(title)
    ));
}

fn time_labels(out: &mut String, timestamps: &[u64], x_of: impl Fn(usize) -> f64, y: f64) {
    let (Some(&first), Some(&last)) = (timestamps.first(), timestamps.last()) else {
        return;
    };
    let span = last.saturating_sub(first);
    out.push_str(&format!(
        r#"<text class="time" x="{:.2}" y="{:.2}">{}</text>"#,
        x_of(0),
        y,
        format_ts(first, span)
    ));
    if timestamps.len() > 1 {
        out.push_str(&format!(
            r#"<text class="time" x="{:.2}" y="{:.2}" text-anchor="end">{}</text>"#,
            x_of(timestamps.len() - 1),
            y,
            format_ts(last, span)
        ));
    }
}

/// Serialize a candlestick figure as a standalone SVG document.
pub fn to_svg(figure: &Figure) -> String {
    let layout = &figure.layout;
    let mut out = String::new();
    open_svg(&mut out, &figure.title, layout);

    let plot_w = (layout.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (layout.height - MARGIN_TOP - MARGIN_BOTTOM - PANE_GAP).max(1.0);
    let candle_h = plot_h * layout.candle_share;
    let volume_h = plot_h - candle_h;
    let candle_top = MARGIN_TOP;
    let volume_top = MARGIN_TOP + candle_h + PANE_GAP;

    for (top, height) in [(candle_top, candle_h), (volume_top, volume_h)] {
        out.push_str(&format!(
            r##"<rect class="pane" x="{:.1}" y="{top:.2}" width="{plot_w:.2}" height="{height:.2}" fill="none" stroke="#ccc"/>"##,
            MARGIN_LEFT
        ));
    }

    let Some((lo, hi)) = figure.price_range else {
        out.push_str(&format!(
            r#"<text class="empty" x="{:.2}" y="{:.2}" text-anchor="middle">no data</text>"#,
            MARGIN_LEFT + plot_w / 2.0,
            candle_top + candle_h / 2.0
        ));
        out.push_str("</svg>");
        return out;
    };

    let n = figure.candles.len();
    let slot = plot_w / n as f64;
    let body_w = (slot * BODY_FILL).max(1.0);
    let x_center = |i: usize| MARGIN_LEFT + slot * (i as f64 + 0.5);
    let price_y = |price: f64| {
        if hi > lo {
            candle_top + (hi - price) / (hi - lo) * candle_h
        } else {
            candle_top + candle_h / 2.0
        }
    };

    out.push_str(&format!(
        r#"<text class="axis" x="{:.1}" y="{:.2}" text-anchor="end">{hi:.2}</text>"#,
        MARGIN_LEFT - 5.0,
        candle_top + 10.0
    ));
    out.push_str(&format!(
        r#"<text class="axis" x="{:.1}" y="{:.2}" text-anchor="end">{lo:.2}</text>"#,
        MARGIN_LEFT - 5.0,
        candle_top + candle_h
    ));

    for (i, candle) in figure.candles.iter().enumerate() {
        let x = x_center(i);
        out.push_str(&format!(
            r#"<line class="wick" x1="{x:.2}" y1="{:.2}" x2="{x:.2}" y2="{:.2}" stroke="{}"/>"#,
            price_y(candle.high),
            price_y(candle.low),
            candle.color
        ));
        let top = price_y(candle.open.max(candle.close));
        let height = (price_y(candle.open.min(candle.close)) - top).max(1.0);
        out.push_str(&format!(
            r#"<rect class="body" x="{:.2}" y="{top:.2}" width="{body_w:.2}" height="{height:.2}" fill="{}"/>"#,
            x - body_w / 2.0,
            candle.color
        ));
    }

    for (i, bar) in figure.volume.iter().enumerate() {
        let height = if figure.volume_max > 0.0 {
            bar.volume / figure.volume_max * volume_h
        } else {
            0.0
        };
        out.push_str(&format!(
            r#"<rect class="volume" x="{:.2}" y="{:.2}" width="{body_w:.2}" height="{height:.2}" fill="{}"/>"#,
            x_center(i) - body_w / 2.0,
            volume_top + volume_h - height,
            bar.color
        ));
    }

    let timestamps: Vec<u64> = figure.candles.iter().map(|c| c.timestamp).collect();
    time_labels(&mut out, &timestamps, x_center, layout.height - 8.0);

    out.push_str("</svg>");
    out
}

/// Static multi-series line chart sharing one price axis.
pub fn line_chart(title: &str, timestamps: &[u64], series: &[LineSeries<'_>], layout: Layout) -> String {
    let mut out = String::new();
    open_svg(&mut out, title, &layout);

    let plot_w = (layout.width - MARGIN_LEFT - MARGIN_RIGHT).max(1.0);
    let plot_h = (layout.height - MARGIN_TOP - MARGIN_BOTTOM).max(1.0);

    let defined = series.iter().flat_map(|s| s.values.iter().flatten().copied());
    let range = defined.fold(None, |acc: Option<(f64, f64)>, v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    });
    let Some((lo, hi)) = range else {
        out.push_str("</svg>");
        return out;
    };

    let n = timestamps.len().max(series.iter().map(|s| s.values.len()).max().unwrap_or(0));
    let x_of = |i: usize| {
        if n > 1 {
            MARGIN_LEFT + plot_w * i as f64 / (n - 1) as f64
        } else {
            MARGIN_LEFT + plot_w / 2.0
        }
    };
    let y_of = |v: f64| {
        if hi > lo {
            MARGIN_TOP + (hi - v) / (hi - lo) * plot_h
        } else {
            MARGIN_TOP + plot_h / 2.0
        }
    };

    out.push_str(&format!(
        r#"<text class="axis" x="{:.1}" y="{:.2}" text-anchor="end">{hi:.2}</text>"#,
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + 10.0
    ));
    out.push_str(&format!(
        r#"<text class="axis" x="{:.1}" y="{:.2}" text-anchor="end">{lo:.2}</text>"#,
        MARGIN_LEFT - 5.0,
        MARGIN_TOP + plot_h
    ));

    for (idx, s) in series.iter().enumerate() {
        let mut segment: Vec<String> = Vec::new();
        let flush = |segment: &mut Vec<String>, out: &mut String| {
            if segment.len() > 1 {
                out.push_str(&format!(
                    r#"<polyline class="series" fill="none" stroke="{}" points="{}"/>"#,
                    s.color,
                    segment.join(" ")
                ));
            }
            segment.clear();
        };
        for (i, value) in s.values.iter().enumerate() {
            match value {
                Some(v) => segment.push(format!("{:.2},{:.2}", x_of(i), y_of(*v))),
                None => flush(&mut segment, &mut out),
            }
        }
        flush(&mut segment, &mut out);

        let legend_y = MARGIN_TOP + 14.0 * (idx as f64 + 1.0);
        out.push_str(&format!(
            r#"<text class="legend" x="{:.1}" y="{legend_y:.1}" fill="{}">{}</text>"#,
            MARGIN_LEFT + 8.0,
            s.color,
            escape(s.name)
        ));
    }

    time_labels(&mut out, timestamps, x_of, layout.height - 8.0);
    out.push_str("</svg>");
    out
}
