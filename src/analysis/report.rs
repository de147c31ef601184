use chrono::DateTime;

use super::TickerReport;
use crate::chart::svg::{line_chart, LineSeries};
use crate::chart::{render, to_svg, Layout};

pub fn format_date(ts: u64) -> String {
    DateTime::from_timestamp_millis(ts as i64)
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| "-".to_string())
}

fn pct(r: f64) -> String {
    format!("{:+.2}%", r * 100.0)
}

/// Plain-text tables: descriptive statistics of closes, then the best and
/// worst single-period returns with their dates.
pub fn format_report(reports: &[TickerReport]) -> String {
    let mut out = String::new();

    out.push_str(&format!(
        "{:<8}{:>7}{:>14}{:>14}{:>14}{:>14}{:>14}{:>14}{:>14}\n",
        "ticker", "count", "mean", "std", "min", "25%", "50%", "75%", "max"
    ));
    for report in reports {
        match &report.summary {
            Some(s) => out.push_str(&format!(
                "{:<8}{:>7}{:>14.2}{:>14.2}{:>14.2}{:>14.2}{:>14.2}{:>14.2}{:>14.2}\n",
                report.ticker, s.count, s.mean, s.std, s.min, s.p25, s.median, s.p75, s.max
            )),
            None => out.push_str(&format!("{:<8}{:>7}\n", report.ticker, 0)),
        }
    }

    out.push('\n');
    out.push_str(&format!(
        "{:<8}{:>12}{:>12}{:>12}{:>12}\n",
        "ticker", "max return", "on", "min return", "on"
    ));
    for report in reports {
        match &report.extrema {
            Some(e) => out.push_str(&format!(
                "{:<8}{:>12}{:>12}{:>12}{:>12}\n",
                report.ticker,
                pct(e.max.1),
                format_date(e.max.0),
                pct(e.min.1),
                format_date(e.min.0)
            )),
            None => out.push_str(&format!("{:<8}{:>12}\n", report.ticker, "-")),
        }
    }

    out
}

/// Close price with the rolling mean and both bands.
pub fn bollinger_chart(report: &TickerReport) -> String {
    let timestamps: Vec<u64> = report.window.bars().iter().map(|b| b.timestamp).collect();
    let closes: Vec<Option<f64>> = report.window.closes().into_iter().map(Some).collect();
    let bands = &report.bands;
    let middle_name = format!("SMA {}", bands.window);
    let upper_name = format!("+{}σ", bands.num_std);
    let lower_name = format!("-{}σ", bands.num_std);

    line_chart(
        &format!("{} close with Bollinger bands", report.ticker),
        &timestamps,
        &[
            LineSeries {
                name: "close",
                color: "black",
                values: &closes,
            },
            LineSeries {
                name: &middle_name,
                color: "blue",
                values: &bands.middle,
            },
            LineSeries {
                name: &upper_name,
                color: "gray",
                values: &bands.upper,
            },
            LineSeries {
                name: &lower_name,
                color: "gray",
                values: &bands.lower,
            },
        ],
        Layout::default(),
    )
}

pub fn candle_chart(report: &TickerReport) -> String {
    to_svg(&render(&report.window))
}
