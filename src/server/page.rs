use crate::chart::to_svg;
use crate::config::DashboardConfig;
use crate::services::{Failure, Frame};

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

/// The dashboard page. The browser reloads it every refresh period, so each
/// load shows whatever frame is newest at that moment.
pub fn render_page(config: &DashboardConfig, frame: Option<&Frame>, failure: Option<&Failure>) -> String {
    let refresh_secs = config.refresh.as_secs().max(1);
    let title = format!("{} {} live", escape(&config.pair), config.interval);

    let chart = match frame {
        Some(frame) => format!(
            r#"<div id="chart">{}</div><p class="meta">tick {} &middot; {} bars &middot; fetched {}</p>"#,
            to_svg(&frame.figure),
            frame.tick,
            frame.window.len(),
            frame.fetched_at.format("%Y-%m-%d %H:%M:%S UTC")
        ),
        None => r#"<div id="chart"><p class="waiting">waiting for first window&hellip;</p></div>"#
            .to_string(),
    };

    let status = match failure {
        Some(failure) => format!(
            r#"<p class="error">last refresh failed (tick {}, {}): {}</p>"#,
            failure.tick,
            failure.at.format("%H:%M:%S"),
            escape(&failure.message)
        ),
        None => String::new(),
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta http-equiv="refresh" content="{refresh_secs}">
<title>{title}</title>
<style>body{{font-family:sans-serif;margin:20px}}.error{{color:#b00}}.meta{{color:#666}}</style>
</head>
<body>
<h1>{title}</h1>
{chart}
{status}
</body>
</html>
"#
    )
}
