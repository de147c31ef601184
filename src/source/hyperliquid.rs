use async_trait::async_trait;
use chrono::Utc;
use log::debug;

use super::{BarSource, SourceError};
use crate::hyperliquid::{BaseUrl, InfoClient};
use crate::models::{Bar, Interval, SeriesWindow};

/// Polls candle snapshots from the Hyperliquid info endpoint.
#[derive(Debug, Clone)]
pub struct HyperliquidSource {
    client: InfoClient,
}

impl HyperliquidSource {
    pub fn new(base_url: BaseUrl) -> Self {
        Self {
            client: InfoClient::new(None, Some(base_url)),
        }
    }

    pub fn with_client(client: InfoClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl BarSource for HyperliquidSource {
    fn name(&self) -> &str {
        "hyperliquid"
    }

    async fn fetch_window(
        &self,
        pair: &str,
        interval: Interval,
        limit: usize,
    ) -> Result<SeriesWindow, SourceError> {
        let end_time = Utc::now().timestamp_millis().max(0) as u64;
        let span = interval.duration_ms().saturating_mul(limit as u64);
        let start_time = end_time.saturating_sub(span);

        let rows = self
            .client
            .candles_snapshot(
                pair.to_string(),
                interval.as_str().to_string(),
                start_time,
                end_time,
            )
            .await?;
        debug!(
            "{} returned {} rows for {pair} {interval}",
            self.client.base_url(),
            rows.len()
        );

        let bars = rows
            .iter()
            .map(|row| row.to_bar())
            .collect::<Result<Vec<Bar>, _>>()?;

        Ok(SeriesWindow::new(pair, interval, bars).truncate_to_latest(limit))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::post, Json, Router};
    use serde_json::{json, Value};

    async fn spawn_info_server(response: Value) -> String {
        let app = Router::new().route(
            "/info",
            post(move |Json(body): Json<Value>| {
                let response = response.clone();
                async move {
                    assert_eq!(body["type"], "candleSnapshot");
                    Json(response)
                }
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    fn row(t: u64, o: &str, c: &str) -> Value {
        json!({"t": t, "T": t + 59_999, "s": "BTC", "i": "1m",
               "o": o, "c": c, "h": "101", "l": "99", "v": "5", "n": 3})
    }

    #[tokio::test]
    async fn test_fetch_window_orders_and_limits_rows() {
        let url = spawn_info_server(json!([
            row(180_000, "100", "100.5"),
            row(60_000, "100", "99.5"),
            row(120_000, "100", "100"),
        ]))
        .await;
        let source = HyperliquidSource::with_client(InfoClient::with_url(None, url));

        let window = source
            .fetch_window("BTC", Interval::OneMinute, 2)
            .await
            .unwrap();

        let timestamps: Vec<u64> = window.bars().iter().map(|b| b.timestamp).collect();
        assert_eq!(timestamps, vec![120_000, 180_000]);
        assert_eq!(window.pair(), "BTC");
    }

    #[tokio::test]
    async fn test_malformed_row_is_reported() {
        let url = spawn_info_server(json!([row(60_000, "abc", "100")])).await;
        let source = HyperliquidSource::with_client(InfoClient::with_url(None, url));

        let err = source
            .fetch_window("BTC", Interval::OneMinute, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Malformed(_)), "got {err:?}");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_upstream_error() {
        // nothing listens on the discard port
        let source =
            HyperliquidSource::with_client(InfoClient::with_url(None, "http://127.0.0.1:9"));

        let err = source
            .fetch_window("BTC", Interval::OneMinute, 10)
            .await
            .unwrap_err();
        assert!(matches!(err, SourceError::Upstream(_)), "got {err:?}");
    }
}
