use reqwest::Client;
use serde::Deserialize;

use crate::hyperliquid::{
    req::HttpClient, BaseUrl, CandleSnapshotRequest, CandlesSnapshotResponse, Error,
    InfoRequest, Result,
};

/// Read-only client for the public `/info` endpoint.
#[derive(Debug, Clone)]
pub struct InfoClient {
    pub http_client: HttpClient,
}

impl InfoClient {
    pub fn new(client: Option<Client>, base_url: Option<BaseUrl>) -> InfoClient {
        let base_url = base_url.unwrap_or(BaseUrl::Mainnet).get_url();
        Self::with_url(client, base_url)
    }

    pub fn with_url(client: Option<Client>, base_url: impl Into<String>) -> InfoClient {
        let client = client.unwrap_or_default();
        InfoClient {
            http_client: HttpClient {
                client,
                base_url: base_url.into(),
            },
        }
    }

    pub fn base_url(&self) -> &str {
        &self.http_client.base_url
    }

    async fn send_info_request<T: for<'a> Deserialize<'a>>(
        &self,
        info_request: InfoRequest,
    ) -> Result<T> {
        let data =
            serde_json::to_string(&info_request).map_err(|e| Error::JsonParse(e.to_string()))?;

        let return_data = self.http_client.post("/info", data).await?;
        serde_json::from_str(&return_data).map_err(|e| Error::JsonParse(e.to_string()))
    }

    pub async fn candles_snapshot(
        &self,
        coin: String,
        interval: String,
        start_time: u64,
        end_time: u64,
    ) -> Result<Vec<CandlesSnapshotResponse>> {
        let input = InfoRequest::CandleSnapshot {
            req: CandleSnapshotRequest {
                coin,
                interval,
                start_time,
                end_time,
            },
        };
        self.send_info_request(input).await
    }
}
