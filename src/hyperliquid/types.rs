use serde::{Deserialize, Serialize};

use crate::hyperliquid::{Error, Result};
use crate::models::Bar;

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct CandleSnapshotRequest {
    pub coin: String,
    pub interval: String,
    pub start_time: u64,
    pub end_time: u64,
}

#[derive(Deserialize, Serialize, Debug, Clone)]
#[serde(tag = "type")]
#[serde(rename_all = "camelCase")]
pub enum InfoRequest {
    #[serde(rename_all = "camelCase")]
    CandleSnapshot {
        req: CandleSnapshotRequest,
    },
}

#[derive(Deserialize, Debug, Clone)]
pub struct CandlesSnapshotResponse {
    #[serde(rename = "t")]
    pub time_open: u64,
    #[serde(rename = "T")]
    pub time_close: u64,
    #[serde(rename = "s")]
    pub coin: String,
    #[serde(rename = "i")]
    pub candle_interval: String,
    #[serde(rename = "o")]
    pub open: String,
    #[serde(rename = "c")]
    pub close: String,
    #[serde(rename = "h")]
    pub high: String,
    #[serde(rename = "l")]
    pub low: String,
    #[serde(rename = "v")]
    pub vlm: String,
    #[serde(rename = "n")]
    pub num_trades: u64,
}

fn parse_float(field: &'static str, value: &str) -> Result<f64> {
    value
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .ok_or_else(|| Error::FloatStringParse {
            field,
            value: value.to_string(),
        })
}

impl CandlesSnapshotResponse {
    pub fn to_bar(&self) -> Result<Bar> {
        Ok(Bar {
            timestamp: self.time_open,
            open: parse_float("open", &self.open)?,
            high: parse_float("high", &self.high)?,
            low: parse_float("low", &self.low)?,
            close: parse_float("close", &self.close)?,
            volume: parse_float("volume", &self.vlm)?,
        })
    }
}
