//! Minimal Hyperliquid info API client: candle snapshots.
#![deny(unreachable_pub)]
mod client;
mod consts;
mod errors;
mod req;
mod types;
pub use client::*;
pub use consts::*;
pub use errors::*;
pub use req::*;
pub use types::*;
