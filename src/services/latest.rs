use chrono::{DateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::chart::Figure;
use crate::models::SeriesWindow;

/// One successful refresh: the window and the figure drawn from it.
#[derive(Debug)]
pub struct Frame {
    pub tick: u64,
    pub fetched_at: DateTime<Utc>,
    pub window: SeriesWindow,
    pub figure: Figure,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub tick: u64,
    pub at: DateTime<Utc>,
    pub message: String,
}

#[derive(Default)]
struct Slot {
    frame: Option<Arc<Frame>>,
    failure: Option<Failure>,
}

/// Single-slot holder for the newest frame.
///
/// Publishing overwrites whatever was there, so the latest successful fetch
/// always wins. A failure is recorded next to the frame without touching it
/// and is cleared by the next publish.
#[derive(Default)]
pub struct LatestWindow {
    slot: RwLock<Slot>,
}

impl LatestWindow {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn publish(&self, frame: Arc<Frame>) {
        let mut slot = self.slot.write().await;
        slot.frame = Some(frame);
        slot.failure = None;
    }

    pub async fn record_failure(&self, failure: Failure) {
        self.slot.write().await.failure = Some(failure);
    }

    pub async fn frame(&self) -> Option<Arc<Frame>> {
        self.slot.read().await.frame.clone()
    }

    pub async fn failure(&self) -> Option<Failure> {
        self.slot.read().await.failure.clone()
    }

    /// Frame and failure read under one lock.
    pub async fn snapshot(&self) -> (Option<Arc<Frame>>, Option<Failure>) {
        let slot = self.slot.read().await;
        (slot.frame.clone(), slot.failure.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::render;
    use crate::models::{Bar, Interval};

    fn frame(tick: u64) -> Arc<Frame> {
        let window = SeriesWindow::new(
            "BTC",
            Interval::OneMinute,
            vec![Bar::new(tick * 60_000, 1.0, 2.0, 0.5, 1.5, 10.0)],
        );
        let figure = render(&window);
        Arc::new(Frame {
            tick,
            fetched_at: Utc::now(),
            window,
            figure,
        })
    }

    #[tokio::test]
    async fn test_latest_publish_wins() {
        let latest = LatestWindow::new();
        assert!(latest.frame().await.is_none());

        latest.publish(frame(1)).await;
        latest.publish(frame(2)).await;
        assert_eq!(latest.frame().await.unwrap().tick, 2);
    }

    #[tokio::test]
    async fn test_failure_keeps_frame_until_next_publish() {
        let latest = LatestWindow::new();
        latest.publish(frame(1)).await;
        latest
            .record_failure(Failure {
                tick: 2,
                at: Utc::now(),
                message: "boom".to_string(),
            })
            .await;

        let (frame_now, failure) = latest.snapshot().await;
        assert_eq!(frame_now.unwrap().tick, 1);
        assert_eq!(failure.unwrap().message, "boom");

        latest.publish(frame(3)).await;
        assert!(latest.failure().await.is_none());
    }
}
