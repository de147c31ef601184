use chrono::Utc;
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};

use super::latest::{Failure, Frame};
use crate::app::AppContext;
use crate::chart::render;
use crate::source::SourceError;

/// Timer-driven poller that keeps [`AppContext::latest`] current.
pub struct RefreshLoop;

impl RefreshLoop {
    /// Fetch, render and publish once.
    ///
    /// Failures and empty windows leave the previous frame in place; the
    /// error is logged, recorded and returned.
    pub async fn run_tick(ctx: &AppContext, tick: u64) -> Result<Arc<Frame>, SourceError> {
        let config = &ctx.config;
        let fetch = ctx
            .source
            .fetch_window(&config.pair, config.interval, config.window);

        let fetched = match time::timeout(config.fetch_timeout, fetch).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout(config.fetch_timeout)),
        };
        let fetched = fetched.and_then(|window| {
            if window.is_empty() {
                Err(SourceError::Empty {
                    pair: config.pair.clone(),
                    interval: config.interval,
                })
            } else {
                Ok(window)
            }
        });

        match fetched {
            Ok(window) => {
                let figure = render(&window);
                debug!(
                    "tick {tick}: {} bars from {}, last close {:?}",
                    window.len(),
                    ctx.source.name(),
                    window.last().map(|b| b.close)
                );
                let frame = Arc::new(Frame {
                    tick,
                    fetched_at: Utc::now(),
                    window,
                    figure,
                });
                ctx.latest.publish(Arc::clone(&frame)).await;
                Ok(frame)
            }
            Err(e) => {
                warn!("tick {tick}: keeping previous window: {e}");
                ctx.latest
                    .record_failure(Failure {
                        tick,
                        at: Utc::now(),
                        message: e.to_string(),
                    })
                    .await;
                Err(e)
            }
        }
    }

    /// Start polling on `config.refresh`. The first tick fires immediately.
    ///
    /// Each tick runs to completion before the timer is polled again, so at
    /// most one fetch is in flight. Ticks missed while a slow fetch was
    /// running are skipped rather than replayed.
    pub fn spawn(ctx: Arc<AppContext>) -> RefreshHandle {
        let (shutdown_tx, mut shutdown_rx) = oneshot::channel::<()>();

        let task = tokio::spawn(async move {
            let mut interval = time::interval(ctx.config.refresh);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            info!(
                "refreshing {} {} every {:?} from {}",
                ctx.config.pair,
                ctx.config.interval,
                ctx.config.refresh,
                ctx.source.name()
            );

            let mut ticks = 0u64;
            loop {
                tokio::select! {
                    // also fires when the handle is dropped
                    _ = &mut shutdown_rx => break,
                    _ = interval.tick() => {
                        ticks += 1;
                        let _ = Self::run_tick(&ctx, ticks).await;
                    }
                }
            }
            info!("refresh loop stopped after {ticks} ticks");
            ticks
        });

        RefreshHandle {
            shutdown: Some(shutdown_tx),
            task,
        }
    }
}

/// Owner of a running [`RefreshLoop`].
pub struct RefreshHandle {
    shutdown: Option<oneshot::Sender<()>>,
    task: JoinHandle<u64>,
}

impl RefreshHandle {
    /// Stop the loop and wait for it. Returns the number of ticks run.
    pub async fn shutdown(mut self) -> u64 {
        if let Some(tx) = self.shutdown.take() {
            let _ = tx.send(());
        }
        match (&mut self.task).await {
            Ok(ticks) => ticks,
            Err(e) => {
                warn!("refresh task ended abnormally: {e}");
                0
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DashboardConfig;
    use crate::models::{Bar, Interval, SeriesWindow};
    use crate::source::{BarSource, SimulatedSource};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;
    use tokio::time::Instant;

    /// Replays a scripted sequence of responses, then keeps failing.
    struct ScriptedSource {
        script: Mutex<VecDeque<Result<Vec<Bar>, SourceError>>>,
    }

    impl ScriptedSource {
        fn new(script: Vec<Result<Vec<Bar>, SourceError>>) -> Self {
            Self {
                script: Mutex::new(script.into()),
            }
        }
    }

    #[async_trait]
    impl BarSource for ScriptedSource {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn fetch_window(
            &self,
            pair: &str,
            interval: Interval,
            _limit: usize,
        ) -> Result<SeriesWindow, SourceError> {
            let next = self.script.lock().unwrap().pop_front();
            match next {
                Some(Ok(bars)) => Ok(SeriesWindow::new(pair, interval, bars)),
                Some(Err(e)) => Err(e),
                None => Err(SourceError::Upstream("script exhausted".to_string())),
            }
        }
    }

    struct SlowSource;

    #[async_trait]
    impl BarSource for SlowSource {
        fn name(&self) -> &str {
            "slow"
        }

        async fn fetch_window(
            &self,
            pair: &str,
            interval: Interval,
            _limit: usize,
        ) -> Result<SeriesWindow, SourceError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(SeriesWindow::empty(pair, interval))
        }
    }

    /// Fails on odd calls, succeeds on even ones.
    #[derive(Default)]
    struct FlakySource {
        calls: AtomicU64,
    }

    #[async_trait]
    impl BarSource for FlakySource {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn fetch_window(
            &self,
            pair: &str,
            interval: Interval,
            _limit: usize,
        ) -> Result<SeriesWindow, SourceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            if call % 2 == 1 {
                return Err(SourceError::Upstream(format!("outage on call {call}")));
            }
            Ok(SeriesWindow::new(pair, interval, bars(&[call as f64])))
        }
    }

    /// Stalls on the first fetch only and records when each fetch began.
    struct StallingSource {
        stall: Duration,
        starts: Mutex<Vec<Instant>>,
    }

    impl StallingSource {
        fn new(stall: Duration) -> Self {
            Self {
                stall,
                starts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl BarSource for StallingSource {
        fn name(&self) -> &str {
            "stalling"
        }

        async fn fetch_window(
            &self,
            pair: &str,
            interval: Interval,
            _limit: usize,
        ) -> Result<SeriesWindow, SourceError> {
            let first = {
                let mut starts = self.starts.lock().unwrap();
                starts.push(Instant::now());
                starts.len() == 1
            };
            if first {
                tokio::time::sleep(self.stall).await;
            }
            Ok(SeriesWindow::new(pair, interval, bars(&[11.0])))
        }
    }

    fn bars(closes: &[f64]) -> Vec<Bar> {
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar::new(i as u64 * 60_000, 10.0, c.max(10.0), c.min(10.0), c, 1.0))
            .collect()
    }

    fn context(source: Arc<dyn BarSource>, refresh: Duration) -> Arc<AppContext> {
        AppContext::new(
            DashboardConfig {
                refresh,
                ..Default::default()
            },
            source,
        )
    }

    #[tokio::test]
    async fn test_tick_publishes_frame() {
        let ctx = context(
            Arc::new(ScriptedSource::new(vec![Ok(bars(&[11.0, 9.0]))])),
            Duration::from_secs(5),
        );

        let frame = RefreshLoop::run_tick(&ctx, 1).await.unwrap();
        assert_eq!(frame.window.len(), 2);
        assert_eq!(frame.figure.candles.len(), 2);
        assert_eq!(ctx.latest.frame().await.unwrap().tick, 1);
    }

    #[tokio::test]
    async fn test_failed_tick_retains_previous_window() {
        let ctx = context(
            Arc::new(ScriptedSource::new(vec![
                Ok(bars(&[11.0])),
                Err(SourceError::Upstream("connection reset".to_string())),
            ])),
            Duration::from_secs(5),
        );

        RefreshLoop::run_tick(&ctx, 1).await.unwrap();
        let err = RefreshLoop::run_tick(&ctx, 2).await.unwrap_err();
        assert!(matches!(err, SourceError::Upstream(_)));

        let (frame, failure) = ctx.latest.snapshot().await;
        assert_eq!(frame.unwrap().tick, 1);
        let failure = failure.unwrap();
        assert_eq!(failure.tick, 2);
        assert!(failure.message.contains("connection reset"));
    }

    #[tokio::test]
    async fn test_empty_window_retains_previous_window() {
        let ctx = context(
            Arc::new(ScriptedSource::new(vec![Ok(bars(&[11.0, 12.0])), Ok(Vec::new())])),
            Duration::from_secs(5),
        );

        RefreshLoop::run_tick(&ctx, 1).await.unwrap();
        let err = RefreshLoop::run_tick(&ctx, 2).await.unwrap_err();
        assert!(matches!(err, SourceError::Empty { .. }));
        assert_eq!(ctx.latest.frame().await.unwrap().window.len(), 2);
    }

    #[tokio::test]
    async fn test_slow_fetch_times_out() {
        let ctx = AppContext::new(
            DashboardConfig {
                fetch_timeout: Duration::from_millis(20),
                ..Default::default()
            },
            Arc::new(SlowSource),
        );

        let err = RefreshLoop::run_tick(&ctx, 1).await.unwrap_err();
        assert!(matches!(err, SourceError::Timeout(_)));
        assert!(ctx.latest.frame().await.is_none());
    }

    #[tokio::test]
    async fn test_loop_ticks_until_shutdown() {
        let source = Arc::new(SimulatedSource::with_seed(1, 100.0, 0.01).unwrap());
        let ctx = context(source, Duration::from_millis(10));

        let handle = RefreshLoop::spawn(Arc::clone(&ctx));
        tokio::time::sleep(Duration::from_millis(80)).await;
        assert!(!handle.is_finished());

        let ticks = handle.shutdown().await;
        assert!(ticks >= 2, "expected several ticks, got {ticks}");
        let frame = ctx.latest.frame().await.unwrap();
        assert!(frame.tick <= ticks);
        assert_eq!(frame.window.len(), ctx.config.window);
    }

    #[tokio::test]
    async fn test_first_tick_is_immediate() {
        let source = Arc::new(SimulatedSource::with_seed(2, 100.0, 0.01).unwrap());
        let ctx = context(source, Duration::from_secs(3600));

        let handle = RefreshLoop::spawn(Arc::clone(&ctx));
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ctx.latest.frame().await.map(|f| f.tick), Some(1));
        assert_eq!(handle.shutdown().await, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_loop_keeps_firing_through_failures() {
        let source = Arc::new(FlakySource::default());
        let ctx = context(source.clone(), Duration::from_millis(10));

        let handle = RefreshLoop::spawn(Arc::clone(&ctx));
        tokio::time::sleep(Duration::from_millis(95)).await;
        let ticks = handle.shutdown().await;

        assert!(ticks >= 5, "loop stalled after a failure: {ticks} ticks");
        assert_eq!(source.calls.load(Ordering::SeqCst), ticks);

        let (frame, failure) = ctx.latest.snapshot().await;
        let frame = frame.unwrap();
        assert_eq!(frame.tick % 2, 0);
        if ticks % 2 == 0 {
            assert_eq!(frame.tick, ticks);
            assert!(failure.is_none());
        } else {
            assert_eq!(frame.tick, ticks - 1);
            assert_eq!(failure.unwrap().tick, ticks);
        }
        assert_eq!(frame.window.last().unwrap().close, frame.tick as f64);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missed_ticks_are_skipped_not_burst() {
        let source = Arc::new(StallingSource::new(Duration::from_millis(55)));
        let ctx = context(source.clone(), Duration::from_millis(10));

        let started = Instant::now();
        let handle = RefreshLoop::spawn(Arc::clone(&ctx));
        tokio::time::sleep(Duration::from_millis(100)).await;
        let ticks = handle.shutdown().await;

        let offsets: Vec<Duration> = source
            .starts
            .lock()
            .unwrap()
            .iter()
            .map(|s| s.duration_since(started))
            .collect();
        assert_eq!(offsets.len() as u64, ticks);
        assert_eq!(offsets[0], Duration::ZERO);
        assert!(offsets[1] >= Duration::from_millis(55));
        // the five ticks missed during the stall collapse into one
        assert!(
            offsets.windows(2).all(|w| w[1] > w[0]),
            "ticks fired in a burst: {offsets:?}"
        );
        assert!(ticks <= 7, "missed ticks were replayed: {offsets:?}");
    }
}
