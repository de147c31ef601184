use std::sync::Arc;

use crate::config::DashboardConfig;
use crate::services::LatestWindow;
use crate::source::BarSource;

/// Process-wide state shared by the refresh loop and the page handler.
///
/// Built once in `main` and handed out as `Arc<AppContext>`; it is dropped
/// when both the loop and the server have stopped.
pub struct AppContext {
    pub config: DashboardConfig,
    pub source: Arc<dyn BarSource>,
    pub latest: LatestWindow,
}

impl AppContext {
    pub fn new(config: DashboardConfig, source: Arc<dyn BarSource>) -> Arc<Self> {
        Arc::new(Self {
            config,
            source,
            latest: LatestWindow::new(),
        })
    }
}
