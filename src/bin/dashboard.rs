use clap::Parser;
use log::{error, info};
use std::sync::Arc;

use cryptodash::{
    app::AppContext,
    cli::DashboardArgs,
    config::{DashboardConfig, SIMULATED_START_PRICE, SIMULATED_VOLATILITY},
    hyperliquid::BaseUrl,
    server,
    services::RefreshLoop,
    source::{BarSource, HyperliquidSource, SimulatedSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = DashboardArgs::parse();
    let config = DashboardConfig::default();
    config.validate()?;

    let source: Arc<dyn BarSource> = if args.simulate {
        Arc::new(SimulatedSource::new(SIMULATED_START_PRICE, SIMULATED_VOLATILITY)?)
    } else {
        Arc::new(HyperliquidSource::new(BaseUrl::Mainnet))
    };
    info!(
        "Starting dashboard for {} {} ({} bars, refresh {:?}, source {})",
        config.pair,
        config.interval,
        config.window,
        config.refresh,
        source.name()
    );

    // an occupied port is fatal before the loop starts
    let listener = server::bind(&config.bind_addr()).await?;

    let ctx = AppContext::new(config, source);
    let refresh = RefreshLoop::spawn(Arc::clone(&ctx));

    let served = server::serve(ctx, listener, shutdown_signal()).await;
    refresh.shutdown().await;

    if let Err(e) = &served {
        error!("Dashboard server failed: {e}");
    }
    served?;
    info!("Dashboard stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {e}");
        return;
    }
    info!("Shutdown signal received, stopping");
}
