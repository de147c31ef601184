use anyhow::Context;
use clap::Parser;
use log::info;
use std::fs;

use cryptodash::{
    analysis::{self, bollinger_chart, candle_chart, format_report},
    cli::AnalysisArgs,
    config::{AnalysisConfig, SIMULATED_START_PRICE, SIMULATED_VOLATILITY},
    hyperliquid::BaseUrl,
    source::{BarSource, HyperliquidSource, SimulatedSource},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::init();

    let args = AnalysisArgs::parse();
    let config = AnalysisConfig::default();
    config.validate()?;

    let source: Box<dyn BarSource> = if args.simulate {
        Box::new(SimulatedSource::new(SIMULATED_START_PRICE, SIMULATED_VOLATILITY * 20.0)?)
    } else {
        Box::new(HyperliquidSource::new(BaseUrl::Mainnet))
    };
    info!(
        "Analyzing {} over {} {} bars from {}",
        config.tickers.join(","),
        config.history,
        config.interval,
        source.name()
    );

    let reports = analysis::run(source.as_ref(), &config).await;
    if reports.is_empty() {
        anyhow::bail!("no ticker could be loaded");
    }
    print!("{}", format_report(&reports));

    if let Some(dir) = &args.out {
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        for report in &reports {
            let ticker = report.ticker.to_lowercase();
            let bands_path = dir.join(format!("{ticker}_bollinger.svg"));
            let candles_path = dir.join(format!("{ticker}_candles.svg"));
            fs::write(&bands_path, bollinger_chart(report))
                .with_context(|| format!("writing {}", bands_path.display()))?;
            fs::write(&candles_path, candle_chart(report))
                .with_context(|| format!("writing {}", candles_path.display()))?;
            info!("Wrote charts for {} to {}", report.ticker, dir.display());
        }
    }

    Ok(())
}
