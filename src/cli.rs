use clap::Parser;
use std::path::PathBuf;

/// The pair, refresh and bind address come from `config`; the only choice
/// left to the command line is where bars come from.
#[derive(Debug, Parser)]
#[command(author, version, about = "Live candlestick dashboard", long_about = None)]
pub struct DashboardArgs {
    /// Use an offline random walk instead of the exchange.
    #[arg(long)]
    pub simulate: bool,
}

#[derive(Debug, Parser)]
#[command(author, version, about = "Historical return and Bollinger band report", long_about = None)]
pub struct AnalysisArgs {
    /// Directory for the static SVG charts.
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// Use an offline random walk instead of the exchange.
    #[arg(long)]
    pub simulate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dashboard_takes_no_configuration() {
        let args = DashboardArgs::try_parse_from(["dashboard"]).unwrap();
        assert!(!args.simulate);

        let args = DashboardArgs::try_parse_from(["dashboard", "--simulate"]).unwrap();
        assert!(args.simulate);
    }

    #[test]
    fn test_dashboard_rejects_configuration_flags() {
        let cases: [&[&str]; 6] = [
            &["--pair", "ETH"],
            &["--refresh", "1m"],
            &["--refresh", "5124095576030432h"],
            &["--port", "9000"],
            &["--window", "10"],
            &["--testnet"],
        ];
        for flags in cases {
            let argv = std::iter::once("dashboard").chain(flags.iter().copied());
            assert!(DashboardArgs::try_parse_from(argv).is_err(), "accepted {flags:?}");
        }
    }

    #[test]
    fn test_analysis_args() {
        let args = AnalysisArgs::try_parse_from(["analysis", "-o", "charts", "--simulate"]).unwrap();
        assert_eq!(args.out, Some(PathBuf::from("charts")));
        assert!(args.simulate);

        assert!(AnalysisArgs::try_parse_from(["analysis", "--tickers", "BTC"]).is_err());
    }
}
