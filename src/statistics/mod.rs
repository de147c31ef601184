pub mod bollinger;
pub mod describe;
pub mod returns;
pub mod rolling_stats;

pub use bollinger::BollingerBands;
pub use describe::{describe, Summary};
pub use returns::{return_extrema, returns, ReturnExtrema};
pub use rolling_stats::{RollingStats, StatsError};
