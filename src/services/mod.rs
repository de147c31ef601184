mod latest;
mod refresh;

pub use latest::{Failure, Frame, LatestWindow};
pub use refresh::{RefreshHandle, RefreshLoop};
