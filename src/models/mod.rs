mod bar;
mod interval;
mod window;

pub use bar::{Bar, Direction};
pub use interval::Interval;
pub use window::SeriesWindow;
