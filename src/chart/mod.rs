mod figure;
mod render;
pub mod svg;

pub use figure::{color_for, CandleGlyph, Figure, Layout, VolumeBar, DOWN_COLOR, UP_COLOR};
pub use render::{render, render_with_layout};
pub use svg::to_svg;
