// Moving-average overlays drawn on top of the close line
pub mod sma;
pub mod window;

pub use sma::Sma;
pub use window::{parse_window_labels, MovingAverageWindow};
