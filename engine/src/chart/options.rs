// Immutable per-request chart options
use crate::error::EngineError;
use crate::indicators::{parse_window_labels, MovingAverageWindow};
use shared::models::{Period, TimeFrame};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChartOptions {
    pub period: Period,
    pub time_frame: TimeFrame,
    windows: Vec<MovingAverageWindow>,
}

impl ChartOptions {
    pub fn new(period: Period, time_frame: TimeFrame, mut windows: Vec<MovingAverageWindow>) -> Self {
        windows.sort();
        windows.dedup();
        Self { period, time_frame, windows }
    }

    /// Builds options from moving-average labels such as "25D". Labels that
    /// cannot be parsed are returned next to the options and left out.
    pub fn from_labels<S: AsRef<str>>(period: Period, time_frame: TimeFrame, labels: &[S]) -> (Self, Vec<EngineError>) {
        let (windows, rejected) = parse_window_labels(labels);
        (Self::new(period, time_frame, windows), rejected)
    }

    /// Requested windows, ascending and unique.
    pub fn windows(&self) -> &[MovingAverageWindow] {
        &self.windows
    }
}
