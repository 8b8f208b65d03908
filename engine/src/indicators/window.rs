// Moving-average window lengths parsed from option labels such as "25D"
use crate::error::EngineError;
use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

/// Number of trading periods averaged. Always greater than zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MovingAverageWindow(u32);

impl MovingAverageWindow {
    pub fn new(periods: u32) -> Option<Self> {
        (periods > 0).then_some(Self(periods))
    }

    pub fn get(self) -> u32 {
        self.0
    }

    pub fn periods(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for MovingAverageWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}D", self.0)
    }
}

impl FromStr for MovingAverageWindow {
    type Err = EngineError;

    /// Accepts "25D", "25d" or a bare "25".
    fn from_str(label: &str) -> Result<Self, Self::Err> {
        let trimmed = label.trim();
        let numeric = trimmed
            .strip_suffix(|c: char| c == 'D' || c == 'd')
            .unwrap_or(trimmed);

        numeric
            .parse::<u32>()
            .ok()
            .and_then(MovingAverageWindow::new)
            .ok_or_else(|| EngineError::InvalidWindowLabel(label.to_string()))
    }
}

/// Parses every label, collapsing duplicates. Labels that fail are returned
/// alongside the windows instead of failing the whole set.
pub fn parse_window_labels<S: AsRef<str>>(labels: &[S]) -> (Vec<MovingAverageWindow>, Vec<EngineError>) {
    let mut windows = BTreeSet::new();
    let mut rejected = Vec::new();

    for label in labels {
        let label: &str = label.as_ref();
        match label.parse::<MovingAverageWindow>() {
            Ok(window) => {
                windows.insert(window);
            }
            Err(e) => {
                tracing::warn!(label = %label, "Dropping unparseable moving average label");
                rejected.push(e);
            }
        }
    }

    (windows.into_iter().collect(), rejected)
}
