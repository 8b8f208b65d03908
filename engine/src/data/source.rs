// Fetch collaborator boundary: where raw series come from
use crate::error::EngineError;
use chrono::{Days, NaiveDate};
use shared::models::{Period, RawSeries, TimeFrame};

/// What to fetch for one symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesQuery {
    pub symbol: String,
    pub period: Period,
    pub time_frame: TimeFrame,
    pub as_of: NaiveDate,
}

impl SeriesQuery {
    /// First date covered by the lookback.
    pub fn start_date(&self) -> NaiveDate {
        self.as_of
            .checked_sub_days(Days::new(self.period.days() as u64))
            .unwrap_or(NaiveDate::MIN)
    }

    pub fn covers(&self, date: NaiveDate) -> bool {
        date >= self.start_date() && date <= self.as_of
    }
}

/// Anything able to produce a price history for a symbol.
pub trait SeriesSource: Send + Sync {
    fn name(&self) -> &str;
    fn fetch(&self, query: &SeriesQuery) -> Result<RawSeries, EngineError>;
}

/// Sends symbols carrying a market suffix (e.g. ".JP") to an alternate source.
pub struct RoutedSource {
    default: Box<dyn SeriesSource>,
    alternate: Box<dyn SeriesSource>,
    suffix: String,
}

impl RoutedSource {
    pub fn new(default: Box<dyn SeriesSource>, alternate: Box<dyn SeriesSource>, suffix: &str) -> Self {
        Self {
            default,
            alternate,
            suffix: suffix.trim().to_uppercase(),
        }
    }

    pub fn route(&self, symbol: &str) -> &dyn SeriesSource {
        if !self.suffix.is_empty() && symbol.to_uppercase().ends_with(&self.suffix) {
            self.alternate.as_ref()
        } else {
            self.default.as_ref()
        }
    }
}

impl SeriesSource for RoutedSource {
    fn name(&self) -> &str {
        "routed"
    }

    fn fetch(&self, query: &SeriesQuery) -> Result<RawSeries, EngineError> {
        let source = self.route(&query.symbol);
        tracing::debug!(symbol = %query.symbol, source = source.name(), "Routing series fetch");
        source.fetch(query)
    }
}
