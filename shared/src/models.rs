use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// strftime pattern for every date axis tick label (`yy-mm-dd`).
pub const TICK_LABEL_FORMAT: &str = "%y-%m-%d";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Unknown period '{0}'. Use one of 3M, 6M, 1Y, 3Y, 5Y, 10Y")]
    UnknownPeriod(String),

    #[error("Unknown time frame '{0}'. Use one of 1d, 1wk, 1mo")]
    UnknownTimeFrame(String),
}

/// One daily (or resampled) price/volume bar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

/// Ordered price history for one symbol. Dates are strictly increasing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawSeries {
    candles: Vec<Candle>,
}

impl RawSeries {
    /// Sorts by date and keeps the first candle seen for any repeated date.
    pub fn new(mut candles: Vec<Candle>) -> Self {
        candles.sort_by_key(|c| c.date);
        candles.dedup_by_key(|c| c.date);
        Self { candles }
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }

    pub fn len(&self) -> usize {
        self.candles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candles.is_empty()
    }

    pub fn last(&self) -> Option<&Candle> {
        self.candles.last()
    }
}

/// Historical lookback requested for a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    #[serde(rename = "3M")]
    ThreeMonths,
    #[serde(rename = "6M")]
    SixMonths,
    #[serde(rename = "1Y")]
    OneYear,
    #[serde(rename = "3Y")]
    ThreeYears,
    #[serde(rename = "5Y")]
    FiveYears,
    #[serde(rename = "10Y")]
    TenYears,
}

impl Period {
    pub const ALL: [Period; 6] = [
        Period::ThreeMonths,
        Period::SixMonths,
        Period::OneYear,
        Period::ThreeYears,
        Period::FiveYears,
        Period::TenYears,
    ];

    /// Calendar days covered by the lookback, counted back from the as-of date.
    pub fn days(self) -> i64 {
        match self {
            Period::ThreeMonths => 90,
            Period::SixMonths => 180,
            Period::OneYear => 365,
            Period::ThreeYears => 3 * 365,
            Period::FiveYears => 5 * 365,
            Period::TenYears => 10 * 365,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Period::ThreeMonths => "3M",
            Period::SixMonths => "6M",
            Period::OneYear => "1Y",
            Period::ThreeYears => "3Y",
            Period::FiveYears => "5Y",
            Period::TenYears => "10Y",
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_uppercase();
        Period::ALL
            .into_iter()
            .find(|p| p.as_str() == wanted)
            .ok_or_else(|| ParseError::UnknownPeriod(s.to_string()))
    }
}

/// Sampling interval of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeFrame {
    #[serde(rename = "1d")]
    Daily,
    #[serde(rename = "1wk")]
    Weekly,
    #[serde(rename = "1mo")]
    Monthly,
}

impl TimeFrame {
    pub fn as_str(self) -> &'static str {
        match self {
            TimeFrame::Daily => "1d",
            TimeFrame::Weekly => "1wk",
            TimeFrame::Monthly => "1mo",
        }
    }
}

impl fmt::Display for TimeFrame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeFrame {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "1d" => Ok(TimeFrame::Daily),
            "1wk" => Ok(TimeFrame::Weekly),
            "1mo" => Ok(TimeFrame::Monthly),
            _ => Err(ParseError::UnknownTimeFrame(s.to_string())),
        }
    }
}

/// How many charts a request produces.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DisplayMode {
    /// One chart: the selected symbol, or the first one entered.
    Single { selected: Option<String> },
    /// A 3x3 grid, one chart per symbol.
    Multiple,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
    pub date: NaiveDate,
    pub value: f64,
}

/// Most recent close and its change against the bar before it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LastValue {
    pub date: NaiveDate,
    pub close: f64,
    pub previous_close: f64,
    pub change: f64,
    pub percent_change: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TickLocator {
    Month,
    Year,
}

/// Major tick placement on the date axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TickPolicy {
    pub locator: TickLocator,
    pub interval: u32,
}

impl TickPolicy {
    pub fn label_format(&self) -> &'static str {
        TICK_LABEL_FORMAT
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AxisTick {
    pub date: NaiveDate,
    pub label: String,
}

/// Renderer-agnostic description of one symbol's chart.
///
/// `close_series` and `volume_series` cover exactly the dates of the source
/// series. `moving_averages` is keyed by window length and only holds windows
/// the series was long enough to fill.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub symbol: String,
    pub close_series: Vec<SeriesPoint>,
    pub moving_averages: BTreeMap<u32, Vec<SeriesPoint>>,
    pub volume_series: Vec<SeriesPoint>,
    pub last_value: LastValue,
    pub tick_policy: TickPolicy,
}

impl ChartSpec {
    pub fn first_date(&self) -> Option<NaiveDate> {
        self.close_series.first().map(|p| p.date)
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.close_series.last().map(|p| p.date)
    }
}
