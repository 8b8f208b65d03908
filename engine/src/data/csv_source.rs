use super::resample::resample;
use super::source::{SeriesQuery, SeriesSource};
use crate::error::EngineError;
use anyhow::{anyhow, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord, Trim};
use shared::models::{Candle, RawSeries, TimeFrame};
use shared::utils::{is_valid_symbol, normalize_symbol};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// How a CSV directory lays out and samples its history.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvLayout {
    /// Daily rows; weekly and monthly time frames are resampled from them.
    Default,
    /// Daily rows, often newest first. The requested time frame is ignored.
    Alternate,
}

/// Reads `<dir>/<SYMBOL>.csv` files with a `Date,Open,High,Low,Close,Volume` header.
pub struct CsvSeriesSource {
    name: String,
    dir: PathBuf,
    layout: CsvLayout,
}

impl CsvSeriesSource {
    pub fn new(name: &str, dir: impl Into<PathBuf>, layout: CsvLayout) -> Self {
        Self {
            name: name.to_string(),
            dir: dir.into(),
            layout,
        }
    }

    /// File holding `symbol`'s history. Only plain tickers map to a file, so
    /// the path always stays directly inside the source directory.
    pub fn path_for(&self, symbol: &str) -> Result<PathBuf, EngineError> {
        let symbol = normalize_symbol(symbol);
        if !is_valid_symbol(&symbol) {
            return Err(EngineError::DataSourceError(format!("Invalid symbol '{}'", symbol)));
        }
        Ok(self.dir.join(format!("{}.csv", symbol)))
    }
}

impl SeriesSource for CsvSeriesSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch(&self, query: &SeriesQuery) -> Result<RawSeries, EngineError> {
        let path = self.path_for(&query.symbol)?;
        if !path.is_file() {
            return Err(EngineError::DataSourceError(format!(
                "No data file for symbol '{}' at {}",
                query.symbol,
                path.display()
            )));
        }

        let history = RawSeries::new(load_candles_from_csv(&path)?);
        if history.is_empty() {
            tracing::warn!(symbol = %query.symbol, path = %path.display(), "Data file holds no price rows");
        }
        let in_range: Vec<Candle> = history
            .candles()
            .iter()
            .filter(|c| query.covers(c.date))
            .copied()
            .collect();

        let candles = match self.layout {
            CsvLayout::Default => resample(&in_range, query.time_frame),
            CsvLayout::Alternate => {
                if query.time_frame != TimeFrame::Daily {
                    tracing::debug!(
                        symbol = %query.symbol,
                        time_frame = %query.time_frame,
                        "Alternate source only serves daily bars, ignoring time frame"
                    );
                }
                in_range
            }
        };

        tracing::debug!(
            symbol = %query.symbol,
            source = %self.name,
            start = %query.start_date(),
            count = candles.len(),
            "Loaded series from CSV"
        );
        Ok(RawSeries::new(candles))
    }
}

// Column positions resolved from the header row.
struct Columns {
    date: usize,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: usize,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self, EngineError> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.eq_ignore_ascii_case(name))
                .ok_or_else(|| EngineError::CsvDataFormatError(format!("Missing '{}' column in CSV header", name)))
        };
        Ok(Columns {
            date: find("Date")?,
            open: find("Open")?,
            high: find("High")?,
            low: find("Low")?,
            close: find("Close")?,
            volume: find("Volume")?,
        })
    }
}

/// Loads every row of a CSV file, in file order. Rows with "null" prices
/// (holidays in some exports) are skipped.
pub fn load_candles_from_csv(path: &Path) -> Result<Vec<Candle>, EngineError> {
    let file = File::open(path)?;
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .trim(Trim::All)
        .from_reader(BufReader::new(file));

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut candles = Vec::new();

    for (idx, result) in rdr.records().enumerate() {
        let record = result?;
        match parse_row(&record, &columns) {
            Ok(Some(candle)) => candles.push(candle),
            Ok(None) => {
                tracing::debug!(line = idx + 2, path = %path.display(), "Skipping row without prices");
            }
            Err(e) => {
                return Err(EngineError::CsvDataFormatError(format!("line {}: {:#}", idx + 2, e)));
            }
        }
    }
    Ok(candles)
}

fn parse_row(record: &StringRecord, columns: &Columns) -> anyhow::Result<Option<Candle>> {
    let field = |idx: usize, name: &str| record.get(idx).ok_or_else(|| anyhow!("Missing '{}' field", name));

    let date_str = field(columns.date, "Date")?;
    let date = NaiveDate::parse_from_str(date_str, DATE_FORMAT)
        .with_context(|| format!("Failed to parse date '{}'", date_str))?;

    let price_fields = [
        (columns.open, "Open"),
        (columns.high, "High"),
        (columns.low, "Low"),
        (columns.close, "Close"),
    ];
    if price_fields
        .iter()
        .any(|&(idx, name)| field(idx, name).map_or(false, |v| v.eq_ignore_ascii_case("null")))
    {
        return Ok(None);
    }

    let number = |idx: usize, name: &str| -> anyhow::Result<f64> {
        let raw = field(idx, name)?;
        raw.parse::<f64>()
            .with_context(|| format!("Error parsing '{}' value '{}'", name, raw))
    };

    Ok(Some(Candle {
        date,
        open: number(columns.open, "Open")?,
        high: number(columns.high, "High")?,
        low: number(columns.low, "Low")?,
        close: number(columns.close, "Close")?,
        volume: number(columns.volume, "Volume")?,
    }))
}
