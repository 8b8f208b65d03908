// Preparing charts for a list of symbols, one outcome per symbol
use super::options::ChartOptions;
use super::preparer::prepare;
use crate::data::{SeriesQuery, SeriesSource};
use crate::error::EngineError;
use chrono::NaiveDate;
use shared::models::{ChartSpec, DisplayMode};
use shared::utils::normalize_symbol;

/// Result of charting one symbol. A failure here never affects other symbols.
#[derive(Debug)]
pub struct ChartOutcome {
    pub symbol: String,
    pub result: Result<ChartSpec, EngineError>,
}

impl ChartOutcome {
    pub fn is_loaded(&self) -> bool {
        self.result.is_ok()
    }

    /// Status line shown next to the chart grid.
    pub fn status_line(&self) -> String {
        match &self.result {
            Ok(_) => format!("Loaded: {}", self.symbol),
            Err(e) => format!("Error: {} - {}", self.symbol, e),
        }
    }
}

/// Picks the symbols a request will chart.
///
/// Single mode charts the selected symbol, or the first one given. Multiple
/// mode charts all of them and refuses the whole request when they do not
/// fit the grid.
pub fn select_symbols(symbols: &[String], mode: &DisplayMode, max_grid_symbols: usize) -> Result<Vec<String>, EngineError> {
    let symbols: Vec<String> = symbols
        .iter()
        .map(|s| normalize_symbol(s))
        .filter(|s| !s.is_empty())
        .collect();

    match mode {
        DisplayMode::Single { selected } => selected
            .as_deref()
            .map(normalize_symbol)
            .filter(|s| !s.is_empty())
            .or_else(|| symbols.into_iter().next())
            .map(|s| vec![s])
            .ok_or_else(|| EngineError::InvalidOption("no symbol to chart".to_string())),
        DisplayMode::Multiple => {
            if symbols.is_empty() {
                return Err(EngineError::InvalidOption("no symbols to chart".to_string()));
            }
            if symbols.len() > max_grid_symbols {
                tracing::warn!(requested = symbols.len(), max = max_grid_symbols, "Refusing grid request");
                return Err(EngineError::TooManySymbols {
                    requested: symbols.len(),
                    max: max_grid_symbols,
                });
            }
            Ok(symbols)
        }
    }
}

/// Fetches and prepares one symbol, capturing any failure in the outcome.
pub fn prepare_symbol(source: &dyn SeriesSource, symbol: &str, options: &ChartOptions, as_of: NaiveDate) -> ChartOutcome {
    let query = SeriesQuery {
        symbol: symbol.to_string(),
        period: options.period,
        time_frame: options.time_frame,
        as_of,
    };

    let result = source
        .fetch(&query)
        .and_then(|raw| prepare(&raw, symbol, options.period, options.windows()));

    match &result {
        Ok(spec) => tracing::debug!(
            symbol = %symbol,
            points = spec.close_series.len(),
            moving_averages = spec.moving_averages.len(),
            "Prepared chart"
        ),
        Err(e) => tracing::warn!(symbol = %symbol, error = %e, "Could not prepare chart"),
    }

    ChartOutcome {
        symbol: symbol.to_string(),
        result,
    }
}

/// Prepares every symbol the display mode selects, in input order.
pub fn prepare_batch(
    source: &dyn SeriesSource,
    symbols: &[String],
    mode: &DisplayMode,
    options: &ChartOptions,
    as_of: NaiveDate,
    max_grid_symbols: usize,
) -> Result<Vec<ChartOutcome>, EngineError> {
    let selected = select_symbols(symbols, mode, max_grid_symbols)?;
    Ok(selected
        .iter()
        .map(|symbol| prepare_symbol(source, symbol, options, as_of))
        .collect())
}
