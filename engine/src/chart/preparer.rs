// Turns a raw price/volume series into a ChartSpec
use super::ticks::select_tick_policy;
use crate::error::EngineError;
use crate::indicators::{MovingAverageWindow, Sma};
use shared::models::{Candle, ChartSpec, LastValue, Period, RawSeries, SeriesPoint};
use std::collections::BTreeMap;

/// Builds the chart description for one symbol.
///
/// Pure: the same inputs always produce an equal `ChartSpec`. Moving averages
/// are only present for windows the series can fill; an empty series fails
/// with `EmptySeries` and yields nothing.
pub fn prepare(
    raw: &RawSeries,
    symbol: &str,
    period: Period,
    windows: &[MovingAverageWindow],
) -> Result<ChartSpec, EngineError> {
    let candles = raw.candles();
    let last = raw.last().ok_or_else(|| EngineError::EmptySeries { symbol: symbol.to_string() })?;
    let previous = candles.len().checked_sub(2).map(|i| &candles[i]);

    let close_series = candles.iter().map(|c| SeriesPoint { date: c.date, value: c.close }).collect();
    let volume_series = candles.iter().map(|c| SeriesPoint { date: c.date, value: c.volume }).collect();

    let mut moving_averages = BTreeMap::new();
    for &window in windows {
        if candles.len() < window.periods() {
            tracing::debug!(
                symbol = %symbol,
                window = %window,
                points = candles.len(),
                "Series too short for moving average, omitting it"
            );
            continue;
        }
        moving_averages.insert(window.get(), moving_average_points(candles, window));
    }

    Ok(ChartSpec {
        symbol: symbol.to_string(),
        close_series,
        moving_averages,
        volume_series,
        last_value: last_value(last, previous),
        tick_policy: select_tick_policy(period),
    })
}

fn moving_average_points(candles: &[Candle], window: MovingAverageWindow) -> Vec<SeriesPoint> {
    candles
        .iter()
        .zip(Sma::new(window).calculate(candles))
        .filter_map(|(c, value)| value.map(|value| SeriesPoint { date: c.date, value }))
        .collect()
}

fn last_value(last: &Candle, previous: Option<&Candle>) -> LastValue {
    let previous_close = previous.map_or(last.close, |c| c.close);
    let change = last.close - previous_close;
    let percent_change = if previous_close == 0.0 { 0.0 } else { change / previous_close * 100.0 };

    LastValue {
        date: last.date,
        close: last.close,
        previous_close,
        change,
        percent_change,
    }
}
