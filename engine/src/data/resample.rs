// Aggregates daily candles into weekly or monthly bars
use chrono::{Datelike, Days, NaiveDate};
use shared::models::{Candle, TimeFrame};

/// Start date of the bar a daily candle belongs to: the Monday of its ISO
/// week, or the 1st of its month.
fn bucket_start(date: NaiveDate, time_frame: TimeFrame) -> NaiveDate {
    match time_frame {
        TimeFrame::Daily => date,
        TimeFrame::Weekly => date
            .checked_sub_days(Days::new(date.weekday().num_days_from_monday() as u64))
            .unwrap_or(date),
        TimeFrame::Monthly => date.with_day(1).unwrap_or(date),
    }
}

/// Input must be in ascending date order. Each bar keeps the first open, the
/// highest high, the lowest low, the last close and the summed volume.
pub fn resample(candles: &[Candle], time_frame: TimeFrame) -> Vec<Candle> {
    if time_frame == TimeFrame::Daily {
        return candles.to_vec();
    }

    let mut bars: Vec<Candle> = Vec::new();
    for candle in candles {
        let start = bucket_start(candle.date, time_frame);
        match bars.last_mut() {
            Some(bar) if bar.date == start => {
                bar.high = bar.high.max(candle.high);
                bar.low = bar.low.min(candle.low);
                bar.close = candle.close;
                bar.volume += candle.volume;
            }
            _ => bars.push(Candle { date: start, ..*candle }),
        }
    }
    bars
}
