// Date-axis tick policy and tick placement
use chrono::{Datelike, NaiveDate};
use shared::models::{AxisTick, Period, TickLocator, TickPolicy};
use shared::utils::format_tick_label;

/// Fixed lookup from lookback period to major tick spacing.
pub fn select_tick_policy(period: Period) -> TickPolicy {
    match period {
        Period::ThreeMonths | Period::SixMonths => TickPolicy { locator: TickLocator::Month, interval: 1 },
        Period::OneYear => TickPolicy { locator: TickLocator::Month, interval: 3 },
        Period::TenYears => TickPolicy { locator: TickLocator::Year, interval: 1 },
        Period::ThreeYears | Period::FiveYears => TickPolicy { locator: TickLocator::Month, interval: 6 },
    }
}

/// Major ticks inside `[first, last]`.
///
/// Month ticks fall on the 1st of every month whose zero-based index is a
/// multiple of the interval (interval 3 gives Jan/Apr/Jul/Oct). Year ticks
/// fall on January 1st of years divisible by the interval.
pub fn axis_ticks(policy: &TickPolicy, first: NaiveDate, last: NaiveDate) -> Vec<AxisTick> {
    if first > last || policy.interval == 0 {
        return Vec::new();
    }

    let dates: Vec<NaiveDate> = match policy.locator {
        TickLocator::Month => month_starts(first, last)
            .filter(|d| (d.month() - 1) % policy.interval == 0)
            .collect(),
        TickLocator::Year => (first.year()..=last.year())
            .filter(|y| y.rem_euclid(policy.interval as i32) == 0)
            .filter_map(|y| NaiveDate::from_ymd_opt(y, 1, 1))
            .filter(|d| *d >= first && *d <= last)
            .collect(),
    };

    dates
        .into_iter()
        .map(|date| AxisTick { date, label: format_tick_label(date) })
        .collect()
}

// First day of every month that lies within [first, last].
fn month_starts(first: NaiveDate, last: NaiveDate) -> impl Iterator<Item = NaiveDate> {
    let mut cursor = NaiveDate::from_ymd_opt(first.year(), first.month(), 1);
    std::iter::from_fn(move || loop {
        let current = cursor?;
        if current > last {
            return None;
        }
        cursor = current.checked_add_months(chrono::Months::new(1));
        if current >= first {
            return Some(current);
        }
    })
}
