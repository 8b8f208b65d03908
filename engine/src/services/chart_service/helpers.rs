// Helper functions for chart_service RPC implementations
use crate::chart::{axis_ticks, ChartOptions, ChartOutcome};
use crate::config::settings::ChartSettings;
use crate::error::EngineError;
use crate::services::proto;
use chrono::{Local, NaiveDate, NaiveTime};
use shared::models::{ChartSpec, Period, SeriesPoint, TickLocator, TimeFrame};
use shared::utils::{format_annotation, moving_average_label, parse_symbol_list};

/// Options of one request after defaults are applied.
#[derive(Debug, Clone)]
pub struct ResolvedOptions {
    pub options: ChartOptions,
    pub as_of: NaiveDate,
    /// Moving-average labels that were dropped.
    pub warnings: Vec<String>,
}

pub fn resolve_options(raw: Option<proto::ChartOptions>, defaults: &ChartSettings) -> Result<ResolvedOptions, EngineError> {
    let raw = raw.unwrap_or_default();

    let period: Period = if raw.period.trim().is_empty() {
        defaults.default_period
    } else {
        raw.period.parse()?
    };
    let time_frame: TimeFrame = if raw.time_frame.trim().is_empty() {
        defaults.default_time_frame
    } else {
        raw.time_frame.parse()?
    };
    let as_of = if raw.as_of.trim().is_empty() {
        Local::now().date_naive()
    } else {
        NaiveDate::parse_from_str(raw.as_of.trim(), "%Y-%m-%d")
            .map_err(|e| EngineError::InvalidOption(format!("as_of '{}': {}", raw.as_of, e)))?
    };

    let (options, rejected) = ChartOptions::from_labels(period, time_frame, &raw.moving_averages);
    Ok(ResolvedOptions {
        options,
        as_of,
        warnings: rejected.iter().map(ToString::to_string).collect(),
    })
}

/// Parsed symbol list, or the configured defaults when the text is blank.
pub fn symbols_or_default(text: &str, defaults: &ChartSettings) -> Vec<String> {
    if text.trim().is_empty() {
        parse_symbol_list(&defaults.default_symbols)
    } else {
        parse_symbol_list(text)
    }
}

pub fn to_proto_timestamp(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn to_proto_points(points: &[SeriesPoint]) -> Vec<proto::SeriesPoint> {
    points
        .iter()
        .map(|p| proto::SeriesPoint { timestamp: to_proto_timestamp(p.date), value: p.value })
        .collect()
}

pub fn to_proto_chart(spec: &ChartSpec) -> proto::ChartSpec {
    let ticks = match (spec.first_date(), spec.last_date()) {
        (Some(first), Some(last)) => axis_ticks(&spec.tick_policy, first, last),
        _ => Vec::new(),
    };
    let last = &spec.last_value;

    proto::ChartSpec {
        symbol: spec.symbol.clone(),
        close_series: to_proto_points(&spec.close_series),
        moving_averages: spec
            .moving_averages
            .iter()
            .map(|(&window, points)| proto::MovingAverage {
                window,
                label: moving_average_label(window),
                points: to_proto_points(points),
            })
            .collect(),
        volume_series: to_proto_points(&spec.volume_series),
        last_value: Some(proto::LastValue {
            timestamp: to_proto_timestamp(last.date),
            close: last.close,
            previous_close: last.previous_close,
            change: last.change,
            percent_change: last.percent_change,
            annotation: format_annotation(last),
        }),
        tick_policy: Some(proto::TickPolicy {
            locator: match spec.tick_policy.locator {
                TickLocator::Month => "month".to_string(),
                TickLocator::Year => "year".to_string(),
            },
            interval: spec.tick_policy.interval,
            label_format: spec.tick_policy.label_format().to_string(),
        }),
        ticks: ticks
            .into_iter()
            .map(|t| proto::AxisTick { timestamp: to_proto_timestamp(t.date), label: t.label })
            .collect(),
    }
}

pub fn to_chart_result(outcome: &ChartOutcome, warnings: &[String]) -> proto::ChartResult {
    let outcome_msg = match &outcome.result {
        Ok(spec) => proto::chart_result::Outcome::Chart(to_proto_chart(spec)),
        Err(e) => proto::chart_result::Outcome::Error(e.to_string()),
    };
    proto::ChartResult {
        symbol: outcome.symbol.clone(),
        status: outcome.status_line(),
        warnings: warnings.to_vec(),
        outcome: Some(outcome_msg),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_options_defaults() {
        let resolved = resolve_options(None, &ChartSettings::default()).unwrap();
        assert_eq!(resolved.options.period, Period::ThreeMonths);
        assert_eq!(resolved.options.time_frame, TimeFrame::Daily);
        assert!(resolved.options.windows().is_empty());
        assert!(resolved.warnings.is_empty());
    }

    #[test]
    fn test_resolve_options_reports_bad_labels() {
        let raw = proto::ChartOptions {
            period: "10y".to_string(),
            time_frame: "1wk".to_string(),
            moving_averages: vec!["25D".to_string(), "bogus".to_string()],
            as_of: "2024-02-29".to_string(),
        };
        let resolved = resolve_options(Some(raw), &ChartSettings::default()).unwrap();
        assert_eq!(resolved.options.period, Period::TenYears);
        assert_eq!(resolved.options.time_frame, TimeFrame::Weekly);
        assert_eq!(resolved.options.windows().len(), 1);
        assert_eq!(resolved.as_of, NaiveDate::from_ymd_opt(2024, 2, 29).unwrap());
        assert_eq!(resolved.warnings, vec!["Invalid moving average label 'bogus'".to_string()]);
    }

    #[test]
    fn test_resolve_options_rejects_bad_period_and_date() {
        let bad_period = proto::ChartOptions { period: "2W".to_string(), ..Default::default() };
        assert!(matches!(
            resolve_options(Some(bad_period), &ChartSettings::default()),
            Err(EngineError::InvalidOption(_))
        ));
        let bad_date = proto::ChartOptions { as_of: "29/02/2024".to_string(), ..Default::default() };
        assert!(matches!(
            resolve_options(Some(bad_date), &ChartSettings::default()),
            Err(EngineError::InvalidOption(_))
        ));
    }

    #[test]
    fn test_symbols_or_default() {
        let defaults = ChartSettings::default();
        assert_eq!(symbols_or_default(" ", &defaults).len(), 9);
        assert_eq!(symbols_or_default("tsla", &defaults), vec!["TSLA"]);
    }

    #[test]
    fn test_proto_timestamp_is_utc_midnight() {
        let date = NaiveDate::from_ymd_opt(1970, 1, 2).unwrap();
        assert_eq!(to_proto_timestamp(date), 86_400_000);
    }
}
