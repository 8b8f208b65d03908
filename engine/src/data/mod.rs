// Market data loading: sources, routing and resampling
pub mod csv_source;
pub mod resample;
pub mod source;

pub use csv_source::{CsvLayout, CsvSeriesSource};
pub use source::{RoutedSource, SeriesQuery, SeriesSource};

use crate::config::settings::DataSettings;

/// Default CSV directory for most symbols, alternate directory for symbols
/// carrying the configured market suffix.
pub fn routed_source_from_settings(settings: &DataSettings) -> RoutedSource {
    RoutedSource::new(
        Box::new(CsvSeriesSource::new("default", &settings.default_dir, CsvLayout::Default)),
        Box::new(CsvSeriesSource::new("alternate", &settings.alternate_dir, CsvLayout::Alternate)),
        &settings.alternate_suffix,
    )
}
