// engine/src/services/chart_service/mod.rs
// ChartEngineService implements the generated ChartEngine trait and hands
// each RPC to its handler module.

use super::{ChartEngine, ChartGridRequest, ChartRequest, ChartResult};
use crate::config::settings::EngineSettings;
use crate::data::SeriesSource;
use std::sync::Arc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Request, Response, Status};

pub mod helpers;
pub mod prepare_chart;
pub mod prepare_chart_grid;

pub struct ChartEngineService {
    source: Arc<dyn SeriesSource>,
    settings: Arc<EngineSettings>,
}

impl ChartEngineService {
    pub fn new(source: Arc<dyn SeriesSource>, settings: Arc<EngineSettings>) -> Self {
        ChartEngineService { source, settings }
    }
}

#[tonic::async_trait]
impl ChartEngine for ChartEngineService {
    async fn prepare_chart(&self, request: Request<ChartRequest>) -> Result<Response<ChartResult>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(
            symbols = %req_payload.symbols,
            selected = %req_payload.selected,
            "Received PrepareChartRequest, dispatching to handler."
        );
        prepare_chart::handle_prepare_chart(req_payload, self.source.clone(), self.settings.clone()).await
    }

    type PrepareChartGridStream = ReceiverStream<Result<ChartResult, Status>>;
    async fn prepare_chart_grid(
        &self,
        request: Request<ChartGridRequest>,
    ) -> Result<Response<Self::PrepareChartGridStream>, Status> {
        let req_payload = request.into_inner();
        tracing::info!(symbols = %req_payload.symbols, "Received PrepareChartGridRequest, dispatching to handler.");
        prepare_chart_grid::handle_prepare_chart_grid(req_payload, self.source.clone(), self.settings.clone()).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::{CsvLayout, CsvSeriesSource};
    use crate::services::proto::{self, chart_result::Outcome};
    use tempfile::TempDir;
    use tokio_stream::StreamExt;

    const AS_OF: &str = "2024-01-12";

    // Ten consecutive weekdays of closes 10..=19, ending on AS_OF.
    fn write_ten_day_csv(dir: &TempDir, symbol: &str) {
        let dates = [
            "2024-01-01", "2024-01-02", "2024-01-03", "2024-01-04", "2024-01-05",
            "2024-01-08", "2024-01-09", "2024-01-10", "2024-01-11", "2024-01-12",
        ];
        let mut content = String::from("Date,Open,High,Low,Close,Volume\n");
        for (i, date) in dates.iter().enumerate() {
            let close = 10 + i;
            content.push_str(&format!("{},{},{},{},{},{}\n", date, close, close, close, close, 1000 * (i + 1)));
        }
        std::fs::write(dir.path().join(format!("{}.csv", symbol)), content).unwrap();
    }

    fn create_test_engine(dir: &TempDir) -> ChartEngineService {
        let source = CsvSeriesSource::new("default", dir.path(), CsvLayout::Default);
        ChartEngineService::new(Arc::new(source), Arc::new(EngineSettings::default()))
    }

    fn options(moving_averages: &[&str]) -> Option<proto::ChartOptions> {
        Some(proto::ChartOptions {
            period: "3M".to_string(),
            time_frame: "1d".to_string(),
            moving_averages: moving_averages.iter().map(|s| s.to_string()).collect(),
            as_of: AS_OF.to_string(),
        })
    }

    fn chart_of(result: &ChartResult) -> &proto::ChartSpec {
        match result.outcome.as_ref() {
            Some(Outcome::Chart(chart)) => chart,
            other => panic!("expected a chart, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_prepare_chart_success() {
        let dir = tempfile::tempdir().unwrap();
        write_ten_day_csv(&dir, "AAPL");
        let engine = create_test_engine(&dir);

        let request = Request::new(ChartRequest {
            symbols: "aapl, msft".to_string(),
            selected: String::new(),
            options: options(&["5D", "200D", "junk"]),
        });
        let response = engine.prepare_chart(request).await.unwrap().into_inner();

        assert_eq!(response.symbol, "AAPL");
        assert_eq!(response.status, "Loaded: AAPL");
        assert_eq!(response.warnings.len(), 1);

        let chart = chart_of(&response);
        assert_eq!(chart.close_series.len(), 10);
        assert_eq!(chart.volume_series.len(), 10);
        assert_eq!(chart.moving_averages.len(), 1);
        let ma = &chart.moving_averages[0];
        assert_eq!(ma.window, 5);
        assert_eq!(ma.label, "5D MA");
        assert_eq!(ma.points.len(), 6);
        assert_eq!(ma.points[0].value, 12.0);
        assert_eq!(ma.points[5].value, 17.0);

        let last = chart.last_value.as_ref().unwrap();
        assert_eq!(last.close, 19.0);
        assert_eq!(last.previous_close, 18.0);
        assert_eq!(last.annotation, "24-01-12 19.00 (+1.00, +5.56%)");

        let policy = chart.tick_policy.as_ref().unwrap();
        assert_eq!((policy.locator.as_str(), policy.interval), ("month", 1));
        let tick_labels: Vec<&str> = chart.ticks.iter().map(|t| t.label.as_str()).collect();
        assert_eq!(tick_labels, vec!["24-01-01"]);
    }

    #[tokio::test]
    async fn test_prepare_chart_unknown_symbol_is_reported_not_failed() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let request = Request::new(ChartRequest {
            symbols: "AAPL".to_string(),
            selected: "zzzz".to_string(),
            options: options(&[]),
        });
        let response = engine.prepare_chart(request).await.unwrap().into_inner();
        assert_eq!(response.symbol, "ZZZZ");
        assert!(response.status.starts_with("Error: ZZZZ - "));
        assert!(matches!(response.outcome, Some(Outcome::Error(_))));
    }

    #[tokio::test]
    async fn test_prepare_chart_invalid_period() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let mut opts = options(&[]);
        if let Some(o) = opts.as_mut() {
            o.period = "7Y".to_string();
        }
        let request = Request::new(ChartRequest { symbols: "AAPL".to_string(), selected: String::new(), options: opts });
        let status = engine.prepare_chart(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("7Y"));
    }

    #[tokio::test]
    async fn test_prepare_chart_grid_streams_each_symbol() {
        let dir = tempfile::tempdir().unwrap();
        write_ten_day_csv(&dir, "AAPL");
        write_ten_day_csv(&dir, "NVDA");
        let engine = create_test_engine(&dir);

        let request = Request::new(ChartGridRequest {
            symbols: "aapl,missing,nvda".to_string(),
            options: options(&["5D"]),
        });
        let mut stream = engine.prepare_chart_grid(request).await.unwrap().into_inner();

        let mut results = Vec::new();
        while let Some(item) = stream.next().await {
            results.push(item.unwrap());
        }

        let symbols: Vec<&str> = results.iter().map(|r| r.symbol.as_str()).collect();
        assert_eq!(symbols, vec!["AAPL", "MISSING", "NVDA"]);
        assert_eq!(chart_of(&results[0]).moving_averages.len(), 1);
        assert!(matches!(results[1].outcome, Some(Outcome::Error(_))));
        assert_eq!(results[2].status, "Loaded: NVDA");
    }

    #[tokio::test]
    async fn test_prepare_chart_grid_refuses_too_many_symbols() {
        let dir = tempfile::tempdir().unwrap();
        let engine = create_test_engine(&dir);
        let request = Request::new(ChartGridRequest {
            symbols: "A,B,C,D,E,F,G,H,I,J".to_string(),
            options: options(&[]),
        });
        let status = engine.prepare_chart_grid(request).await.unwrap_err();
        assert_eq!(status.code(), tonic::Code::InvalidArgument);
        assert!(status.message().contains("Too many symbols"));
    }

    struct PanickingSource;

    impl SeriesSource for PanickingSource {
        fn name(&self) -> &str {
            "panicking"
        }

        fn fetch(&self, _query: &crate::data::SeriesQuery) -> Result<shared::models::RawSeries, crate::error::EngineError> {
            panic!("source blew up");
        }
    }

    #[tokio::test]
    async fn test_prepare_chart_grid_reports_failed_worker() {
        let engine = ChartEngineService::new(Arc::new(PanickingSource), Arc::new(EngineSettings::default()));
        let request = Request::new(ChartGridRequest {
            symbols: "AAPL,MSFT".to_string(),
            options: options(&[]),
        });
        let mut stream = engine.prepare_chart_grid(request).await.unwrap().into_inner();

        let mut items = Vec::new();
        while let Some(item) = stream.next().await {
            items.push(item);
        }

        assert_eq!(items.len(), 1);
        let status = items.pop().unwrap().unwrap_err();
        assert_eq!(status.code(), tonic::Code::Internal);
        assert!(status.message().contains("Chart grid preparation failed"));
    }
}
