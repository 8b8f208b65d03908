// Handler for the PrepareChartGrid RPC
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tonic::{Response, Status};

use super::helpers::{resolve_options, symbols_or_default, to_chart_result};
use crate::chart::{prepare_symbol, select_symbols};
use crate::config::settings::EngineSettings;
use crate::data::SeriesSource;
use crate::services::{ChartGridRequest, ChartResult};
use shared::models::DisplayMode;

pub async fn handle_prepare_chart_grid(
    req_payload: ChartGridRequest,
    source: Arc<dyn SeriesSource>,
    settings: Arc<EngineSettings>,
) -> Result<Response<ReceiverStream<Result<ChartResult, Status>>>, Status> {
    let resolved = resolve_options(req_payload.options, &settings.chart)?;
    let symbols = symbols_or_default(&req_payload.symbols, &settings.chart);

    // The whole grid is refused up front; nothing is streamed in that case.
    let selected = select_symbols(&symbols, &DisplayMode::Multiple, settings.chart.max_grid_symbols)?;
    tracing::debug!(count = selected.len(), "Handling PrepareChartGrid in dedicated handler");

    let (tx, rx) = mpsc::channel(4);

    let worker_tx = tx.clone();
    let worker = tokio::task::spawn_blocking(move || {
        for symbol in selected {
            let outcome = prepare_symbol(source.as_ref(), &symbol, &resolved.options, resolved.as_of);
            let result = to_chart_result(&outcome, &resolved.warnings);
            if worker_tx.blocking_send(Ok(result)).is_err() {
                tracing::warn!(symbol = %symbol, "Client dropped the chart grid stream");
                break;
            }
        }
    });

    // A grid cut short by a failed worker ends with an error item.
    tokio::spawn(async move {
        if let Err(e) = worker.await {
            tracing::error!(error = %e, "Chart grid worker failed");
            let _ = tx
                .send(Err(Status::internal(format!("Chart grid preparation failed: {}", e))))
                .await;
        }
    });

    Ok(Response::new(ReceiverStream::new(rx)))
}
