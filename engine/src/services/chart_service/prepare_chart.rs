// Handler for the PrepareChart RPC
use std::sync::Arc;
use tonic::{Response, Status};

use super::helpers::{resolve_options, symbols_or_default, to_chart_result};
use crate::chart::prepare_batch;
use crate::config::settings::EngineSettings;
use crate::data::SeriesSource;
use crate::services::{ChartRequest, ChartResult};
use shared::models::DisplayMode;

pub async fn handle_prepare_chart(
    req_payload: ChartRequest,
    source: Arc<dyn SeriesSource>,
    settings: Arc<EngineSettings>,
) -> Result<Response<ChartResult>, Status> {
    let resolved = resolve_options(req_payload.options, &settings.chart)?;
    let symbols = symbols_or_default(&req_payload.symbols, &settings.chart);
    let selected = Some(req_payload.selected).filter(|s| !s.trim().is_empty());

    let mode = DisplayMode::Single { selected };
    let max_grid_symbols = settings.chart.max_grid_symbols;

    let options = resolved.options.clone();
    let as_of = resolved.as_of;
    let outcomes = tokio::task::spawn_blocking(move || {
        prepare_batch(source.as_ref(), &symbols, &mode, &options, as_of, max_grid_symbols)
    })
    .await
    .map_err(|e| Status::internal(format!("Chart preparation task failed: {}", e)))??;

    let outcome = outcomes
        .into_iter()
        .next()
        .ok_or_else(|| Status::invalid_argument("No symbol to chart"))?;
    tracing::debug!(symbol = %outcome.symbol, loaded = outcome.is_loaded(), "Handled PrepareChart");

    Ok(Response::new(to_chart_result(&outcome, &resolved.warnings)))
}
