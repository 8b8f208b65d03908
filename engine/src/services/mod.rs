// gRPC surface of the engine
pub mod chart_service;

pub mod proto {
    tonic::include_proto!("charting");
}

pub use proto::chart_engine_server::{ChartEngine, ChartEngineServer};
pub use proto::{ChartGridRequest, ChartRequest, ChartResult};
