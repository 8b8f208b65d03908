// Engine main entry point
use anyhow::Context;
use engine::config::settings::EngineSettings;
use engine::data::routed_source_from_settings;
use engine::services::chart_service::ChartEngineService;
use engine::services::ChartEngineServer;
use std::net::SocketAddr;
use std::sync::Arc;
use tonic::transport::Server;
use tracing::info;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    info!("Starting stock chart engine...");

    let settings = EngineSettings::load()?;
    let addr: SocketAddr = format!("{}:{}", settings.host, settings.port)
        .parse()
        .with_context(|| format!("Invalid listen address {}:{}", settings.host, settings.port))?;
    info!(
        default_dir = %settings.data.default_dir.display(),
        alternate_dir = %settings.data.alternate_dir.display(),
        alternate_suffix = %settings.data.alternate_suffix,
        "Engine will listen on {}",
        addr
    );

    let source = routed_source_from_settings(&settings.data);
    let chart_service = ChartEngineService::new(Arc::new(source), Arc::new(settings));

    Server::builder()
        .add_service(ChartEngineServer::new(chart_service))
        .serve(addr)
        .await?;

    Ok(())
}
