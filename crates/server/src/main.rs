use clap::Parser;
use perfwatch_monitor::config::load_from_file;
use perfwatch_monitor::{MonitorConfig, PerformanceMonitor};
use perfwatch_server::api::{self, AppState};
use perfwatch_server::cli::Cli;
use perfwatch_server::shutdown::wait_for_shutdown;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .json()
        .init();

    let cli = Cli::parse();
    let config = match &cli.config {
        Some(path) => load_from_file(path)?,
        None => MonitorConfig::default(),
    };

    let monitor = PerformanceMonitor::new(config)?;
    monitor.start_retention();

    let listener = tokio::net::TcpListener::bind(&cli.listen).await?;
    tracing::info!(
        addr = %cli.listen,
        rules = monitor.alert_rules().len(),
        "perfwatch server starting"
    );

    api::serve(listener, AppState::new(monitor.clone()), wait_for_shutdown()).await?;

    monitor.stop_retention();
    tracing::info!("perfwatch server stopped");
    Ok(())
}
