//! swmgmt-routed - IPv4 route synchronization daemon
//!
//! Serves `routemgmt.RouteMgmt` and programs announced routes into the
//! switch's L3 tables.

use anyhow::Context;
use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;
use swmgmt_asic::{L3Api, SoftAsic};
use swmgmt_routed::config::DEFAULT_CONFIG_PATH;
use swmgmt_routed::{RouteMgmtServer, RouteMgmtService, RoutedConfig, Switch};
use tonic::transport::Server;
use tracing::{error, info};

type Backend = Box<dyn L3Api>;

#[derive(Debug, Parser)]
#[command(version, about = "IPv4 route synchronization daemon")]
struct Args {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// Listen address, overrides [server] listen
    #[arg(short, long)]
    listen: Option<String>,

    /// ASIC unit, overrides [asic] unit
    #[arg(short, long)]
    unit: Option<i32>,

    /// Log level used when RUST_LOG is not set
    #[arg(long, default_value = "info")]
    log_level: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Args::parse();
    init_logging(&args.log_level);

    info!("--- Starting swmgmt-routed ---");

    match run(args).await {
        Ok(()) => {
            info!("swmgmt-routed exiting");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("swmgmt-routed failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_logging(log_level: &str) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).with_thread_ids(true))
        .init();
}

fn load_config(args: &Args) -> anyhow::Result<RoutedConfig> {
    let mut config = RoutedConfig::load_or_default(&args.config)
        .with_context(|| format!("loading {}", args.config.display()))?;

    if let Some(listen) = &args.listen {
        config.server.listen = listen.clone();
    }
    if let Some(unit) = args.unit {
        config.asic.unit = unit;
    }

    config.validate()?;
    Ok(config)
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = load_config(&args)?;
    let addr = config.listen_addr()?;

    let asic: Backend = Box::new(SoftAsic::with_config(config.unit(), config.soft_asic()));
    let switch = Switch::new(asic, &config.route_manager())
        .context("failed to bring up routing on the switch")?;
    let switch = Arc::new(switch);

    info!(unit = %config.unit(), "Switch ready");

    let (mut health_reporter, health_service) = tonic_health::server::health_reporter();
    health_reporter
        .set_serving::<RouteMgmtServer<RouteMgmtService<Backend>>>()
        .await;

    let service = RouteMgmtService::new(Arc::clone(&switch));

    info!(%addr, "Route management service listening");

    Server::builder()
        .add_service(health_service)
        .add_service(RouteMgmtServer::new(service))
        .serve_with_shutdown(addr, shutdown_signal())
        .await
        .context("route management server failed")?;

    switch.lock().await.routes.log_summary();
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}
