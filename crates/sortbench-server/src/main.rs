#![doc = include_str!("../README.md")]

mod server;

use clap::Parser;
use core::future::IntoFuture;
use server::config::{CliArgs, ServerConfig};
use server::service::router::router;
use server::telemetry::init_telemetry;
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::signal;
use tokio_util::sync::CancellationToken;

// Sort workers allocate one array copy each; mimalloc holds up better than
// the system allocator under that many concurrent allocations.
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

fn main() -> anyhow::Result<()> {
    // Load from .env
    let _ = dotenvy::dotenv();
    let args = CliArgs::parse();
    let config = ServerConfig::try_from(args)?;

    rayon::ThreadPoolBuilder::new()
        .num_threads(config.sort_threads)
        .thread_name(|i| format!("sortbench-sort-{i}"))
        .build_global()?;

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(config.worker_threads)
        .thread_name("sortbench")
        .enable_all()
        .build()?;

    runtime.block_on(run(config))
}

async fn run(config: ServerConfig) -> anyhow::Result<()> {
    let providers = init_telemetry()?;

    let listener = TcpListener::bind(&config.server_addr).await?;
    log_startup_info(listener.local_addr()?, &config);

    let shutdown = CancellationToken::new();
    let server = axum::serve(listener, router(&config))
        .with_graceful_shutdown(shutdown_signal(shutdown.clone()))
        .into_future();

    // In-flight requests get `shutdown_timeout` to finish once a signal
    // arrives; after that the server future is dropped.
    let drain_deadline = async {
        shutdown.cancelled().await;
        tokio::time::sleep(config.shutdown_timeout).await;
    };

    let res = tokio::select! {
        res = server => res.map_err(anyhow::Error::from),
        () = drain_deadline => {
            tracing::warn!(
                "Graceful drain timed out after {:?}, dropping in-flight requests",
                config.shutdown_timeout
            );
            Ok(())
        }
    };

    if res.is_ok() {
        tracing::info!("Service shut down successfully");
    }
    providers.shutdown();
    res
}

fn log_startup_info(addr: SocketAddr, config: &ServerConfig) {
    if cfg!(debug_assertions) {
        tracing::info!("Starting sort service on {addr} with full config: {config:#?}");
    } else {
        tracing::info!(
            "Starting sort service on {addr} with {} worker threads and {} sort threads",
            config.worker_threads,
            config.sort_threads
        );
    }
}

async fn shutdown_signal(shutdown: CancellationToken) {
    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    tokio::select! {
        () = ctrl_c => tracing::info!("Received Ctrl+C signal"),
        () = terminate => tracing::info!("Received SIGTERM signal"),
    }

    tracing::info!("Shutdown signal received, draining in-flight requests...");
    shutdown.cancel();
}
