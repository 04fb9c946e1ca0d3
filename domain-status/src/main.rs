//! Domain Status service binary.
//!
//! Loads layered configuration, builds the checker and serves the router
//! until interrupted.

use clap::Parser;
use domain_status::{build_router, build_settings, Args};
use domain_status_lib::DomainChecker;
use std::process;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    let args = Args::parse();
    init_tracing(args.verbose);

    if let Err(e) = run(args).await {
        error!("{}", e);
        process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let default_directives = if verbose {
        "domain_status=debug,domain_status_lib=debug"
    } else {
        "domain_status=info,domain_status_lib=info"
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directives));

    tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let settings = build_settings(&args)?;
    let checker = DomainChecker::with_config(settings.check.clone())?;

    info!(
        version = env!("CARGO_PKG_VERSION"),
        authorities = checker.authorities().len(),
        bootstrap = settings.check.enable_bootstrap,
        timeout = ?settings.check.timeout,
        "starting domain-status"
    );

    let listener = tokio::net::TcpListener::bind((settings.bind.as_str(), settings.port)).await?;
    info!("listening on http://{}", listener.local_addr()?);

    axum::serve(listener, build_router(checker))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}
