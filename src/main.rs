use clap::Parser;
use std::sync::Arc;

use static_server::cli::Cli;
use static_server::config::Config;
use static_server::{logger, server};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = Config::load(&cli).map_err(|e| {
        logger::log_fatal(&format!("Failed to load configuration: {e}"));
        e
    })?;
    logger::init(&cfg.logging)?;

    // Create Tokio runtime, sized by the workers setting
    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();
    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
    }
    let runtime = runtime_builder.build()?;

    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr).map_err(|e| {
        logger::log_fatal(&format!("Failed to bind {addr}: {e}"));
        e
    })?;

    logger::log_server_start(&addr, &cfg);
    server::run(listener, Arc::new(cfg), server::shutdown_signal()).await;
    Ok(())
}
