//! content-dispatch server.
//!
//! ```text
//!   Client ──▶ axum fallback ──▶ Dispatcher ──▶ rewrite ──▶ parse ──▶ resolve ──▶ Handler
//!                                    │                                              │
//!                                    ◀──────────────── Reply / ErrorPayload ◀────────┘
//! ```

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use content_dispatch::config::{load_config, resolve_config_path};
use content_dispatch::dispatch::AppContext;
use content_dispatch::lifecycle::{wait_for_signal, Shutdown};
use content_dispatch::observability::{logging, metrics};
use content_dispatch::resources::register_content;
use content_dispatch::{Dispatcher, DispatcherConfig, HandlerRegistry, HttpServer};

#[derive(Parser)]
#[command(name = "content-dispatch")]
#[command(about = "REST request dispatcher for the content service", long_about = None)]
struct Cli {
    /// Config file, or a directory holding dispatcher.toml / dispatcher.dist.toml
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override listener.bind_address
    #[arg(short, long)]
    bind: Option<String>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let path = resolve_config_path(cli.config.as_deref());
    let (mut config, loaded) = if cli.config.is_none() && !path.exists() {
        (DispatcherConfig::default(), false)
    } else {
        (load_config(&path)?, true)
    };
    if let Some(bind) = cli.bind {
        config.listener.bind_address = bind;
    }

    logging::init(&config.observability)?;

    tracing::info!("content-dispatch v{} starting", env!("CARGO_PKG_VERSION"));
    if loaded {
        tracing::info!(path = %path.display(), "Configuration loaded");
    } else {
        tracing::warn!(path = %path.display(), "No configuration file found, using defaults");
    }

    if config.observability.metrics_enabled {
        let addr: SocketAddr = config.observability.metrics_address.parse()?;
        metrics::init_metrics(addr)?;
    }

    let registry = register_content(
        HandlerRegistry::builder(),
        &config.dispatch.controller_prefix,
    )
    .build()?;
    tracing::info!(handlers = ?registry.ids(), "Handler registry built");

    let app = Arc::new(AppContext::in_memory());
    let dispatcher = Arc::new(Dispatcher::from_config(&config, registry, app)?);

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(
        address = %listener.local_addr()?,
        request_timeout_secs = config.timeouts.request_secs,
        "Listening for connections"
    );

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    let mut server_task = tokio::spawn(server.run(listener, shutdown.subscribe()));

    tokio::select! {
        result = &mut server_task => {
            result??;
            tracing::warn!("HTTP server exited before a shutdown signal");
            return Ok(());
        }
        signal = wait_for_signal() => signal?,
    }
    shutdown.trigger();
    server_task.await??;

    tracing::info!("Shutdown complete");
    Ok(())
}
