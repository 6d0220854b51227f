//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::Router;
use tokio::net::TcpListener;

use content_dispatch::dispatch::AppContext;
use content_dispatch::resources::register_content;
use content_dispatch::{Dispatcher, DispatcherConfig, HandlerRegistry, HttpServer, Shutdown};

/// Dispatcher with the content handlers and a fresh in-memory store.
pub fn dispatcher(config: &DispatcherConfig) -> Dispatcher {
    let registry = register_content(HandlerRegistry::builder(), &config.dispatch.controller_prefix)
        .build()
        .unwrap();
    Dispatcher::from_config(config, registry, Arc::new(AppContext::in_memory())).unwrap()
}

/// Fully layered router, for `oneshot` tests.
#[allow(dead_code)]
pub fn router(config: DispatcherConfig) -> Router {
    let dispatcher = Arc::new(dispatcher(&config));
    HttpServer::new(config, dispatcher).router()
}

/// A server bound to an ephemeral port. Shuts down on drop.
#[allow(dead_code)]
pub struct TestServer {
    pub addr: SocketAddr,
    shutdown: Shutdown,
}

#[allow(dead_code)]
impl TestServer {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

impl Drop for TestServer {
    fn drop(&mut self) {
        self.shutdown.trigger();
    }
}

/// Start the server on 127.0.0.1:0.
#[allow(dead_code)]
pub async fn start_server(config: DispatcherConfig) -> TestServer {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let dispatcher = Arc::new(dispatcher(&config));
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, dispatcher);
    tokio::spawn(server.run(listener, shutdown.subscribe()));

    TestServer { addr, shutdown }
}
