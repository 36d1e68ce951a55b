//! Shared utilities for integration and load testing.

use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use item_service::{HttpServer, MemoryStore, ServiceConfig, Shutdown};

/// A running service bound to an ephemeral local port.
#[allow(dead_code)]
pub struct TestService {
    pub addr: SocketAddr,
    pub store: MemoryStore,
    pub shutdown: Shutdown,
    pub handle: JoinHandle<Result<(), std::io::Error>>,
}

impl TestService {
    pub fn url(&self, path: &str) -> String {
        format!("http://{}{}", self.addr, path)
    }
}

/// Start the service with default config and a fresh store.
pub async fn start_service() -> TestService {
    start_service_with(ServiceConfig::default()).await
}

/// Start the service with `config`; the bind address is replaced by an ephemeral port.
pub async fn start_service_with(config: ServiceConfig) -> TestService {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let store = MemoryStore::new();
    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(store.clone()));
    let server_shutdown = shutdown.subscribe();

    // The listener is already bound, so requests queue until serve starts.
    let handle = tokio::spawn(async move { server.run(listener, server_shutdown).await });

    TestService {
        addr,
        store,
        shutdown,
        handle,
    }
}

pub fn client() -> reqwest::Client {
    reqwest::Client::builder().no_proxy().build().unwrap()
}
