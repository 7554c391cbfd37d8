// src/server/server.rs
// Lifecycle for the health endpoint: bind, accept loop, graceful shutdown.
use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Result;
use hyper::server::conn::Http;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::health::HealthService;
use crate::server::handler::RequestHandler;

/// Serves the HTTP surface for one `HealthService`. Multiple servers may run
/// in the same process; they share nothing.
pub struct HealthServer {
    addr: SocketAddr,
    service: Arc<HealthService>,
}

/// Running server. Dropping the handle leaves the server running; call
/// `shutdown` to stop it.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown_tx: watch::Sender<bool>,
    task: JoinHandle<()>,
}

impl HealthServer {
    pub fn new(addr: SocketAddr, service: Arc<HealthService>) -> Self {
        Self { addr, service }
    }

    /// Bind the listener and spawn the accept loop, one Hyper task per
    /// connection. Returns once the socket is bound, so the resolved address
    /// (port 0 requests an ephemeral port) is available immediately.
    pub async fn start(self) -> Result<ServerHandle> {
        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let handler = RequestHandler::new(self.service);

        info!("health endpoint listening on {}", local_addr);

        let task = tokio::spawn(async move {
            loop {
                tokio::select! {
                    accepted = listener.accept() => {
                        match accepted {
                            Ok((stream, peer)) => {
                                let svc = handler.clone();
                                tokio::spawn(async move {
                                    if let Err(err) = Http::new().serve_connection(stream, svc).await {
                                        warn!(%peer, %err, "connection error");
                                    }
                                });
                            }
                            Err(err) => {
                                warn!(%err, "accept failed");
                            }
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            info!("health endpoint on {} shutting down", local_addr);
                            break;
                        }
                    }
                }
            }
        });

        Ok(ServerHandle {
            local_addr,
            shutdown_tx,
            task,
        })
    }
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    /// Stop accepting connections and wait for the accept loop to exit.
    pub async fn shutdown(self) {
        let _ = self.shutdown_tx.send(true);
        let _ = self.task.await;
    }
}
