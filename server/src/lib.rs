//! adboard authentication service: JSON login, registration and logout
//! endpoints over HTTP/1.1, backed by the shared user directory.

pub mod handlers;
pub mod router;

use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::{TokioIo, TokioTimer};
use shared::types::AppConfig;
use shared::{CredentialCodec, UserDirectory};
use tokio::net::TcpListener;
use tracing::{debug, info, warn};

#[derive(Debug, Clone)]
pub struct AppState {
    pub directory: Arc<UserDirectory>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    /// Build the codec from `config` and seed the directory with the demo
    /// accounts.
    pub async fn from_config(config: AppConfig) -> Result<Self> {
        let codec = CredentialCodec::from_config(&config.auth)
            .context("Failed to build credential codec (set auth.jwt_secret or JWT_SECRET)")?;

        let directory = UserDirectory::with_demo_accounts(codec)
            .await
            .map_err(|e| anyhow!("Failed to seed demo accounts: {}", e.to_message()))?;

        Ok(Self {
            directory: Arc::new(directory),
            config: Arc::new(config),
        })
    }
}

/// Accept connections on `listener` until the task is dropped.
pub async fn serve(listener: TcpListener, state: AppState) -> Result<()> {
    let local = listener
        .local_addr()
        .context("Failed to read listener address")?;
    info!("Listening on http://{}", local);

    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                continue;
            }
        };
        debug!("Accepted connection from {}", peer);

        let io = TokioIo::new(stream);
        let state = state.clone();

        tokio::task::spawn(async move {
            let service = service_fn(move |req| router::handle(req, state.clone()));
            if let Err(err) = http1::Builder::new()
                .timer(TokioTimer::new())
                .serve_connection(io, service)
                .await
            {
                warn!("Error serving connection from {}: {:?}", peer, err);
            }
        });
    }
}
