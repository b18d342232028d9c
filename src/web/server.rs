//! Web server for dsforum.

use std::net::SocketAddr;

use tokio::net::TcpListener;

use crate::config::ServerConfig;
use crate::{ForumError, Result};

use super::handlers::AppState;
use super::router::{create_health_router, create_router};

/// Web server serving the forum pages.
pub struct WebServer {
    /// Server address.
    addr: SocketAddr,
    /// Application state.
    state: AppState,
}

impl WebServer {
    /// Create a new web server.
    pub fn new(config: &ServerConfig, state: AppState) -> Result<Self> {
        let addr = format!("{}:{}", config.host, config.port)
            .parse()
            .map_err(|_| {
                ForumError::Config(format!(
                    "invalid server address {}:{}",
                    config.host, config.port
                ))
            })?;

        Ok(Self { addr, state })
    }

    /// Get the server address.
    pub fn addr(&self) -> SocketAddr {
        self.addr
    }

    fn build_router(state: AppState) -> axum::Router {
        create_router(state).merge(create_health_router())
    }

    /// Run the web server.
    pub async fn run(self) -> Result<()> {
        let router = Self::build_router(self.state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        axum::serve(listener, router).await?;
        Ok(())
    }

    /// Run the server and return the actual bound address.
    ///
    /// This is useful for testing when binding to port 0.
    pub async fn run_with_addr(self) -> Result<SocketAddr> {
        let router = Self::build_router(self.state);

        let listener = TcpListener::bind(self.addr).await?;
        let local_addr = listener.local_addr()?;
        tracing::info!("Web server listening on http://{}", local_addr);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, router).await {
                tracing::error!("Web server error: {}", e);
            }
        });

        Ok(local_addr)
    }
}
