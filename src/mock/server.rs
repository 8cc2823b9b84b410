use super::routes::create_router;
use super::state::MockState;
use anyhow::{Context, Result};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tokio::task::JoinHandle;
use tracing::{error, info};

/// Serve the mock API on `listener` until the task is stopped
pub async fn serve(listener: TcpListener, state: MockState) -> Result<()> {
    let addr = listener.local_addr()?;
    info!("Mock classification service listening on http://{}", addr);

    axum::serve(listener, create_router(state))
        .await
        .context("Mock service stopped unexpectedly")
}

/// A mock service running on a background task
pub struct MockServer {
    addr: SocketAddr,
    state: MockState,
    task: JoinHandle<()>,
}

impl MockServer {
    /// Bind `addr` (use port 0 for an ephemeral port) and start serving
    pub async fn start(addr: &str) -> Result<Self> {
        let listener = TcpListener::bind(addr)
            .await
            .with_context(|| format!("Failed to bind mock service to {}", addr))?;
        let addr = listener.local_addr()?;
        let state = MockState::new();

        let serve_state = state.clone();
        let task = tokio::spawn(async move {
            if let Err(e) = serve(listener, serve_state).await {
                error!("{:#}", e);
            }
        });

        Ok(Self { addr, state, task })
    }

    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Ledger shared with the running handlers
    pub fn state(&self) -> &MockState {
        &self.state
    }
}

impl Drop for MockServer {
    fn drop(&mut self) {
        self.task.abort();
    }
}
