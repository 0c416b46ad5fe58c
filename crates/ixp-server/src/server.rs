//! Server assembly and lifecycle

use std::future::Future;
use std::net::SocketAddr;

use ixp_orchestrator::{LabMonitor, MonitorHandle, OrchestratorClient, OrchestratorError};
use ixp_store::{ArtifactStore, RepositoryError};

use crate::config::{AppConfig, ConfigError};
use crate::routes::routes;
use crate::state::AppState;

/// Startup failures
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("cannot prepare storage: {0}")]
    Storage(#[from] RepositoryError),

    #[error(transparent)]
    Orchestrator(#[from] OrchestratorError),

    #[error("cannot bind listener: {0}")]
    Bind(#[from] warp::Error),
}

/// Prepared server: storage opened, monitor running, not yet listening
#[derive(Debug)]
pub struct Server {
    state: AppState,
    monitor: Option<MonitorHandle>,
    addr: SocketAddr,
}

impl Server {
    /// Open storage and start the lab monitor
    ///
    /// # Errors
    /// Unresolvable listen address, unusable storage directories or
    /// orchestrator URL
    pub async fn prepare(config: &AppConfig) -> Result<Self, ServerError> {
        let addr = config.socket_addr()?;
        let store = ArtifactStore::open(&config.storage, config.validation.validator()).await?;
        let orchestrator = OrchestratorClient::new(&config.orchestrator)?;

        let mut state = AppState::new(store, orchestrator.clone())
            .with_body_limit(config.server.body_limit_bytes);

        let monitor = config.orchestrator.monitor_enabled.then(|| {
            LabMonitor::new(orchestrator, config.orchestrator.poll_interval()).spawn()
        });
        if let Some(handle) = &monitor {
            state = state.with_snapshots(handle.subscribe());
        }

        Ok(Self { state, monitor, addr })
    }

    #[inline]
    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Serve until `shutdown` resolves
    ///
    /// # Errors
    /// [`ServerError::Bind`] if the address cannot be bound
    pub async fn run(self, shutdown: impl Future<Output = ()> + Send + 'static) -> Result<(), ServerError> {
        let (bound, serving) = warp::serve(routes(self.state.clone()))
            .try_bind_with_graceful_shutdown(self.addr, shutdown)?;
        tracing::info!(addr = %bound, version = crate::VERSION, "ixp server listening");

        serving.await;

        if let Some(monitor) = self.monitor {
            monitor.shutdown().await;
        }
        tracing::info!("ixp server stopped");
        Ok(())
    }
}
