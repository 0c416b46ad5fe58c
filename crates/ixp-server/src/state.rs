//! Shared handler state

use ixp_orchestrator::{LabSnapshot, OrchestratorClient};
use ixp_store::ArtifactStore;
use tokio::sync::watch;

use crate::config::DEFAULT_BODY_LIMIT;

/// State cloned into every request
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: ArtifactStore,
    pub orchestrator: OrchestratorClient,
    /// Present when the background monitor runs
    pub snapshots: Option<watch::Receiver<LabSnapshot>>,
    pub body_limit: u64,
}

impl AppState {
    #[must_use]
    pub fn new(store: ArtifactStore, orchestrator: OrchestratorClient) -> Self {
        Self {
            store,
            orchestrator,
            snapshots: None,
            body_limit: DEFAULT_BODY_LIMIT,
        }
    }

    #[inline]
    #[must_use]
    pub fn with_snapshots(mut self, snapshots: watch::Receiver<LabSnapshot>) -> Self {
        self.snapshots = Some(snapshots);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_body_limit(mut self, limit: u64) -> Self {
        self.body_limit = limit;
        self
    }
}
