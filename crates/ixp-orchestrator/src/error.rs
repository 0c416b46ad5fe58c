//! Orchestrator client errors

/// Errors talking to the lab orchestrator
#[derive(Debug, thiserror::Error)]
pub enum OrchestratorError {
    /// Base URL unusable
    #[error("invalid orchestrator url {url}: {reason}")]
    InvalidUrl { url: String, reason: String },

    /// Connection, timeout or protocol failure
    #[error("orchestrator unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    /// Non-success status
    #[error("orchestrator returned {status} for {endpoint}: {body}")]
    Status {
        endpoint: String,
        status: u16,
        body: String,
    },

    /// Response body not in the expected shape
    #[error("unexpected response from {endpoint}: {source}")]
    Decode {
        endpoint: String,
        #[source]
        source: serde_json::Error,
    },
}

impl OrchestratorError {
    /// Whether the orchestrator could not be reached at all
    #[inline]
    #[must_use]
    pub fn is_transport(&self) -> bool {
        matches!(self, Self::Transport(_))
    }
}
