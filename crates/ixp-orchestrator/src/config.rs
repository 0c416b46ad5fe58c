//! Orchestrator connection settings

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Orchestrator endpoint and polling settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Base URL, e.g. `http://localhost:8000`
    pub base_url: String,
    /// Per-request timeout in seconds
    pub request_timeout_secs: u64,
    /// Status poll period in seconds
    pub poll_interval_secs: u64,
    /// Run the background status monitor
    pub monitor_enabled: bool,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 10,
            poll_interval_secs: 5,
            monitor_enabled: true,
        }
    }
}

impl OrchestratorConfig {
    #[inline]
    #[must_use]
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    #[inline]
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval_secs = interval.as_secs().max(1);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_monitor(mut self, enabled: bool) -> Self {
        self.monitor_enabled = enabled;
        self
    }

    #[inline]
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Poll period, never shorter than one second
    #[inline]
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs.max(1))
    }
}
