//! Wire types of the orchestrator API

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Lab state as seen by the dashboard
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum LabStatus {
    #[default]
    Stopped,
    Running {
        hash: String,
        /// Passed through as reported
        #[serde(default)]
        discovered: Value,
    },
}

impl LabStatus {
    #[inline]
    #[must_use]
    pub fn is_running(&self) -> bool {
        matches!(self, Self::Running { .. })
    }

    /// Lab hash while running
    #[must_use]
    pub fn hash(&self) -> Option<&str> {
        match self {
            Self::Running { hash, .. } => Some(hash),
            Self::Stopped => None,
        }
    }
}

/// One container of the running lab
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceStats {
    pub name: String,
    pub status: String,
    pub interfaces: Value,
    pub uptime: Value,
    pub network_rx_mb: f64,
    pub network_tx_mb: f64,
    pub cpu_percent: f64,
    pub memory_usage_mb: f64,
    pub memory_limit_mb: f64,
    pub memory_percent: f64,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunningResponse {
    pub(crate) info: RunningInfo,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RunningInfo {
    pub(crate) hash: String,
    #[serde(default)]
    pub(crate) discovered: Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct StartRequest<'a> {
    pub(crate) filename: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StartResponse {
    pub(crate) lab_hash: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct DevicesResponse {
    #[serde(default)]
    pub(crate) devices: Vec<DeviceStats>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn status_serializes_with_state_tag() {
        assert_eq!(serde_json::to_value(LabStatus::Stopped).unwrap(), json!({"state": "stopped"}));
        let running = LabStatus::Running {
            hash: "abc".into(),
            discovered: json!(true),
        };
        assert_eq!(
            serde_json::to_value(&running).unwrap(),
            json!({"state": "running", "hash": "abc", "discovered": true})
        );
        assert_eq!(running.hash(), Some("abc"));
    }

    #[test]
    fn device_record_tolerates_missing_metrics() {
        let device: DeviceStats = serde_json::from_value(json!({
            "name": "rs1",
            "status": "running",
            "cpu_percent": 12.5,
            "interfaces": 2
        }))
        .unwrap();
        assert_eq!(device.name, "rs1");
        assert_eq!(device.cpu_percent, 12.5);
        assert_eq!(device.memory_percent, 0.0);
        assert_eq!(device.interfaces, json!(2));
    }
}
