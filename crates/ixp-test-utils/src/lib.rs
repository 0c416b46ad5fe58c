//! Testing utilities for the IXP Digital Twin workspace
//!
//! Shared fixtures: scenario documents and ready-to-use stores.

#![allow(missing_docs)]

use ixp_artifact::ConfigValidator;
use ixp_store::{ArtifactStore, StorageConfig};
use serde_json::{json, Value};
use tempfile::TempDir;

/// Smallest document the validator accepts
pub fn minimal_config(scenario: &str) -> String {
    json!({
        "scenario_name": scenario,
        "peering_lan": {},
        "route_servers": {}
    })
    .to_string()
}

/// Full scenario document as produced by the config form
pub fn sample_config_value(scenario: &str) -> Value {
    json!({
        "scenario_name": scenario,
        "host_interface": "eth0",
        "peering_lan": {"4": "193.201.28.0/23", "6": "2001:7f8:10::/48"},
        "peering_configuration": {"type": "ixp_manager", "path": "peering.json"},
        "rib_dumps": {
            "type": "open_bgpd",
            "dumps": {"4": "rib_v4.dump", "6": "rib_v6.dump"}
        },
        "route_servers": {
            "rs1_v4": {
                "type": "open_bgpd",
                "image": "kathara/openbgpd",
                "name": "rs1_v4",
                "as_num": 196_959,
                "config": "rs1_v4.conf",
                "address": "193.201.28.1"
            }
        }
    })
}

/// [`sample_config_value`] serialized compactly
pub fn sample_config(scenario: &str) -> String {
    sample_config_value(scenario).to_string()
}

/// `PUT` body for a create request
pub fn create_body(name: &str, content: &str) -> String {
    json!({"name": name, "content": content}).to_string()
}

/// `POST` body for an update request
pub fn update_body(content: &str) -> String {
    json!({"content": content}).to_string()
}

/// Directory-backed store in a fresh temp dir; keep the dir alive
pub async fn temp_store() -> (TempDir, StorageConfig, ArtifactStore) {
    let dir = tempfile::tempdir().unwrap();
    let config = StorageConfig::with_root(dir.path());
    let store = ArtifactStore::open(&config, ConfigValidator::new())
        .await
        .unwrap();
    (dir, config, store)
}

/// In-memory store with the default validator
pub fn memory_store() -> ArtifactStore {
    ArtifactStore::in_memory(ConfigValidator::new())
}
