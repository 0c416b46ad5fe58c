//! Typed view of an IXP scenario document
//!
//! The validation engine stores documents as raw JSON; this module offers a
//! lenient typed projection used before a lab start to find the resource
//! files a scenario reads. Nothing here is used to reject a document.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Route server / RIB dump implementation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum DaemonKind {
    /// OpenBGPD
    #[default]
    OpenBgpd,
    /// BIRD
    Bird,
    /// FRRouting
    Frr,
    /// Anything else written by an operator
    #[serde(other)]
    Unknown,
}

/// Source of the peering member list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PeeringSource {
    /// IXP Manager export
    #[default]
    IxpManager,
    /// Custom member dump
    Custom,
    #[serde(other)]
    Unknown,
}

/// Per address-family pair, keyed `"4"` and `"6"` on the wire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct AddressFamilies {
    #[serde(rename = "4", default)]
    pub v4: String,
    #[serde(rename = "6", default)]
    pub v6: String,
}

/// `peering_configuration` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PeeringConfiguration {
    #[serde(rename = "type", default)]
    pub kind: PeeringSource,
    /// Resource file holding the member list
    #[serde(default)]
    pub path: String,
}

/// `rib_dumps` section
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RibDumps {
    #[serde(rename = "type", default)]
    pub kind: DaemonKind,
    /// Resource files per address family
    #[serde(default)]
    pub dumps: AddressFamilies,
}

/// Value inside `route_servers`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteServerEntry {
    #[serde(rename = "type", default)]
    pub kind: DaemonKind,
    /// Container image
    #[serde(default)]
    pub image: String,
    #[serde(default)]
    pub name: String,
    /// AS number, non-negative
    #[serde(default)]
    pub as_num: u32,
    /// Configuration file name
    #[serde(default)]
    pub config: String,
    /// Peering LAN address
    #[serde(default)]
    pub address: String,
}

/// Typed IXP scenario
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IxpConfig {
    pub scenario_name: String,
    #[serde(default)]
    pub host_interface: Option<String>,
    pub peering_lan: AddressFamilies,
    #[serde(default)]
    pub peering_configuration: Option<PeeringConfiguration>,
    #[serde(default)]
    pub rib_dumps: Option<RibDumps>,
    pub route_servers: BTreeMap<String, RouteServerEntry>,
}

impl IxpConfig {
    /// Resource files this scenario reads when a lab is built
    ///
    /// Empty names are skipped; order is peering list, RIB dumps (v4, v6),
    /// then route server configs by key.
    #[must_use]
    pub fn referenced_resources(&self) -> Vec<&str> {
        let mut out = Vec::new();
        if let Some(peering) = &self.peering_configuration {
            out.push(peering.path.as_str());
        }
        if let Some(ribs) = &self.rib_dumps {
            out.push(ribs.dumps.v4.as_str());
            out.push(ribs.dumps.v6.as_str());
        }
        out.extend(self.route_servers.values().map(|rs| rs.config.as_str()));
        out.retain(|name| !name.is_empty());
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "scenario_name": "namex_ixp",
            "host_interface": null,
            "peering_lan": {"4": "193.201.28.0/23", "6": "2001:7f8:10::/64"},
            "peering_configuration": {"type": "ixp_manager", "path": "members.json"},
            "rib_dumps": {"type": "bird", "dumps": {"4": "rib_v4.dump", "6": "rib_v6.dump"}},
            "route_servers": {
                "rs1": {
                    "type": "open_bgpd",
                    "image": "kathara/openbgpd",
                    "name": "rs1",
                    "as_num": 65000,
                    "config": "rs1.conf",
                    "address": "193.201.28.1"
                }
            }
        })
    }

    #[test]
    fn typed_view_parses_full_document() {
        let config: IxpConfig = serde_json::from_value(sample()).unwrap();
        assert_eq!(config.scenario_name, "namex_ixp");
        assert_eq!(config.peering_lan.v6, "2001:7f8:10::/64");
        assert_eq!(config.rib_dumps.as_ref().unwrap().kind, DaemonKind::Bird);
        assert_eq!(config.route_servers["rs1"].as_num, 65000);
    }

    #[test]
    fn unknown_daemon_kind_is_tolerated() {
        let mut doc = sample();
        doc["route_servers"]["rs1"]["type"] = json!("gobgp");
        let config: IxpConfig = serde_json::from_value(doc).unwrap();
        assert_eq!(config.route_servers["rs1"].kind, DaemonKind::Unknown);
    }

    #[test]
    fn referenced_resources_in_order() {
        let config: IxpConfig = serde_json::from_value(sample()).unwrap();
        assert_eq!(
            config.referenced_resources(),
            vec!["members.json", "rib_v4.dump", "rib_v6.dump", "rs1.conf"]
        );
    }
}
