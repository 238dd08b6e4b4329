//! REST resource types consumed by the dashboard.
//!
//! The backend owns all durable state; these types only describe what the
//! client reads and posts. Fields the backend may omit (`description`,
//! `config`, `status`) default instead of failing the whole decode.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A backend-registered controller/host that owns devices and teleop groups.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: i64,
    pub uuid: String,
}

impl Node {
    /// Display label used in node selectors and section headers.
    pub fn label(&self) -> String {
        format!("Node #{} - {}", self.id, self.uuid)
    }
}

/// Run state of a device or teleop group.
///
/// Anything the backend reports that is not `running` or `stopped` maps to
/// `Unknown`; only `stopped` offers a start action, everything else offers
/// a stop action.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityStatus {
    Running,
    #[default]
    Stopped,
    #[serde(other)]
    Unknown,
}

impl EntityStatus {
    pub fn is_stopped(self) -> bool {
        self == EntityStatus::Stopped
    }

    pub fn label(self) -> &'static str {
        match self {
            EntityStatus::Running => "running",
            EntityStatus::Stopped => "stopped",
            EntityStatus::Unknown => "unknown",
        }
    }
}

/// A controllable peripheral (camera, arm, VR rig, hand) attached to a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Device {
    pub id: i64,
    pub node_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub category: String,
    #[serde(rename = "type")]
    pub device_type: String,
    #[serde(default)]
    pub status: EntityStatus,
    /// Schema-declared field name to configured value.
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}

/// A named binding of device roles for coordinated remote operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TeleopGroup {
    pub id: i64,
    pub node_id: i64,
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(rename = "type")]
    pub group_type: String,
    #[serde(default)]
    pub status: EntityStatus,
    /// Role name to device id. The backend stores whatever the form
    /// submitted, so ids arrive as JSON numbers or strings.
    #[serde(default)]
    pub config: BTreeMap<String, Value>,
}

/// Error body carried by 4xx/5xx responses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiMessage {
    pub message: String,
}

/// `GET /api/devices` returns either a flat list or a per-node mapping.
///
/// Both shapes normalize to the same totals and the same flattened list,
/// so callers never branch on which one the backend picked.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DevicesPayload {
    List(Vec<Device>),
    ByNode(BTreeMap<String, Vec<Device>>),
}

impl DevicesPayload {
    /// Total device count across both payload shapes.
    pub fn total(&self) -> usize {
        match self {
            DevicesPayload::List(devices) => devices.len(),
            DevicesPayload::ByNode(by_node) => by_node.values().map(Vec::len).sum(),
        }
    }

    /// Flatten into a single device list.
    pub fn into_devices(self) -> Vec<Device> {
        match self {
            DevicesPayload::List(devices) => devices,
            DevicesPayload::ByNode(by_node) => by_node.into_values().flatten().collect(),
        }
    }
}

/// Resolve a teleop-group config value to a device id.
pub fn config_device_id(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.parse().ok(),
        _ => None,
    }
}

/// Partition entities by owning node.
///
/// Every node gets a section, including nodes that own nothing; entities
/// pointing at an unlisted node are dropped.
pub fn partition_by_node<T>(
    nodes: &[Node],
    items: Vec<T>,
    node_id: impl Fn(&T) -> i64,
) -> Vec<(Node, Vec<T>)> {
    let mut sections: Vec<(Node, Vec<T>)> =
        nodes.iter().cloned().map(|node| (node, Vec::new())).collect();
    for item in items {
        let owner = node_id(&item);
        if let Some((_, bucket)) = sections.iter_mut().find(|(node, _)| node.id == owner) {
            bucket.push(item);
        }
    }
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn device(id: i64, node_id: i64) -> Device {
        Device {
            id,
            node_id,
            name: format!("dev-{id}"),
            description: String::new(),
            category: "Camera".into(),
            device_type: "RealSenseCamera".into(),
            status: EntityStatus::Stopped,
            config: BTreeMap::new(),
        }
    }

    #[test]
    fn devices_total_matches_for_both_shapes() {
        let flat = DevicesPayload::List(vec![device(1, 1), device(2, 1), device(3, 2)]);
        let mut by_node = BTreeMap::new();
        by_node.insert("1".to_string(), vec![device(1, 1), device(2, 1)]);
        by_node.insert("2".to_string(), vec![device(3, 2)]);
        let grouped = DevicesPayload::ByNode(by_node);

        assert_eq!(flat.total(), 3);
        assert_eq!(grouped.total(), 3);
        assert_eq!(grouped.into_devices().len(), 3);
    }

    #[test]
    fn partition_keeps_empty_nodes() {
        let nodes = vec![
            Node { id: 1, uuid: "aa".into() },
            Node { id: 2, uuid: "bb".into() },
        ];
        let sections = partition_by_node(
            &nodes,
            vec![device(10, 1), device(11, 1)],
            |d| d.node_id,
        );

        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].1.len(), 2);
        assert!(sections[1].1.is_empty());
    }

    #[test]
    fn partition_drops_orphaned_entities() {
        let nodes = vec![Node { id: 1, uuid: "aa".into() }];
        let sections = partition_by_node(&nodes, vec![device(10, 99)], |d| d.node_id);
        assert!(sections[0].1.is_empty());
    }

    #[test]
    fn config_device_id_accepts_numbers_and_strings() {
        assert_eq!(config_device_id(&json!(7)), Some(7));
        assert_eq!(config_device_id(&json!("7")), Some(7));
        assert_eq!(config_device_id(&json!("camera")), None);
        assert_eq!(config_device_id(&json!(null)), None);
    }

    #[test]
    fn status_start_stop_split() {
        assert!(EntityStatus::Stopped.is_stopped());
        assert!(!EntityStatus::Running.is_stopped());
        assert!(!EntityStatus::Unknown.is_stopped());
    }
}
