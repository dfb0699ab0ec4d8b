//! Topology graph builder and Mermaid serialisation.

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::ParsedConfig;

pub const DEVICE_FALLBACK_LABEL: &str = "Device";
pub const UNKNOWN_LABEL: &str = "Unknown";
pub const PLACEHOLDER_LABEL: &str = "No CDP/LLDP neighbors detected";
const PLACEHOLDER_ID: &str = "empty";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub source_node_id: String,
    pub source_port_label: String,
    pub dest_node_id: String,
    pub dest_port_label: String,
}

/// Adjacency graph around the analysed device. Never empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopologyGraph {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

impl TopologyGraph {
    /// Build the graph: device first, then remote devices in first-seen order,
    /// one edge per neighbour record.
    pub fn build(model: &ParsedConfig) -> Self {
        let device_label = model
            .hostname
            .clone()
            .unwrap_or_else(|| DEVICE_FALLBACK_LABEL.to_string());
        let device = Node {
            id: "n0".to_string(),
            label: device_label,
        };

        if model.neighbors.is_empty() {
            debug!("No neighbours; emitting placeholder topology");
            return Self {
                edges: vec![Edge {
                    source_node_id: device.id.clone(),
                    source_port_label: String::new(),
                    dest_node_id: PLACEHOLDER_ID.to_string(),
                    dest_port_label: String::new(),
                }],
                nodes: vec![
                    device,
                    Node {
                        id: PLACEHOLDER_ID.to_string(),
                        label: PLACEHOLDER_LABEL.to_string(),
                    },
                ],
            };
        }

        let mut nodes = vec![device];
        let mut edges = Vec::with_capacity(model.neighbors.len());
        for neighbor in &model.neighbors {
            let label = if neighbor.remote_device_id.is_empty() {
                UNKNOWN_LABEL
            } else {
                neighbor.remote_device_id.as_str()
            };
            // The device node is never a neighbour, even when the labels match.
            let dest_id = match nodes.iter().skip(1).find(|n| n.label == label) {
                Some(node) => node.id.clone(),
                None => {
                    let id = format!("n{}", nodes.len());
                    nodes.push(Node {
                        id: id.clone(),
                        label: label.to_string(),
                    });
                    id
                }
            };
            edges.push(Edge {
                source_node_id: nodes[0].id.clone(),
                source_port_label: neighbor.local_interface.clone(),
                dest_node_id: dest_id,
                dest_port_label: neighbor.remote_interface.clone(),
            });
        }

        debug!(nodes = nodes.len(), edges = edges.len(), "Built topology graph");
        Self { nodes, edges }
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Mermaid `graph TD` source: node declarations, then labelled edges.
    pub fn to_mermaid(&self) -> String {
        let mut out = String::from("graph TD\n");
        for node in &self.nodes {
            out.push_str(&format!("    {}[\"{}\"]\n", node.id, escape_label(&node.label)));
        }
        for edge in &self.edges {
            if edge.source_port_label.is_empty() && edge.dest_port_label.is_empty() {
                out.push_str(&format!("    {} --> {}\n", edge.source_node_id, edge.dest_node_id));
            } else {
                out.push_str(&format!(
                    "    {} -- \"{} <-> {}\" --> {}\n",
                    edge.source_node_id,
                    escape_label(&edge.source_port_label),
                    escape_label(&edge.dest_port_label),
                    edge.dest_node_id
                ));
            }
        }
        out
    }
}

fn escape_label(label: &str) -> String {
    label.replace('"', "#quot;")
}
