// SPDX-License-Identifier: MIT OR Apache-2.0
//! Node instances, node definitions, and the definition catalog.

use crate::port::PortDescriptor;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a node instance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    /// Create a new random node ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

/// A point in canvas units
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Position {
    /// Horizontal coordinate
    pub x: f32,
    /// Vertical coordinate
    pub y: f32,
}

impl Position {
    /// Create a position
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Offset by a fixed vector
    pub fn offset(self, dx: f32, dy: f32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// User-entered values attached to a node instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeData {
    /// Literal values for data-in ports that have no incoming edge,
    /// keyed by port id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub overrides: IndexMap<String, serde_json::Value>,
    /// Values for non-port node controls, keyed by control id
    #[serde(default, skip_serializing_if = "IndexMap::is_empty")]
    pub controls: IndexMap<String, serde_json::Value>,
}

impl NodeData {
    /// Whether both maps are empty
    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty() && self.controls.is_empty()
    }
}

/// A node instance in the document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphNode {
    /// Unique instance ID
    pub id: NodeId,
    /// Definition id in the external catalog
    #[serde(rename = "type")]
    pub node_type: String,
    /// Canvas position
    pub position: Position,
    /// Optional user label overriding the definition's display name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    /// Overrides and control values; `None` when entirely empty
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<NodeData>,
}

impl GraphNode {
    /// Create a node of the given definition type at a position
    pub fn new(node_type: impl Into<String>, position: Position) -> Self {
        Self {
            id: NodeId::new(),
            node_type: node_type.into(),
            position,
            label: None,
            data: None,
        }
    }

    /// Drop `data` when it holds no overrides and no controls
    pub fn normalize_data(&mut self) {
        if self.data.as_ref().is_some_and(NodeData::is_empty) {
            self.data = None;
        }
    }
}

/// A node type definition owned by the external catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeDefinition {
    /// Unique type identifier
    pub id: String,
    /// Display name
    pub display_name: String,
    /// Palette category
    #[serde(default)]
    pub category: String,
    /// Ports in declaration order
    pub ports: Vec<PortDescriptor>,
}

impl NodeDefinition {
    /// Look up a port by id
    pub fn port(&self, port_id: &str) -> Option<&PortDescriptor> {
        self.ports.iter().find(|p| p.id == port_id)
    }
}

/// Registry of available node definitions
///
/// Document nodes referencing a definition the catalog does not know are
/// treated as non-participating and skipped, never an error.
#[derive(Debug, Default)]
pub struct DefinitionCatalog {
    definitions: IndexMap<String, NodeDefinition>,
}

impl DefinitionCatalog {
    /// Create a new empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition
    pub fn register(&mut self, definition: NodeDefinition) {
        self.definitions.insert(definition.id.clone(), definition);
    }

    /// Get a definition by type id
    pub fn get(&self, type_id: &str) -> Option<&NodeDefinition> {
        self.definitions.get(type_id)
    }

    /// Resolve a port descriptor for a document node
    pub fn port(&self, node_type: &str, port_id: &str) -> Option<&PortDescriptor> {
        self.get(node_type).and_then(|d| d.port(port_id))
    }

    /// All registered definitions
    pub fn definitions(&self) -> impl Iterator<Item = &NodeDefinition> {
        self.definitions.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{PortKind, ValueType};

    #[test]
    fn test_normalize_empty_data() {
        let mut node = GraphNode::new("math/add", Position::new(0.0, 0.0));
        node.data = Some(NodeData::default());
        node.normalize_data();
        assert!(node.data.is_none());

        let mut node = GraphNode::new("math/add", Position::new(0.0, 0.0));
        let mut data = NodeData::default();
        data.overrides
            .insert("a".to_string(), serde_json::json!(1));
        node.data = Some(data);
        node.normalize_data();
        assert!(node.data.is_some());
    }

    #[test]
    fn test_catalog_port_lookup() {
        let mut catalog = DefinitionCatalog::new();
        catalog.register(NodeDefinition {
            id: "math/add".to_string(),
            display_name: "Add".to_string(),
            category: "math".to_string(),
            ports: vec![
                PortDescriptor::data("a", "A", PortKind::DataIn, ValueType::Float),
                PortDescriptor::data("sum", "Sum", PortKind::DataOut, ValueType::Float),
            ],
        });

        assert!(catalog.port("math/add", "a").is_some());
        assert!(catalog.port("math/add", "missing").is_none());
        assert!(catalog.port("unknown", "a").is_none());
    }

    #[test]
    fn test_node_serde_skips_empty_fields() {
        let node = GraphNode::new("event/start", Position::new(4.0, 8.0));
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("label").is_none());
        assert!(json.get("data").is_none());
        assert_eq!(json["type"], "event/start");
    }
}
