// SPDX-License-Identifier: MIT OR Apache-2.0
//! The in-progress connection drag and the per-port compatibility map
//! that drives disabled-port highlighting.

use crate::geometry::ScreenPoint;
use std::collections::HashMap;
use wirescript_graph::{can_connect, DefinitionCatalog, EdgeEndpoint, GraphNode, NodeId};

/// Which end of the eventual edge the drag started from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragOrigin {
    /// Started on an output port; the drag seeks a target
    Source,
    /// Started on an input port; the drag seeks a source
    Target,
}

/// A connection being dragged out of a port
#[derive(Debug, Clone, PartialEq)]
pub struct ConnectionDrag {
    /// Node the drag started on
    pub node_id: NodeId,
    /// Port the drag started on
    pub port_id: String,
    /// Which side of the edge that port will become
    pub origin: DragOrigin,
    /// Latest pointer position, for drawing the pending wire
    pub current: ScreenPoint,
}

impl ConnectionDrag {
    /// Start a drag from a port
    pub fn begin(
        node_id: NodeId,
        port_id: impl Into<String>,
        origin: DragOrigin,
        at: ScreenPoint,
    ) -> Self {
        Self {
            node_id,
            port_id: port_id.into(),
            origin,
            current: at,
        }
    }

    /// The fixed endpoint of the pending edge
    pub fn endpoint(&self) -> EdgeEndpoint {
        EdgeEndpoint::new(self.node_id, self.port_id.clone())
    }
}

/// Compatibility of every known port against an in-progress drag.
///
/// Keys are `(node id, port id)`; the value says whether dropping the wire
/// there would be legal, so the host can dim the rest. Argument order into
/// the oracle follows the drag direction: a source-originated drag tests
/// `drag port -> candidate`, a target-originated one `candidate -> drag
/// port`. Nodes whose type has no definition are skipped, as are drags
/// from a port the catalog does not know.
pub fn compatibility_map<'a>(
    catalog: &DefinitionCatalog,
    nodes: impl IntoIterator<Item = &'a GraphNode>,
    drag: &ConnectionDrag,
) -> HashMap<(NodeId, String), bool> {
    let nodes: Vec<&GraphNode> = nodes.into_iter().collect();
    let mut map = HashMap::new();

    let drag_port = nodes
        .iter()
        .find(|node| node.id == drag.node_id)
        .and_then(|node| catalog.port(&node.node_type, &drag.port_id));
    let Some(drag_port) = drag_port else {
        tracing::debug!(port = %drag.port_id, "compatibility map: unknown drag port");
        return map;
    };

    for node in nodes {
        let Some(definition) = catalog.get(&node.node_type) else {
            continue;
        };
        for port in &definition.ports {
            let compatible = match drag.origin {
                DragOrigin::Source => can_connect(drag_port, port),
                DragOrigin::Target => can_connect(port, drag_port),
            };
            map.insert((node.id, port.id.clone()), compatible);
        }
    }
    map
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirescript_graph::{NodeDefinition, PortDescriptor, PortKind, Position, ValueType};

    fn catalog() -> DefinitionCatalog {
        let mut catalog = DefinitionCatalog::new();
        catalog.register(NodeDefinition {
            id: "math/add".to_string(),
            display_name: "Add".to_string(),
            category: "math".to_string(),
            ports: vec![
                PortDescriptor::data("a", "A", PortKind::DataIn, ValueType::Float),
                PortDescriptor::data("sum", "Sum", PortKind::DataOut, ValueType::Float),
                PortDescriptor::data("name", "Name", PortKind::DataIn, ValueType::String),
            ],
        });
        catalog
    }

    #[test]
    fn test_map_follows_drag_direction() {
        let catalog = catalog();
        let a = GraphNode::new("math/add", Position::new(0.0, 0.0));
        let b = GraphNode::new("math/add", Position::new(100.0, 0.0));
        let nodes = [a.clone(), b.clone()];

        // Dragging out of an output seeks matching inputs
        let drag = ConnectionDrag::begin(
            a.id,
            "sum",
            DragOrigin::Source,
            ScreenPoint::new(0.0, 0.0),
        );
        let map = compatibility_map(&catalog, nodes.iter(), &drag);
        assert!(map[&(b.id, "a".to_string())]);
        assert!(!map[&(b.id, "name".to_string())]);
        assert!(!map[&(b.id, "sum".to_string())]);

        // Dragging out of an input seeks matching outputs
        let drag = ConnectionDrag::begin(
            b.id,
            "a",
            DragOrigin::Target,
            ScreenPoint::new(0.0, 0.0),
        );
        let map = compatibility_map(&catalog, nodes.iter(), &drag);
        assert!(map[&(a.id, "sum".to_string())]);
        assert!(!map[&(a.id, "a".to_string())]);
    }

    #[test]
    fn test_nodes_without_definition_skipped() {
        let catalog = catalog();
        let known = GraphNode::new("math/add", Position::new(0.0, 0.0));
        let unknown = GraphNode::new("mystery/node", Position::new(50.0, 0.0));
        let nodes = [known.clone(), unknown.clone()];

        let drag = ConnectionDrag::begin(
            known.id,
            "sum",
            DragOrigin::Source,
            ScreenPoint::new(0.0, 0.0),
        );
        let map = compatibility_map(&catalog, nodes.iter(), &drag);
        assert!(!map.keys().any(|(node_id, _)| *node_id == unknown.id));
    }

    #[test]
    fn test_unknown_drag_port_yields_empty_map() {
        let catalog = catalog();
        let node = GraphNode::new("math/add", Position::new(0.0, 0.0));
        let drag = ConnectionDrag::begin(
            node.id,
            "nope",
            DragOrigin::Source,
            ScreenPoint::new(0.0, 0.0),
        );
        assert!(compatibility_map(&catalog, [&node], &drag).is_empty());
    }
}
