// SPDX-License-Identifier: MIT OR Apache-2.0
//! Edge (wire) definitions.

use crate::node::NodeId;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for an edge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EdgeId(pub Uuid);

impl EdgeId {
    /// Create a new random edge ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EdgeId {
    fn default() -> Self {
        Self::new()
    }
}

/// One end of an edge: a port on a node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EdgeEndpoint {
    /// Node the port belongs to
    pub node_id: NodeId,
    /// Port id within the node's definition
    pub port_id: String,
}

impl EdgeEndpoint {
    /// Create an endpoint
    pub fn new(node_id: NodeId, port_id: impl Into<String>) -> Self {
        Self {
            node_id,
            port_id: port_id.into(),
        }
    }
}

/// A directed wire between two ports
///
/// The source is always an `*-out` port and the target an `*-in` port;
/// the oracle enforces this before creation, so it is not re-validated
/// here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    /// Unique edge ID
    pub id: EdgeId,
    /// Origin port
    pub source: EdgeEndpoint,
    /// Destination port
    pub target: EdgeEndpoint,
}

impl Edge {
    /// Create a new edge with a fresh id
    pub fn new(source: EdgeEndpoint, target: EdgeEndpoint) -> Self {
        Self {
            id: EdgeId::new(),
            source,
            target,
        }
    }

    /// Whether either end lands on the given node
    pub fn touches(&self, node_id: NodeId) -> bool {
        self.source.node_id == node_id || self.target.node_id == node_id
    }

    /// Whether both endpoint tuples match another edge's
    pub fn same_endpoints(&self, other: &Edge) -> bool {
        self.source == other.source && self.target == other.target
    }

    /// Whether the edge terminates at the given (node, port) pair
    pub fn terminates_at(&self, node_id: NodeId, port_id: &str) -> bool {
        self.target.node_id == node_id && self.target.port_id == port_id
    }
}
