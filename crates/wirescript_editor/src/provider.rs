// SPDX-License-Identifier: MIT OR Apache-2.0
//! Boundary to the rendering surface that owns screen-space layout.

use crate::geometry::{ScreenPoint, ScreenRect};
use wirescript_graph::{EdgeId, NodeId};

/// Answers screen-space questions about rendered entities.
///
/// The editing core never computes layout itself; the host surface that
/// draws nodes and edge paths implements this and reports geometry back.
pub trait GeometryProvider {
    /// Nodes whose rendered geometry overlaps the rectangle
    fn overlapping_nodes(&self, rect: &ScreenRect) -> Vec<NodeId>;

    /// Screen-space bounding box of one node, `None` when not laid out
    fn node_bounds(&self, id: NodeId) -> Option<ScreenRect>;

    /// Endpoints of an edge's rendered path, `None` when not laid out.
    /// An edge without endpoints silently does not participate in
    /// selection.
    fn edge_endpoints(&self, id: EdgeId) -> Option<(ScreenPoint, ScreenPoint)>;
}
