// SPDX-License-Identifier: MIT OR Apache-2.0
//! Box-selection state machine and the selected-entity sets.

use crate::geometry::{segment_intersects_rect, ScreenPoint, ScreenRect};
use crate::provider::GeometryProvider;
use std::collections::HashSet;
use wirescript_graph::{EdgeId, NodeId};

/// Displacement below which a press-release pair reads as a click, in
/// pixels
pub const CLICK_THRESHOLD: f32 = 4.0;

/// How a finalized drag box selects entities
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Left-to-right drag: nodes under the box; edges keep their previous
    /// selection state
    Enclosing,
    /// Right-to-left drag: additionally selects edges whose path crosses
    /// the box
    Crossing,
}

impl SelectionMode {
    /// Mode for the current drag direction. Recomputed on every move:
    /// reversing direction mid-drag flips it.
    fn from_direction(origin: ScreenPoint, current: ScreenPoint) -> Self {
        if current.x - origin.x < 0.0 {
            SelectionMode::Crossing
        } else {
            SelectionMode::Enclosing
        }
    }
}

/// The box-selection drag gesture
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum BoxDrag {
    /// No drag in progress
    #[default]
    Idle,
    /// Pointer pressed on empty canvas and possibly moving
    Dragging {
        /// Press position
        origin: ScreenPoint,
        /// Latest pointer position
        current: ScreenPoint,
        /// Mode implied by the latest direction
        mode: SelectionMode,
    },
}

/// What a completed drag gesture amounted to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DragOutcome {
    /// Displacement stayed under [`CLICK_THRESHOLD`]
    Click(ScreenPoint),
    /// A real box with its final mode
    Box {
        /// Normalized selection rectangle
        rect: ScreenRect,
        /// Mode at release time
        mode: SelectionMode,
    },
}

impl BoxDrag {
    /// Whether a drag gesture is in progress
    pub fn is_dragging(&self) -> bool {
        matches!(self, BoxDrag::Dragging { .. })
    }

    /// Start a drag at the press position
    pub fn begin(&mut self, origin: ScreenPoint) {
        *self = BoxDrag::Dragging {
            origin,
            current: origin,
            mode: SelectionMode::Enclosing,
        };
    }

    /// Track the pointer. No-op while idle.
    pub fn update(&mut self, point: ScreenPoint) {
        if let BoxDrag::Dragging { origin, current, mode } = self {
            *current = point;
            *mode = SelectionMode::from_direction(*origin, point);
        }
    }

    /// Finish the gesture and return what it was. `None` while idle.
    pub fn release(&mut self, point: ScreenPoint) -> Option<DragOutcome> {
        let BoxDrag::Dragging { origin, .. } = *self else {
            return None;
        };
        *self = BoxDrag::Idle;
        if origin.distance(point) < CLICK_THRESHOLD {
            Some(DragOutcome::Click(point))
        } else {
            Some(DragOutcome::Box {
                rect: ScreenRect::from_corners(origin, point),
                mode: SelectionMode::from_direction(origin, point),
            })
        }
    }

    /// Abort the gesture without an outcome
    pub fn cancel(&mut self) {
        *self = BoxDrag::Idle;
    }

    /// The rectangle being rubber-banded, for the host to draw
    pub fn rect(&self) -> Option<ScreenRect> {
        match *self {
            BoxDrag::Idle => None,
            BoxDrag::Dragging { origin, current, .. } => {
                Some(ScreenRect::from_corners(origin, current))
            }
        }
    }

    /// Mode of the in-progress drag, for the host to style the box
    pub fn mode(&self) -> Option<SelectionMode> {
        match *self {
            BoxDrag::Idle => None,
            BoxDrag::Dragging { mode, .. } => Some(mode),
        }
    }
}

/// The currently selected nodes and edges
#[derive(Debug, Clone, Default)]
pub struct SelectionState {
    nodes: HashSet<NodeId>,
    edges: HashSet<EdgeId>,
}

impl SelectionState {
    /// Empty selection
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether nothing is selected
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty() && self.edges.is_empty()
    }

    /// Whether a node is selected
    pub fn contains_node(&self, id: NodeId) -> bool {
        self.nodes.contains(&id)
    }

    /// Whether an edge is selected
    pub fn contains_edge(&self, id: EdgeId) -> bool {
        self.edges.contains(&id)
    }

    /// Selected nodes, unordered
    pub fn nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }

    /// Selected edges, unordered
    pub fn edges(&self) -> impl Iterator<Item = EdgeId> + '_ {
        self.edges.iter().copied()
    }

    /// Deselect everything
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.edges.clear();
    }

    /// Replace the selection with a single node
    pub fn select_node(&mut self, id: NodeId) {
        self.clear();
        self.nodes.insert(id);
    }

    /// Replace the node selection wholesale
    pub fn set_nodes(&mut self, ids: impl IntoIterator<Item = NodeId>) {
        self.nodes = ids.into_iter().collect();
    }

    /// Replace the selection with a single edge
    pub fn select_edge(&mut self, id: EdgeId) {
        self.clear();
        self.edges.insert(id);
    }

    /// Drop entities that no longer exist in the document
    pub fn retain(
        &mut self,
        node_exists: impl Fn(NodeId) -> bool,
        edge_exists: impl Fn(EdgeId) -> bool,
    ) {
        self.nodes.retain(|id| node_exists(*id));
        self.edges.retain(|id| edge_exists(*id));
    }

    /// Apply a finalized drag box.
    ///
    /// The node set is replaced by whatever the provider reports under the
    /// rectangle, in both modes. Previously selected edges persist; in
    /// crossing mode every edge in `candidate_edges` whose rendered segment
    /// touches the rectangle is merged in on top.
    pub fn resolve_box(
        &mut self,
        rect: &ScreenRect,
        mode: SelectionMode,
        provider: &dyn GeometryProvider,
        candidate_edges: impl IntoIterator<Item = EdgeId>,
    ) {
        self.nodes = provider.overlapping_nodes(rect).into_iter().collect();
        if mode == SelectionMode::Crossing {
            for edge_id in candidate_edges {
                let Some((a, b)) = provider.edge_endpoints(edge_id) else {
                    continue;
                };
                if segment_intersects_rect(a, b, rect) {
                    self.edges.insert(edge_id);
                }
            }
        }
        tracing::debug!(
            nodes = self.nodes.len(),
            edges = self.edges.len(),
            ?mode,
            "box selection resolved"
        );
    }

    /// Apply a click: inside the current selection bounds it is preserved,
    /// outside it clears. Returns whether the selection survived.
    pub fn resolve_click(&mut self, point: ScreenPoint, provider: &dyn GeometryProvider) -> bool {
        if self.point_in_bounds(point, provider) {
            true
        } else {
            self.clear();
            false
        }
    }

    /// Screen-space bounding box of everything selected, recomputed from
    /// the provider. `None` when the selection is empty or nothing it
    /// holds is laid out.
    pub fn bounds(&self, provider: &dyn GeometryProvider) -> Option<ScreenRect> {
        let mut acc: Option<ScreenRect> = None;
        let mut grow = |rect: ScreenRect| {
            acc = Some(match acc {
                None => rect,
                Some(prev) => ScreenRect {
                    min: ScreenPoint::new(prev.min.x.min(rect.min.x), prev.min.y.min(rect.min.y)),
                    max: ScreenPoint::new(prev.max.x.max(rect.max.x), prev.max.y.max(rect.max.y)),
                },
            });
        };
        for id in &self.nodes {
            if let Some(rect) = provider.node_bounds(*id) {
                grow(rect);
            }
        }
        for id in &self.edges {
            if let Some((a, b)) = provider.edge_endpoints(*id) {
                grow(ScreenRect::from_corners(a, b));
            }
        }
        acc
    }

    /// Whether a point lands inside the current selection's bounding box.
    /// Decides between a group context menu and clearing the selection.
    pub fn point_in_bounds(&self, point: ScreenPoint, provider: &dyn GeometryProvider) -> bool {
        self.bounds(provider)
            .is_some_and(|bounds| bounds.contains(point))
    }
}
