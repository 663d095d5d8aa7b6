// SPDX-License-Identifier: MIT OR Apache-2.0
//! The front controller tying input, selection, connections and the
//! document store together.

use crate::connection::{compatibility_map, ConnectionDrag, DragOrigin};
use crate::geometry::ScreenPoint;
use crate::input::{Key, PointerButton, PointerEvent, PointerEventKind, PointerTarget};
use crate::provider::GeometryProvider;
use crate::schedule::{FrameScheduler, TaskHandle};
use crate::selection::{BoxDrag, DragOutcome, SelectionState};
use crate::store::GraphStore;
use crate::viewport::ViewportState;
use std::collections::HashMap;
use wirescript_graph::{DefinitionCatalog, EdgeEndpoint, EdgeId, NodeId};

/// Where a secondary click landed relative to the selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextHit {
    /// Inside the selection bounds: open the group menu, keep selection
    Selection,
    /// Outside: the selection was cleared first
    Canvas,
}

/// Everything the deferred frame tasks operate on
#[derive(Debug, Default)]
pub struct EditorCore {
    /// The document and its history
    pub store: GraphStore,
    /// Selected nodes and edges
    pub selection: SelectionState,
    /// Box-selection gesture state
    pub box_drag: BoxDrag,
    /// Connection gesture state
    pub connection_drag: Option<ConnectionDrag>,
    /// Canvas pan/zoom
    pub viewport: ViewportState,
}

impl EditorCore {
    fn apply_outcome(&mut self, outcome: DragOutcome, provider: &dyn GeometryProvider) {
        match outcome {
            DragOutcome::Click(point) => {
                if !self.selection.resolve_click(point, provider) {
                    self.store.set_selected_node(None);
                }
            }
            DragOutcome::Box { rect, mode } => {
                let edge_ids: Vec<EdgeId> = self.store.edges().map(|edge| edge.id).collect();
                self.selection.resolve_box(&rect, mode, provider, edge_ids);
                self.sync_primary_selection();
            }
        }
    }

    /// The store's primary selected node mirrors a single-node selection
    /// and clears otherwise
    fn sync_primary_selection(&mut self) {
        let mut nodes = self.selection.nodes();
        let primary = match (nodes.next(), nodes.next()) {
            (Some(only), None) => Some(only),
            _ => None,
        };
        self.store.set_selected_node(primary);
    }

    /// Drop selected entities the document no longer contains
    fn prune_selection(&mut self) {
        let store = &self.store;
        self.selection.retain(
            |node_id| store.node(node_id).is_some(),
            |edge_id| store.edge(edge_id).is_some(),
        );
    }
}

/// The editing engine a host embeds: feed it pointer and key events, call
/// [`GraphEditor::run_frame`] once per frame after layout.
#[derive(Debug)]
pub struct GraphEditor {
    core: EditorCore,
    catalog: DefinitionCatalog,
    scheduler: FrameScheduler<EditorCore, dyn GeometryProvider>,
    pending_resolve: Option<TaskHandle>,
}

impl GraphEditor {
    /// Create an editor over an empty document, validating connections
    /// against the given catalog
    pub fn new(catalog: DefinitionCatalog) -> Self {
        Self {
            core: EditorCore::default(),
            catalog,
            scheduler: FrameScheduler::new(),
            pending_resolve: None,
        }
    }

    /// The document store
    pub fn store(&self) -> &GraphStore {
        &self.core.store
    }

    /// The document store, for direct edit operations
    pub fn store_mut(&mut self) -> &mut GraphStore {
        &mut self.core.store
    }

    /// Current selection
    pub fn selection(&self) -> &SelectionState {
        &self.core.selection
    }

    /// Node definitions used to validate connections
    pub fn catalog(&self) -> &DefinitionCatalog {
        &self.catalog
    }

    /// Box-drag gesture state, for the host to draw the rubber band
    pub fn box_drag(&self) -> &BoxDrag {
        &self.core.box_drag
    }

    /// In-progress connection drag, if any
    pub fn connection_drag(&self) -> Option<&ConnectionDrag> {
        self.core.connection_drag.as_ref()
    }

    /// Canvas viewport
    pub fn viewport(&self) -> &ViewportState {
        &self.core.viewport
    }

    /// Canvas viewport, mutable
    pub fn viewport_mut(&mut self) -> &mut ViewportState {
        &mut self.core.viewport
    }

    /// Route one pointer event
    pub fn handle_pointer(&mut self, event: PointerEvent) {
        match event.kind {
            PointerEventKind::Down => self.pointer_down(event),
            PointerEventKind::Move => self.pointer_move(event),
            PointerEventKind::Up => self.pointer_up(event),
        }
    }

    fn pointer_down(&mut self, event: PointerEvent) {
        if event.button != PointerButton::Primary {
            return;
        }
        match event.target {
            PointerTarget::Canvas => {
                // A fresh gesture invalidates any selection resolution
                // still waiting on a frame tick
                if let Some(handle) = self.pending_resolve.take() {
                    self.scheduler.cancel(handle);
                }
                self.core.box_drag.begin(event.position);
            }
            PointerTarget::Node(id) => {
                if !self.core.selection.contains_node(id) {
                    self.core.selection.select_node(id);
                }
                self.core.store.set_selected_node(Some(id));
            }
            PointerTarget::Edge(id) => {
                self.core.selection.select_edge(id);
                self.core.store.set_selected_node(None);
            }
        }
    }

    fn pointer_move(&mut self, event: PointerEvent) {
        if let Some(drag) = self.core.connection_drag.as_mut() {
            drag.current = event.position;
        }
        if event.primary_held {
            self.core.box_drag.update(event.position);
        }
    }

    fn pointer_up(&mut self, event: PointerEvent) {
        if event.button != PointerButton::Primary {
            return;
        }
        let Some(outcome) = self.core.box_drag.release(event.position) else {
            return;
        };
        // Resolution waits a frame so the provider reports settled bounds
        if let Some(handle) = self.pending_resolve.take() {
            self.scheduler.cancel(handle);
        }
        let handle = self
            .scheduler
            .schedule(move |core: &mut EditorCore, provider: &(dyn GeometryProvider + 'static)| {
                core.apply_outcome(outcome, provider);
            });
        self.pending_resolve = Some(handle);
    }

    /// Route one key press
    pub fn handle_key(&mut self, key: Key) {
        match key {
            Key::Delete | Key::Backspace => self.delete_selection(),
            Key::Duplicate => self.duplicate_selection(),
            Key::Undo => {
                self.core.store.undo();
                self.core.prune_selection();
            }
            Key::Redo => {
                self.core.store.redo();
                self.core.prune_selection();
            }
            Key::Escape => {
                self.core.box_drag.cancel();
                self.core.connection_drag = None;
                if let Some(handle) = self.pending_resolve.take() {
                    self.scheduler.cancel(handle);
                }
            }
        }
    }

    /// Decide what a secondary click means: inside the selection bounds
    /// the selection survives and the caller opens a group menu; outside
    /// it is cleared first.
    pub fn context_click(
        &mut self,
        point: ScreenPoint,
        provider: &dyn GeometryProvider,
    ) -> ContextHit {
        if self.core.selection.point_in_bounds(point, provider) {
            ContextHit::Selection
        } else {
            self.core.selection.clear();
            self.core.store.set_selected_node(None);
            ContextHit::Canvas
        }
    }

    /// Delete every selected node and edge as one undoable unit. Node
    /// removal cascades incident edges; explicitly selected edges that
    /// survive the cascade are removed under the same snapshot.
    pub fn delete_selection(&mut self) {
        let nodes: Vec<NodeId> = self.core.selection.nodes().collect();
        let edges: Vec<EdgeId> = self.core.selection.edges().collect();
        if nodes.is_empty() && edges.is_empty() {
            return;
        }
        let nodes: Vec<NodeId> = nodes
            .into_iter()
            .filter(|id| self.core.store.node(*id).is_some())
            .collect();
        let had_nodes = !nodes.is_empty();
        self.core.store.remove_nodes(&nodes, true);
        let leftover: Vec<EdgeId> = edges
            .into_iter()
            .filter(|id| self.core.store.edge(*id).is_some())
            .collect();
        self.core.store.remove_edges(&leftover, !had_nodes);
        self.core.selection.clear();
    }

    /// Duplicate the selected nodes; the clones become the selection on
    /// the next frame tick, after the host has laid them out
    pub fn duplicate_selection(&mut self) {
        let ids: Vec<NodeId> = self.core.selection.nodes().collect();
        let created = self.core.store.duplicate_nodes(&ids);
        if created.is_empty() {
            return;
        }
        self.scheduler
            .schedule(move |core: &mut EditorCore, _: &(dyn GeometryProvider + 'static)| {
                core.selection.set_nodes(created.iter().copied());
                core.sync_primary_selection();
            });
    }

    /// Start dragging a connection out of a port
    pub fn begin_connection(
        &mut self,
        node_id: NodeId,
        port_id: impl Into<String>,
        origin: DragOrigin,
        at: ScreenPoint,
    ) {
        self.core.connection_drag = Some(ConnectionDrag::begin(node_id, port_id, origin, at));
    }

    /// Per-port legality against the in-progress drag, for dimming
    /// incompatible ports. Empty when no drag is active.
    pub fn connection_compatibility(&self) -> HashMap<(NodeId, String), bool> {
        match &self.core.connection_drag {
            Some(drag) => compatibility_map(&self.catalog, self.core.store.nodes(), drag),
            None => HashMap::new(),
        }
    }

    /// Drop the dragged connection onto a port. Ends the drag either way;
    /// returns whether an edge was created.
    pub fn complete_connection(&mut self, node_id: NodeId, port_id: impl Into<String>) -> bool {
        let Some(drag) = self.core.connection_drag.take() else {
            return false;
        };
        let dropped = EdgeEndpoint::new(node_id, port_id);
        let (source, target) = match drag.origin {
            DragOrigin::Source => (drag.endpoint(), dropped),
            DragOrigin::Target => (dropped, drag.endpoint()),
        };
        self.core.store.connect(&self.catalog, source, target)
    }

    /// Abort the connection drag without creating anything
    pub fn cancel_connection(&mut self) {
        self.core.connection_drag = None;
    }

    /// Run deferred work for this frame. The host calls this once per
    /// frame after layout has settled.
    pub fn run_frame(&mut self, provider: &(dyn GeometryProvider + 'static)) {
        self.scheduler.run_frame(&mut self.core, provider);
        if self.scheduler.pending() == 0 {
            self.pending_resolve = None;
        }
    }
}
