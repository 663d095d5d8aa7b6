// SPDX-License-Identifier: MIT OR Apache-2.0
//! The graph document store: single source of truth for the document.
//!
//! All structural mutation passes through here so that every mutation can
//! be captured for undo/redo. Every operation is total: referencing a
//! nonexistent node/edge/comment id is a silent no-op, never a panic or an
//! error, because the store must stay safe to call from UI callbacks that
//! may race with concurrent deletions.

use crate::history::{History, Snapshot};
use indexmap::IndexMap;
use std::collections::HashSet;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;
use wirescript_graph::{
    can_connect, Comment, CommentAnchor, CommentId, DefinitionCatalog, DocumentMetadata, Edge,
    EdgeEndpoint, EdgeId, GraphDocument, GraphNode, NodeId, PortKind, Position,
    MIN_SCHEMA_VERSION, SCHEMA_VERSION,
};

/// Offset applied to duplicated nodes, in canvas units
pub const DUPLICATE_OFFSET: f32 = 32.0;

const DEFAULT_NAME: &str = "Untitled Graph";

/// Options for [`GraphStore::import_document`]
#[derive(Debug, Clone, Default)]
pub struct ImportOptions {
    /// Explicit project id, overriding the document's metadata
    pub project_id: Option<String>,
    /// Whether the import is undoable (`true` by default)
    pub record_history: Option<bool>,
}

impl ImportOptions {
    fn record_history(&self) -> bool {
        self.record_history.unwrap_or(true)
    }
}

/// Owns the document: nodes, edges, comments, selection and history.
#[derive(Debug)]
pub struct GraphStore {
    name: String,
    nodes: IndexMap<NodeId, GraphNode>,
    edges: IndexMap<EdgeId, Edge>,
    comments: IndexMap<CommentId, Comment>,
    selected_node: Option<NodeId>,
    project_id: String,
    metadata_extra: serde_json::Map<String, serde_json::Value>,
    history: History,
}

impl Default for GraphStore {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphStore {
    /// Create an empty store with a fresh project id
    pub fn new() -> Self {
        Self {
            name: DEFAULT_NAME.to_string(),
            nodes: IndexMap::new(),
            edges: IndexMap::new(),
            comments: IndexMap::new(),
            selected_node: None,
            project_id: Uuid::new_v4().to_string(),
            metadata_extra: serde_json::Map::new(),
            history: History::new(),
        }
    }

    fn snapshot(&self) -> Snapshot {
        Snapshot {
            name: self.name.clone(),
            nodes: self.nodes.clone(),
            edges: self.edges.clone(),
            comments: self.comments.clone(),
            project_id: self.project_id.clone(),
            selected_node: self.selected_node,
        }
    }

    /// Push the pre-mutation state onto the past stack.
    ///
    /// Called at the start of every recorded operation, before any field
    /// changes, so a whole batch collapses into one undo unit.
    fn capture(&mut self) {
        let snapshot = self.snapshot();
        self.history.record(snapshot);
    }

    fn apply(&mut self, snapshot: Snapshot) {
        self.name = snapshot.name;
        self.nodes = snapshot.nodes;
        self.edges = snapshot.edges;
        self.comments = snapshot.comments;
        self.project_id = snapshot.project_id;
        self.selected_node = snapshot.selected_node;
    }

    // --- accessors -------------------------------------------------------

    /// Document name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Stable document identity
    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    /// Primary selected node
    pub fn selected_node(&self) -> Option<NodeId> {
        self.selected_node
    }

    /// Node by id
    pub fn node(&self, id: NodeId) -> Option<&GraphNode> {
        self.nodes.get(&id)
    }

    /// Edge by id
    pub fn edge(&self, id: EdgeId) -> Option<&Edge> {
        self.edges.get(&id)
    }

    /// Comment by id
    pub fn comment(&self, id: CommentId) -> Option<&Comment> {
        self.comments.get(&id)
    }

    /// All nodes in document order
    pub fn nodes(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.values()
    }

    /// All edges in document order
    pub fn edges(&self) -> impl Iterator<Item = &Edge> {
        self.edges.values()
    }

    /// All comments in document order
    pub fn comments(&self) -> impl Iterator<Item = &Comment> {
        self.comments.values()
    }

    /// Number of nodes
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Number of edges
    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Whether an undo step is available
    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    /// Whether a redo step is available
    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    #[cfg(test)]
    pub(crate) fn history(&self) -> &History {
        &self.history
    }

    // --- node operations -------------------------------------------------

    /// Rename the document
    pub fn set_name(&mut self, name: impl Into<String>) {
        self.capture();
        self.name = name.into();
    }

    /// Append a node and select it. Returns its id.
    pub fn add_node(&mut self, node: GraphNode) -> NodeId {
        self.capture();
        let id = node.id;
        self.nodes.insert(id, node);
        self.selected_node = Some(id);
        id
    }

    /// Duplicate a single node. Returns the clone's id, or `None` when the
    /// node does not exist.
    pub fn duplicate_node(&mut self, id: NodeId) -> Option<NodeId> {
        self.duplicate_nodes(&[id]).into_iter().next()
    }

    /// Duplicate a set of nodes as one undo unit.
    ///
    /// Clones are offset by (+32, +32). An edge is cloned only when *both*
    /// of its endpoints are inside the input set, remapped onto the clones;
    /// edges with one endpoint outside the set are left alone. Returns the
    /// new node ids, empty when the input matched no existing nodes.
    pub fn duplicate_nodes(&mut self, ids: &[NodeId]) -> Vec<NodeId> {
        let unique: Vec<NodeId> = {
            let mut seen = HashSet::new();
            ids.iter()
                .copied()
                .filter(|id| self.nodes.contains_key(id) && seen.insert(*id))
                .collect()
        };
        if unique.is_empty() {
            return Vec::new();
        }

        self.capture();

        let selected: HashSet<NodeId> = unique.iter().copied().collect();
        let mut id_map: IndexMap<NodeId, NodeId> = IndexMap::new();
        for old_id in &unique {
            id_map.insert(*old_id, NodeId::new());
        }

        for old_id in &unique {
            let Some(original) = self.nodes.get(old_id) else {
                continue;
            };
            let mut clone = original.clone();
            clone.id = id_map[old_id];
            clone.position = clone.position.offset(DUPLICATE_OFFSET, DUPLICATE_OFFSET);
            self.nodes.insert(clone.id, clone);
        }

        let cloned_edges: Vec<Edge> = self
            .edges
            .values()
            .filter(|edge| {
                selected.contains(&edge.source.node_id) && selected.contains(&edge.target.node_id)
            })
            .map(|edge| {
                let mut clone = edge.clone();
                clone.id = EdgeId::new();
                clone.source.node_id = id_map[&edge.source.node_id];
                clone.target.node_id = id_map[&edge.target.node_id];
                clone
            })
            .collect();
        for edge in cloned_edges {
            self.edges.insert(edge.id, edge);
        }

        let created: Vec<NodeId> = id_map.values().copied().collect();
        if created.len() == 1 {
            self.selected_node = Some(created[0]);
        }
        created
    }

    /// Apply a transform to one node.
    ///
    /// Pass `record_history = false` for continuous drag updates while the
    /// pointer button stays down, so an entire drag collapses into the one
    /// snapshot captured at drag start.
    pub fn update_node(
        &mut self,
        id: NodeId,
        updater: impl FnOnce(&mut GraphNode),
        record_history: bool,
    ) {
        if !self.nodes.contains_key(&id) {
            tracing::debug!(?id, "update_node: unknown node");
            return;
        }
        if record_history {
            self.capture();
        }
        if let Some(node) = self.nodes.get_mut(&id) {
            updater(node);
            node.normalize_data();
        }
    }

    /// Remove one node and everything touching it
    pub fn remove_node(&mut self, id: NodeId) {
        self.remove_nodes(&[id], true);
    }

    /// Remove a batch of nodes atomically: the nodes themselves, every
    /// incident edge, and every comment anchored to one of them. One
    /// snapshot regardless of how much gets cascaded.
    pub fn remove_nodes(&mut self, ids: &[NodeId], record_history: bool) {
        let doomed: HashSet<NodeId> = ids
            .iter()
            .copied()
            .filter(|id| self.nodes.contains_key(id))
            .collect();
        if doomed.is_empty() {
            return;
        }
        if record_history {
            self.capture();
        }
        self.nodes.retain(|id, _| !doomed.contains(id));
        self.edges.retain(|_, edge| {
            !doomed.contains(&edge.source.node_id) && !doomed.contains(&edge.target.node_id)
        });
        self.comments
            .retain(|_, comment| match comment.node_id() {
                Some(node_id) => !doomed.contains(&node_id),
                None => true,
            });
        if self
            .selected_node
            .is_some_and(|selected| doomed.contains(&selected))
        {
            self.selected_node = None;
        }
    }

    // --- port overrides --------------------------------------------------

    /// Write a literal value for a data-in port
    pub fn set_port_override(
        &mut self,
        node_id: NodeId,
        port_id: &str,
        value: serde_json::Value,
    ) {
        if !self.nodes.contains_key(&node_id) {
            tracing::debug!(?node_id, port_id, "set_port_override: unknown node");
            return;
        }
        self.capture();
        self.write_override(node_id, port_id, value);
    }

    fn write_override(&mut self, node_id: NodeId, port_id: &str, value: serde_json::Value) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            node.data
                .get_or_insert_with(Default::default)
                .overrides
                .insert(port_id.to_string(), value);
        }
    }

    /// Remove a port's literal value; the node's `data` collapses back to
    /// `None` when nothing else remains in it.
    pub fn clear_port_override(&mut self, node_id: NodeId, port_id: &str) {
        let has_override = self
            .nodes
            .get(&node_id)
            .and_then(|node| node.data.as_ref())
            .is_some_and(|data| data.overrides.contains_key(port_id));
        if !has_override {
            return;
        }
        self.capture();
        self.clear_override_quiet(node_id, port_id);
    }

    fn clear_override_quiet(&mut self, node_id: NodeId, port_id: &str) {
        if let Some(node) = self.nodes.get_mut(&node_id) {
            if let Some(data) = node.data.as_mut() {
                data.overrides.shift_remove(port_id);
            }
            node.normalize_data();
        }
    }

    // --- edge operations -------------------------------------------------

    /// Insert an edge. When `replace` is set, any existing edge with the
    /// identical endpoint tuple is removed first.
    pub fn upsert_edge(&mut self, edge: Edge, replace: bool) -> EdgeId {
        self.capture();
        if replace {
            self.edges.retain(|_, existing| !existing.same_endpoints(&edge));
        }
        let id = edge.id;
        self.edges.insert(id, edge);
        id
    }

    /// Remove one edge
    pub fn remove_edge(&mut self, id: EdgeId, record_history: bool) {
        self.remove_edges(&[id], record_history);
    }

    /// Remove a batch of edges. `record_history = false` lets a cascade
    /// triggered by node deletion avoid a duplicate snapshot.
    pub fn remove_edges(&mut self, ids: &[EdgeId], record_history: bool) {
        let doomed: HashSet<EdgeId> = ids
            .iter()
            .copied()
            .filter(|id| self.edges.contains_key(id))
            .collect();
        if doomed.is_empty() {
            return;
        }
        if record_history {
            self.capture();
        }
        self.edges.retain(|id, _| !doomed.contains(id));
    }

    /// Commit a dragged connection.
    ///
    /// The oracle decides legality; an illegal attempt is silently dropped
    /// ("no edge created", not an error). When the target is a data-in
    /// port that does not allow multiple incoming connections, every
    /// pre-existing edge at that exact port is removed and any literal
    /// override on it cleared before the new edge is inserted, all under
    /// one snapshot. Returns whether an edge was created.
    pub fn connect(
        &mut self,
        catalog: &DefinitionCatalog,
        source: EdgeEndpoint,
        target: EdgeEndpoint,
    ) -> bool {
        let Some(source_node) = self.nodes.get(&source.node_id) else {
            tracing::debug!(node = ?source.node_id, "connect: unknown source node");
            return false;
        };
        let Some(target_node) = self.nodes.get(&target.node_id) else {
            tracing::debug!(node = ?target.node_id, "connect: unknown target node");
            return false;
        };
        let Some(source_port) = catalog.port(&source_node.node_type, &source.port_id) else {
            tracing::debug!(port = %source.port_id, "connect: unknown source port");
            return false;
        };
        let Some(target_port) = catalog.port(&target_node.node_type, &target.port_id) else {
            tracing::debug!(port = %target.port_id, "connect: unknown target port");
            return false;
        };
        if !can_connect(source_port, target_port) {
            tracing::debug!(
                source = %source.port_id,
                target = %target.port_id,
                "connect: incompatible ports"
            );
            return false;
        }

        let target_is_data_in = target_port.kind == PortKind::DataIn;
        let single_connection = target_is_data_in && !target_port.allow_multiple_connections;

        self.capture();

        if single_connection {
            let displaced: Vec<EdgeId> = self
                .edges
                .values()
                .filter(|edge| edge.terminates_at(target.node_id, &target.port_id))
                .map(|edge| edge.id)
                .collect();
            self.edges.retain(|id, _| !displaced.contains(id));
        }
        if target_is_data_in {
            // A port cannot hold a literal override and a live connection
            // as its value source at the same time.
            self.clear_override_quiet(target.node_id, &target.port_id);
        }

        let edge = Edge::new(source, target);
        self.edges
            .retain(|_, existing| !existing.same_endpoints(&edge));
        self.edges.insert(edge.id, edge);
        true
    }

    // --- comments --------------------------------------------------------

    /// Attach a comment to a node. Idempotent per node: when the node
    /// already carries a comment its id is returned and the comment is
    /// merely re-selected by the caller.
    pub fn add_comment(&mut self, node_id: NodeId) -> CommentId {
        if let Some(existing) = self
            .comments
            .values()
            .find(|comment| comment.node_id() == Some(node_id))
        {
            return existing.id;
        }
        self.capture();
        let comment = Comment::on_node(node_id);
        let id = comment.id;
        self.comments.insert(id, comment);
        id
    }

    /// Add a comment floating at a canvas position
    pub fn add_floating_comment(&mut self, position: Position) -> CommentId {
        self.capture();
        let comment = Comment::floating(position);
        let id = comment.id;
        self.comments.insert(id, comment);
        id
    }

    /// Replace a comment's text. Typing is continuous, so this never
    /// snapshots.
    pub fn update_comment_text(&mut self, id: CommentId, text: impl Into<String>) {
        let text = text.into();
        if let Some(comment) = self.comments.get_mut(&id) {
            if comment.text != text {
                comment.text = text;
            }
        }
    }

    /// Pin or unpin a comment (undoable)
    pub fn set_comment_pinned(&mut self, id: CommentId, pinned: bool) {
        let changed = self
            .comments
            .get(&id)
            .is_some_and(|comment| comment.pinned != pinned);
        if !changed {
            return;
        }
        self.capture();
        if let Some(comment) = self.comments.get_mut(&id) {
            comment.pinned = pinned;
        }
    }

    /// Collapse or expand a comment bubble (not undoable)
    pub fn set_comment_collapsed(&mut self, id: CommentId, collapsed: bool) {
        if let Some(comment) = self.comments.get_mut(&id) {
            comment.collapsed = collapsed;
        }
    }

    /// Move a floating comment (not undoable; drags are continuous).
    /// No-op for node-anchored comments, which follow their node.
    pub fn set_comment_position(&mut self, id: CommentId, position: Position) {
        if let Some(comment) = self.comments.get_mut(&id) {
            if matches!(comment.anchor, CommentAnchor::Floating(_)) {
                comment.anchor = CommentAnchor::Floating(position);
            }
        }
    }

    /// Delete a comment
    pub fn remove_comment(&mut self, id: CommentId) {
        if !self.comments.contains_key(&id) {
            return;
        }
        self.capture();
        self.comments.shift_remove(&id);
    }

    /// Collapse every unpinned node-anchored comment except the one on the
    /// active node
    pub fn collapse_unpinned_comments(&mut self, active_node: Option<NodeId>) {
        for comment in self.comments.values_mut() {
            let Some(node_id) = comment.node_id() else {
                continue;
            };
            if comment.pinned || Some(node_id) == active_node {
                continue;
            }
            comment.collapsed = true;
        }
    }

    // --- selection -------------------------------------------------------

    /// Set or clear the primary selected node. Selection-only changes never
    /// produce a history snapshot.
    pub fn set_selected_node(&mut self, node_id: Option<NodeId>) {
        self.selected_node = node_id;
    }

    // --- document import/export -----------------------------------------

    /// Replace the entire document state with an already-parsed document.
    ///
    /// A document declaring a schema version outside the supported range
    /// is dropped without touching state; `GraphDocument::from_json` gates
    /// too, but hosts can construct documents directly. The project id
    /// comes from the explicit option, else the document's metadata, else
    /// a fresh one. Selection is cleared.
    pub fn import_document(&mut self, doc: GraphDocument, options: ImportOptions) {
        if doc.schema_version < MIN_SCHEMA_VERSION || doc.schema_version > SCHEMA_VERSION {
            tracing::debug!(
                version = doc.schema_version,
                "import_document: unsupported schema version"
            );
            return;
        }
        if options.record_history() {
            self.capture();
        }
        let project_id = options
            .project_id
            .or(doc.metadata.project_id)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        self.name = doc.name;
        self.nodes = doc.nodes.into_iter().map(|node| (node.id, node)).collect();
        self.edges = doc.edges.into_iter().map(|edge| (edge.id, edge)).collect();
        self.comments = doc
            .comments
            .into_iter()
            .map(|comment| (comment.id, comment))
            .collect();
        self.metadata_extra = doc.metadata.extra;
        self.project_id = project_id;
        self.selected_node = None;
        tracing::info!(project_id = %self.project_id, nodes = self.nodes.len(), "imported graph");
    }

    /// Export a deep-copied, timestamped document.
    ///
    /// `metadata.projectId` always mirrors the store's current project id,
    /// authoritative over any stale value the metadata held before; unknown
    /// metadata keys ride through verbatim.
    pub fn export_document(&self) -> GraphDocument {
        GraphDocument {
            schema_version: SCHEMA_VERSION,
            name: self.name.clone(),
            nodes: self.nodes.values().cloned().collect(),
            edges: self.edges.values().cloned().collect(),
            comments: self.comments.values().cloned().collect(),
            metadata: DocumentMetadata {
                project_id: Some(self.project_id.clone()),
                extra: self.metadata_extra.clone(),
            },
            updated_at: Some(unix_now()),
        }
    }

    /// Snapshot, then return to a fresh default state with a new (or
    /// supplied) project id
    pub fn reset(&mut self, project_id: Option<String>) {
        self.capture();
        self.name = DEFAULT_NAME.to_string();
        self.nodes.clear();
        self.edges.clear();
        self.comments.clear();
        self.metadata_extra.clear();
        self.selected_node = None;
        self.project_id = project_id.unwrap_or_else(|| Uuid::new_v4().to_string());
    }

    // --- history ---------------------------------------------------------

    /// Step back one recorded edit. No-op when the past stack is empty.
    pub fn undo(&mut self) {
        let current = self.snapshot();
        if let Some(previous) = self.history.undo(current) {
            self.apply(previous);
        }
    }

    /// Step forward one undone edit. No-op when the future stack is empty.
    pub fn redo(&mut self) {
        let current = self.snapshot();
        if let Some(next) = self.history.redo(current) {
            self.apply(next);
        }
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

#[cfg(test)]
mod tests {
    use super::*;
    use wirescript_graph::{NodeDefinition, PortDescriptor, ValueType};

    fn node_at(x: f32, y: f32) -> GraphNode {
        GraphNode::new("math/add", Position::new(x, y))
    }

    fn catalog() -> DefinitionCatalog {
        let mut catalog = DefinitionCatalog::new();
        catalog.register(NodeDefinition {
            id: "math/add".to_string(),
            display_name: "Add".to_string(),
            category: "math".to_string(),
            ports: vec![
                PortDescriptor::data("a", "A", PortKind::DataIn, ValueType::Float),
                PortDescriptor::data("b", "B", PortKind::DataIn, ValueType::Float),
                PortDescriptor::data("sum", "Sum", PortKind::DataOut, ValueType::Float),
                PortDescriptor::data("inputs", "Inputs", PortKind::DataIn, ValueType::Float)
                    .multi(),
            ],
        });
        catalog
    }

    #[test]
    fn test_add_node_selects_and_snapshots() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        assert_eq!(store.selected_node(), Some(id));
        assert!(store.can_undo());

        store.undo();
        assert_eq!(store.node_count(), 0);
        assert_eq!(store.selected_node(), None);
    }

    #[test]
    fn test_history_bound() {
        let mut store = GraphStore::new();
        for i in 0..60 {
            store.add_node(node_at(i as f32, 0.0));
        }
        assert_eq!(store.history().past_depth(), crate::history::HISTORY_LIMIT);

        for _ in 0..60 {
            store.undo();
        }
        // The oldest ten snapshots were evicted: undoing bottoms out at the
        // state just before the 11th edit, which still holds ten nodes.
        assert_eq!(store.node_count(), 10);
        assert!(!store.can_undo());
    }

    #[test]
    fn test_new_edit_clears_future() {
        let mut store = GraphStore::new();
        store.add_node(node_at(0.0, 0.0));
        store.add_node(node_at(1.0, 0.0));
        store.undo();
        assert!(store.can_redo());

        store.add_node(node_at(2.0, 0.0));
        assert!(!store.can_redo());
        let count = store.node_count();
        store.redo();
        assert_eq!(store.node_count(), count);
    }

    #[test]
    fn test_duplicate_boundary_rule() {
        let mut store = GraphStore::new();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(100.0, 0.0));
        let c = store.add_node(node_at(200.0, 0.0));
        let d = store.add_node(node_at(300.0, 0.0));
        store.upsert_edge(
            Edge::new(EdgeEndpoint::new(a, "sum"), EdgeEndpoint::new(b, "a")),
            true,
        );
        store.upsert_edge(
            Edge::new(EdgeEndpoint::new(b, "sum"), EdgeEndpoint::new(c, "a")),
            true,
        );
        store.upsert_edge(
            Edge::new(EdgeEndpoint::new(c, "sum"), EdgeEndpoint::new(d, "a")),
            true,
        );

        let edges_before = store.edge_count();
        let created = store.duplicate_nodes(&[a, b]);
        assert_eq!(created.len(), 2);
        // Exactly one edge cloned: a'->b'. Nothing touches c or d.
        assert_eq!(store.edge_count(), edges_before + 1);

        let created_set: HashSet<NodeId> = created.iter().copied().collect();
        let cloned_edge = store
            .edges()
            .find(|edge| created_set.contains(&edge.source.node_id))
            .unwrap();
        assert!(created_set.contains(&cloned_edge.target.node_id));

        // Clones sit at the fixed offset
        let a_pos = store.node(a).unwrap().position;
        let clone_pos = store.node(created[0]).unwrap().position;
        assert_eq!(clone_pos.x, a_pos.x + DUPLICATE_OFFSET);
        assert_eq!(clone_pos.y, a_pos.y + DUPLICATE_OFFSET);
    }

    #[test]
    fn test_duplicate_unknown_ids_is_empty_and_silent() {
        let mut store = GraphStore::new();
        let depth = store.history().past_depth();
        assert!(store.duplicate_nodes(&[NodeId::new()]).is_empty());
        assert_eq!(store.history().past_depth(), depth);
    }

    #[test]
    fn test_remove_nodes_cascades_in_one_snapshot() {
        let mut store = GraphStore::new();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(100.0, 0.0));
        store.upsert_edge(
            Edge::new(EdgeEndpoint::new(a, "sum"), EdgeEndpoint::new(b, "a")),
            true,
        );
        store.add_comment(a);
        store.set_selected_node(Some(a));

        let depth = store.history().past_depth();
        store.remove_nodes(&[a], true);
        assert_eq!(store.history().past_depth(), depth + 1);
        assert_eq!(store.node_count(), 1);
        assert_eq!(store.edge_count(), 0);
        assert_eq!(store.comments().count(), 0);
        assert_eq!(store.selected_node(), None);

        // One undo restores the node, the edge, and the comment together
        store.undo();
        assert_eq!(store.node_count(), 2);
        assert_eq!(store.edge_count(), 1);
        assert_eq!(store.comments().count(), 1);
    }

    #[test]
    fn test_drag_coalescing() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        let depth = store.history().past_depth();

        // Drag start records once, intermediate moves do not
        store.update_node(id, |n| n.position = Position::new(1.0, 1.0), true);
        store.update_node(id, |n| n.position = Position::new(5.0, 5.0), false);
        store.update_node(id, |n| n.position = Position::new(9.0, 9.0), false);
        assert_eq!(store.history().past_depth(), depth + 1);

        store.undo();
        assert_eq!(store.node(id).unwrap().position, Position::new(0.0, 0.0));
    }

    #[test]
    fn test_override_clear_normalizes_data() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        store.set_port_override(id, "a", serde_json::json!(1.5));
        assert!(store.node(id).unwrap().data.is_some());

        store.clear_port_override(id, "a");
        assert!(store.node(id).unwrap().data.is_none());

        // Clearing a missing override is a silent no-op without a snapshot
        let depth = store.history().past_depth();
        store.clear_port_override(id, "a");
        assert_eq!(store.history().past_depth(), depth);
    }

    #[test]
    fn test_connect_rejects_incompatible() {
        let mut store = GraphStore::new();
        let catalog = catalog();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(100.0, 0.0));

        // data-in -> data-in is illegal; silently dropped
        assert!(!store.connect(
            &catalog,
            EdgeEndpoint::new(a, "a"),
            EdgeEndpoint::new(b, "a"),
        ));
        assert_eq!(store.edge_count(), 0);
    }

    #[test]
    fn test_single_connection_enforcement() {
        let mut store = GraphStore::new();
        let catalog = catalog();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(100.0, 0.0));
        let c = store.add_node(node_at(0.0, 100.0));

        store.set_port_override(c, "a", serde_json::json!(2.0));
        assert!(store.connect(
            &catalog,
            EdgeEndpoint::new(a, "sum"),
            EdgeEndpoint::new(c, "a"),
        ));
        // Connecting cleared the override on the now-driven port
        assert!(store.node(c).unwrap().data.is_none());
        assert_eq!(store.edge_count(), 1);

        let depth = store.history().past_depth();
        assert!(store.connect(
            &catalog,
            EdgeEndpoint::new(b, "sum"),
            EdgeEndpoint::new(c, "a"),
        ));
        // E1 displaced, exactly one edge terminates at the port, and the
        // whole displacement + insertion was one history unit
        assert_eq!(store.edge_count(), 1);
        let edge = store.edges().next().unwrap();
        assert_eq!(edge.source.node_id, b);
        assert_eq!(store.history().past_depth(), depth + 1);

        store.undo();
        let edge = store.edges().next().unwrap();
        assert_eq!(edge.source.node_id, a);
    }

    #[test]
    fn test_multi_connection_port_keeps_existing_edges() {
        let mut store = GraphStore::new();
        let catalog = catalog();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(100.0, 0.0));
        let c = store.add_node(node_at(0.0, 100.0));

        assert!(store.connect(
            &catalog,
            EdgeEndpoint::new(a, "sum"),
            EdgeEndpoint::new(c, "inputs"),
        ));
        assert!(store.connect(
            &catalog,
            EdgeEndpoint::new(b, "sum"),
            EdgeEndpoint::new(c, "inputs"),
        ));
        assert_eq!(store.edge_count(), 2);
    }

    #[test]
    fn test_upsert_replaces_duplicate_tuple() {
        let mut store = GraphStore::new();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(100.0, 0.0));
        let first = store.upsert_edge(
            Edge::new(EdgeEndpoint::new(a, "sum"), EdgeEndpoint::new(b, "a")),
            true,
        );
        let second = store.upsert_edge(
            Edge::new(EdgeEndpoint::new(a, "sum"), EdgeEndpoint::new(b, "a")),
            true,
        );
        assert_ne!(first, second);
        assert_eq!(store.edge_count(), 1);
        assert!(store.edge(second).is_some());
    }

    #[test]
    fn test_selection_never_snapshots() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        let depth = store.history().past_depth();
        store.set_selected_node(None);
        store.set_selected_node(Some(id));
        assert_eq!(store.history().past_depth(), depth);
    }

    #[test]
    fn test_import_project_id_priority() {
        let mut store = GraphStore::new();
        let mut doc = GraphDocument::empty("doc");
        doc.metadata.project_id = Some("from-doc".to_string());

        store.import_document(doc.clone(), ImportOptions::default());
        assert_eq!(store.project_id(), "from-doc");

        store.import_document(
            doc.clone(),
            ImportOptions {
                project_id: Some("explicit".to_string()),
                record_history: None,
            },
        );
        assert_eq!(store.project_id(), "explicit");

        doc.metadata.project_id = None;
        store.import_document(doc, ImportOptions::default());
        // Neither present: a fresh id is generated
        assert_ne!(store.project_id(), "explicit");
        assert!(!store.project_id().is_empty());
    }

    #[test]
    fn test_export_is_authoritative_over_stale_metadata() {
        let mut store = GraphStore::new();
        let mut doc = GraphDocument::empty("doc");
        doc.metadata.project_id = Some("stale".to_string());
        doc.metadata
            .extra
            .insert("custom".to_string(), serde_json::json!(42));

        store.import_document(
            doc,
            ImportOptions {
                project_id: Some("actual".to_string()),
                record_history: None,
            },
        );

        let exported = store.export_document();
        assert_eq!(exported.metadata.project_id.as_deref(), Some("actual"));
        assert_eq!(exported.metadata.extra["custom"], 42);
        assert!(exported.updated_at.is_some());
        assert_eq!(exported.schema_version, SCHEMA_VERSION);
    }

    #[test]
    fn test_import_rejects_unsupported_schema_version() {
        let mut store = GraphStore::new();
        let before = store.name().to_string();
        let depth = store.history().past_depth();

        // Parsing gates versions, but a host can build a document directly
        let mut doc = GraphDocument::empty("future");
        doc.schema_version = SCHEMA_VERSION + 1;
        store.import_document(doc, ImportOptions::default());
        assert_eq!(store.name(), before);
        assert_eq!(store.history().past_depth(), depth);

        // The oldest supported version still imports
        let mut doc = GraphDocument::empty("legacy");
        doc.schema_version = MIN_SCHEMA_VERSION;
        store.import_document(doc, ImportOptions::default());
        assert_eq!(store.name(), "legacy");
    }

    #[test]
    fn test_import_clears_selection_and_is_undoable() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        store.set_selected_node(Some(id));

        store.import_document(GraphDocument::empty("other"), ImportOptions::default());
        assert_eq!(store.selected_node(), None);
        assert_eq!(store.node_count(), 0);

        store.undo();
        assert_eq!(store.node_count(), 1);
    }

    #[test]
    fn test_comment_idempotent_per_node() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        let first = store.add_comment(id);
        let second = store.add_comment(id);
        assert_eq!(first, second);
        assert_eq!(store.comments().count(), 1);
    }

    #[test]
    fn test_collapse_unpinned_spares_pinned_and_active() {
        let mut store = GraphStore::new();
        let a = store.add_node(node_at(0.0, 0.0));
        let b = store.add_node(node_at(50.0, 0.0));
        let c = store.add_node(node_at(100.0, 0.0));
        let on_a = store.add_comment(a);
        let on_b = store.add_comment(b);
        let on_c = store.add_comment(c);
        store.set_comment_pinned(on_b, true);

        store.collapse_unpinned_comments(Some(a));
        assert!(!store.comment(on_a).unwrap().collapsed);
        assert!(!store.comment(on_b).unwrap().collapsed);
        assert!(store.comment(on_c).unwrap().collapsed);
    }

    #[test]
    fn test_comment_position_only_moves_floating() {
        let mut store = GraphStore::new();
        let id = store.add_node(node_at(0.0, 0.0));
        let anchored = store.add_comment(id);
        let floating = store.add_floating_comment(Position::new(5.0, 5.0));

        store.set_comment_position(anchored, Position::new(99.0, 99.0));
        store.set_comment_position(floating, Position::new(99.0, 99.0));

        assert_eq!(
            store.comment(anchored).unwrap().anchor,
            CommentAnchor::Node(id)
        );
        assert_eq!(
            store.comment(floating).unwrap().anchor,
            CommentAnchor::Floating(Position::new(99.0, 99.0))
        );
    }
}
