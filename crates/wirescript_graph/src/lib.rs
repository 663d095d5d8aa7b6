// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph data model for the WireScript editor.
//!
//! This crate defines the things a graph document is made of:
//! - Typed flow/data ports and the connection-legality oracle
//! - Node instances and the external node-definition catalog
//! - Directed edges between ports
//! - Node-anchored and floating comments
//! - The versioned, serializable [`GraphDocument`]
//!
//! Editing state and history live in the companion `wirescript_editor`
//! crate; this crate stays purely structural.

pub mod comment;
pub mod document;
pub mod edge;
pub mod node;
pub mod port;

pub use comment::{Comment, CommentAnchor, CommentId};
pub use document::{
    DocumentError, DocumentMetadata, GraphDocument, MIN_SCHEMA_VERSION, SCHEMA_VERSION,
};
pub use edge::{Edge, EdgeEndpoint, EdgeId};
pub use node::{DefinitionCatalog, GraphNode, NodeData, NodeDefinition, NodeId, Position};
pub use port::{can_connect, PortDescriptor, PortKind, ValueType};
