// SPDX-License-Identifier: MIT OR Apache-2.0
//! Free-floating and node-anchored canvas comments.

use crate::node::{NodeId, Position};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for a comment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CommentId(pub Uuid);

impl CommentId {
    /// Create a new random comment ID
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for CommentId {
    fn default() -> Self {
        Self::new()
    }
}

/// Where a comment lives on the canvas
///
/// The two anchor kinds are mutually exclusive: a comment either follows a
/// node or floats at an explicit position, never both.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommentAnchor {
    /// Follows the given node's position
    Node(NodeId),
    /// Fixed canvas position
    Floating(Position),
}

/// A comment bubble on the canvas
#[derive(Debug, Clone, PartialEq)]
pub struct Comment {
    /// Unique comment ID
    pub id: CommentId,
    /// Comment text
    pub text: String,
    /// Pinned comments are exempt from bulk collapse
    pub pinned: bool,
    /// Collapsed comments render as a stub
    pub collapsed: bool,
    /// Node anchor or floating position
    pub anchor: CommentAnchor,
}

impl Comment {
    /// Create an empty comment anchored to a node
    pub fn on_node(node_id: NodeId) -> Self {
        Self {
            id: CommentId::new(),
            text: String::new(),
            pinned: false,
            collapsed: false,
            anchor: CommentAnchor::Node(node_id),
        }
    }

    /// Create an empty comment floating at a canvas position
    pub fn floating(position: Position) -> Self {
        Self {
            id: CommentId::new(),
            text: String::new(),
            pinned: false,
            collapsed: false,
            anchor: CommentAnchor::Floating(position),
        }
    }

    /// The anchored node, if any
    pub fn node_id(&self) -> Option<NodeId> {
        match self.anchor {
            CommentAnchor::Node(id) => Some(id),
            CommentAnchor::Floating(_) => None,
        }
    }
}

/// Wire representation: the anchor is a pair of optional fields.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CommentWire {
    id: CommentId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    node_id: Option<NodeId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    position: Option<Position>,
    #[serde(default)]
    text: String,
    #[serde(default)]
    pinned: bool,
    #[serde(default)]
    collapsed: bool,
}

impl Serialize for Comment {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let (node_id, position) = match self.anchor {
            CommentAnchor::Node(id) => (Some(id), None),
            CommentAnchor::Floating(pos) => (None, Some(pos)),
        };
        CommentWire {
            id: self.id,
            node_id,
            position,
            text: self.text.clone(),
            pinned: self.pinned,
            collapsed: self.collapsed,
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Comment {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = CommentWire::deserialize(deserializer)?;
        // Node anchor wins when a document carries both fields
        let anchor = match (wire.node_id, wire.position) {
            (Some(node_id), _) => CommentAnchor::Node(node_id),
            (None, Some(position)) => CommentAnchor::Floating(position),
            (None, None) => {
                return Err(serde::de::Error::custom(
                    "comment has neither nodeId nor position",
                ))
            }
        };
        Ok(Self {
            id: wire.id,
            text: wire.text,
            pinned: wire.pinned,
            collapsed: wire.collapsed,
            anchor,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_anchor_round_trip() {
        let node_id = NodeId::new();
        let anchored = Comment::on_node(node_id);
        let json = serde_json::to_value(&anchored).unwrap();
        assert!(json.get("position").is_none());
        let back: Comment = serde_json::from_value(json).unwrap();
        assert_eq!(back.anchor, CommentAnchor::Node(node_id));

        let floating = Comment::floating(Position::new(10.0, 20.0));
        let json = serde_json::to_value(&floating).unwrap();
        assert!(json.get("nodeId").is_none());
        let back: Comment = serde_json::from_value(json).unwrap();
        assert_eq!(back.anchor, CommentAnchor::Floating(Position::new(10.0, 20.0)));
    }

    #[test]
    fn test_anchorless_comment_rejected() {
        let json = serde_json::json!({
            "id": CommentId::new(),
            "text": "orphan",
        });
        assert!(serde_json::from_value::<Comment>(json).is_err());
    }
}
