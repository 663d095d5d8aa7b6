// SPDX-License-Identifier: MIT OR Apache-2.0
//! Input events the host feeds into the editor.
//!
//! The core never listens to a windowing system directly: the embedding
//! layer translates whatever event source it has into these values.

use crate::geometry::ScreenPoint;

/// Which pointer button an event refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left mouse button or touch contact
    Primary,
    /// Right mouse button
    Secondary,
    /// Middle mouse button
    Middle,
}

/// What a pointer did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerEventKind {
    /// Button pressed
    Down,
    /// Pointer moved
    Move,
    /// Button released
    Up,
}

/// What the pointer was over when the event fired.
///
/// Hit-testing is the rendering surface's job; it reports the result
/// alongside the raw event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerTarget {
    /// Empty canvas
    #[default]
    Canvas,
    /// A node body
    Node(wirescript_graph::NodeId),
    /// An edge path
    Edge(wirescript_graph::EdgeId),
}

/// One pointer event in screen space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    /// Down, move or up
    pub kind: PointerEventKind,
    /// Pointer position
    pub position: ScreenPoint,
    /// Button for down/up; the button a move attributes to is whichever
    /// is held
    pub button: PointerButton,
    /// Whether the primary button is currently held
    pub primary_held: bool,
    /// What the pointer is over
    pub target: PointerTarget,
}

/// Editing keys the core reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    /// Delete the current selection
    Delete,
    /// Alternative delete binding
    Backspace,
    /// Duplicate the selected nodes
    Duplicate,
    /// Undo the last edit
    Undo,
    /// Redo the last undone edit
    Redo,
    /// Cancel the in-progress drag
    Escape,
}
