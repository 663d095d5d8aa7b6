// SPDX-License-Identifier: MIT OR Apache-2.0
//! Graph editing engine for the WireScript editor.
//!
//! Everything that makes a `wirescript_graph` document editable lives
//! here:
//! - [`store::GraphStore`] — the document with snapshot-based undo/redo
//! - [`selection`] — the box-selection state machine and selected sets
//! - [`geometry`] — the segment/rectangle math behind crossing selection
//! - [`connection`] — live connection drags and port compatibility
//! - [`editor::GraphEditor`] — the front controller a host embeds
//!
//! The engine is single-threaded and event-driven: the host feeds
//! [`input::PointerEvent`]s and [`input::Key`]s in, implements
//! [`provider::GeometryProvider`] to answer screen-space questions, and
//! calls [`editor::GraphEditor::run_frame`] once per frame so deferred
//! work can run against settled layout.

pub mod connection;
pub mod editor;
pub mod geometry;
pub mod history;
pub mod input;
pub mod provider;
pub mod schedule;
pub mod selection;
pub mod store;
pub mod viewport;

pub use connection::{compatibility_map, ConnectionDrag, DragOrigin};
pub use editor::{ContextHit, EditorCore, GraphEditor};
pub use geometry::{
    segment_intersects_rect, segments_intersect, ScreenPoint, ScreenRect, EPSILON,
};
pub use history::{History, Snapshot, HISTORY_LIMIT};
pub use input::{Key, PointerButton, PointerEvent, PointerEventKind, PointerTarget};
pub use provider::GeometryProvider;
pub use schedule::{FrameScheduler, TaskHandle};
pub use selection::{BoxDrag, DragOutcome, SelectionMode, SelectionState, CLICK_THRESHOLD};
pub use store::{GraphStore, ImportOptions, DUPLICATE_OFFSET};
pub use viewport::{ViewportState, MAX_ZOOM, MIN_ZOOM};
