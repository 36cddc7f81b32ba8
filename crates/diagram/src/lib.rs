//! Data model and undo/redo core of the diagram editor.
//!
//! Everything here is independent of the UI toolkit: snapshots of nodes and
//! edges, the snapshot [`History`], the [`Store`] that owns it together with
//! selection and context-menu state, and the [`Action`] reducer the editor
//! drives once per frame.

pub mod actions;
pub mod changes;
pub mod connection;
pub mod effects;
mod error;
pub mod graph;
pub mod history;
pub mod port;
pub mod store;
pub mod style;

pub use actions::{Action, update};
pub use changes::{EdgeChange, NodeChange};
pub use connection::Connection;
pub use effects::Effect;
pub use error::{ConnectError, ParseError};
pub use graph::{
    Edge, EdgeId, NODE_MIN_SIZE, Node, NodeId, NodeKind, Position, Size, Snapshot,
    initial_snapshot,
};
pub use history::{Commit, History};
pub use port::{Port, PortKind, Side};
pub use store::{ContextMenu, Selection, Store};
pub use style::{DashPattern, EdgeStyle, EdgeStylePatch, NodeStyle, NodeStylePatch, Rgb};
