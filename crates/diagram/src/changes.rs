use crate::graph::{EdgeId, NodeId, Position, Size};

/// A change reported by the canvas for a single node.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeChange {
    /// The node was moved to `position`. `dragging` is true for the
    /// intermediate frames of a drag and false for its final frame.
    Position {
        id: NodeId,
        position: Position,
        dragging: bool,
    },
    /// The node was resized. `resizing` follows the same rule as
    /// `dragging`.
    Dimensions {
        id: NodeId,
        size: Size,
        resizing: bool,
    },
    Select { id: NodeId, selected: bool },
    Remove { id: NodeId },
}

/// A change reported by the canvas for a single edge.
#[derive(Clone, Debug, PartialEq)]
pub enum EdgeChange {
    Select { id: EdgeId, selected: bool },
    Remove { id: EdgeId },
}
