// Graph model - snapshot value types and the pure operations over them

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::port::Port;
use crate::style::{EdgeStyle, EdgeStylePatch, NodeStyle, NodeStylePatch};

// ------------------------------------------------------------------
// Identities
// ------------------------------------------------------------------

/// Prefix of allocated node ids (`n1`, `n2`, ...).
pub const NODE_ID_PREFIX: char = 'n';

#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric part of an `n<digits>` id.
    pub fn numeric_suffix(&self) -> Option<u64> {
        self.0.strip_prefix(NODE_ID_PREFIX)?.parse().ok()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

#[derive(
    Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct EdgeId(String);

impl EdgeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Id of the connector drawn from `source` to `target`.
    pub fn between(source: &NodeId, target: &NodeId) -> Self {
        Self(format!("{source}-{target}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EdgeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EdgeId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

// ------------------------------------------------------------------
// Entities
// ------------------------------------------------------------------

/// Point in canvas space.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub x: f32,
    pub y: f32,
}

impl Position {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// Smallest size a node can be resized to.
pub const NODE_MIN_SIZE: Size = Size::new(120.0, 50.0);

/// Explicit node dimensions, set by resizing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn at_least(self, min: Size) -> Size {
        Size::new(self.width.max(min.width), self.height.max(min.height))
    }
}

#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize,
)]
pub enum NodeKind {
    #[default]
    Editable,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    #[serde(default)]
    pub kind: NodeKind,
    pub position: Position,
    /// `None` sizes the node to its label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<Size>,
    #[serde(default)]
    pub style: NodeStyle,
}

impl Node {
    pub fn new(id: NodeId, position: Position) -> Self {
        Self {
            id,
            kind: NodeKind::Editable,
            position,
            size: None,
            style: NodeStyle::default(),
        }
    }

    pub fn with_style(mut self, style: NodeStyle) -> Self {
        self.style = style;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub id: EdgeId,
    pub source: NodeId,
    pub target: NodeId,
    #[serde(default)]
    pub source_port: Option<Port>,
    #[serde(default)]
    pub target_port: Option<Port>,
    #[serde(default)]
    pub style: EdgeStyle,
}

impl Edge {
    pub fn new(source: NodeId, target: NodeId) -> Self {
        Self {
            id: EdgeId::between(&source, &target),
            source,
            target,
            source_port: None,
            target_port: None,
            style: EdgeStyle::default(),
        }
    }

    pub fn touches(&self, node: &NodeId) -> bool {
        self.source == *node || self.target == *node
    }

    /// True when this edge links `a` and `b` in either direction.
    pub fn links(&self, a: &NodeId, b: &NodeId) -> bool {
        (self.source == *a && self.target == *b)
            || (self.source == *b && self.target == *a)
    }
}

// ------------------------------------------------------------------
// Snapshot
// ------------------------------------------------------------------

/// One complete editor state. Operations never mutate a snapshot in
/// place; each returns the next one.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    pub nodes: Vec<Node>,
    pub edges: Vec<Edge>,
}

/// The graph the editor opens with.
pub fn initial_snapshot() -> Snapshot {
    let n1 = NodeId::new("n1");
    let n2 = NodeId::new("n2");
    Snapshot {
        nodes: vec![
            Node::new(n1.clone(), Position::new(0.0, 0.0)),
            Node::new(n2.clone(), Position::new(0.0, 150.0)),
        ],
        edges: vec![Edge::new(n1, n2)],
    }
}

impl Snapshot {
    pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
        Self { nodes, edges }
    }

    pub fn node(&self, id: &NodeId) -> Option<&Node> {
        self.nodes.iter().find(|n| n.id == *id)
    }

    pub fn edge(&self, id: &EdgeId) -> Option<&Edge> {
        self.edges.iter().find(|e| e.id == *id)
    }

    pub fn contains_node(&self, id: &NodeId) -> bool {
        self.node(id).is_some()
    }

    pub fn contains_edge(&self, id: &EdgeId) -> bool {
        self.edge(id).is_some()
    }

    /// Edges whose endpoints are not both present.
    pub fn dangling_edges(&self) -> impl Iterator<Item = &Edge> {
        let ids: HashSet<&NodeId> = self.nodes.iter().map(|n| &n.id).collect();
        self.edges.iter().filter(move |e| {
            !ids.contains(&e.source) || !ids.contains(&e.target)
        })
    }

    /// Next free id: one above the largest numeric `n` suffix present.
    /// Ids without a numeric suffix are ignored.
    pub fn next_node_id(&self) -> NodeId {
        let max = self
            .nodes
            .iter()
            .filter_map(|n| n.id.numeric_suffix())
            .max()
            .unwrap_or(0);
        NodeId(format!("{NODE_ID_PREFIX}{}", max + 1))
    }

    pub fn with_node(&self, node: Node) -> Snapshot {
        let mut next = self.clone();
        next.nodes.push(node);
        next
    }

    pub fn with_edge(&self, edge: Edge) -> Snapshot {
        let mut next = self.clone();
        next.edges.push(edge);
        next
    }

    /// Removes the node and every edge attached to it.
    pub fn without_node(&self, id: &NodeId) -> Snapshot {
        Snapshot {
            nodes: self
                .nodes
                .iter()
                .filter(|n| n.id != *id)
                .cloned()
                .collect(),
            edges: self
                .edges
                .iter()
                .filter(|e| !e.touches(id))
                .cloned()
                .collect(),
        }
    }

    pub fn without_edge(&self, id: &EdgeId) -> Snapshot {
        Snapshot {
            nodes: self.nodes.clone(),
            edges: self
                .edges
                .iter()
                .filter(|e| e.id != *id)
                .cloned()
                .collect(),
        }
    }

    /// Moves every listed node to its new position. Unknown ids are
    /// ignored.
    pub fn with_positions<'a>(
        &self,
        moves: impl IntoIterator<Item = (&'a NodeId, Position)>,
    ) -> Snapshot {
        let mut next = self.clone();
        for (id, position) in moves {
            if let Some(node) = next.nodes.iter_mut().find(|n| n.id == *id) {
                node.position = position;
            }
        }
        next
    }

    /// Sets an explicit size, never below `NODE_MIN_SIZE`.
    pub fn with_size(&self, id: &NodeId, size: Size) -> Snapshot {
        let mut next = self.clone();
        if let Some(node) = next.nodes.iter_mut().find(|n| n.id == *id) {
            node.size = Some(size.at_least(NODE_MIN_SIZE));
        }
        next
    }

    pub fn with_node_style(
        &self,
        id: &NodeId,
        patch: &NodeStylePatch,
    ) -> Snapshot {
        let mut next = self.clone();
        if let Some(node) = next.nodes.iter_mut().find(|n| n.id == *id) {
            node.style = node.style.merged(patch);
        }
        next
    }

    pub fn with_edge_style(
        &self,
        id: &EdgeId,
        patch: &EdgeStylePatch,
    ) -> Snapshot {
        let mut next = self.clone();
        if let Some(edge) = next.edges.iter_mut().find(|e| e.id == *id) {
            edge.style = edge.style.merged(patch);
        }
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{DashPattern, Rgb};

    fn node(id: &str) -> Node {
        Node::new(NodeId::new(id), Position::default())
    }

    fn triangle() -> Snapshot {
        Snapshot::new(
            vec![node("n1"), node("n2"), node("n3")],
            vec![
                Edge::new("n1".into(), "n2".into()),
                Edge::new("n2".into(), "n3".into()),
                Edge::new("n3".into(), "n1".into()),
            ],
        )
    }

    #[test]
    fn test_next_node_id_is_max_suffix_plus_one() {
        let s = Snapshot::new(vec![node("n1"), node("n7"), node("n3")], vec![]);
        assert_eq!(s.next_node_id(), NodeId::new("n8"));

        // A gap left by a deletion is not reused; the maximum wins.
        let s = s.without_node(&NodeId::new("n3"));
        assert_eq!(s.next_node_id(), NodeId::new("n8"));
    }

    #[test]
    fn test_next_node_id_ignores_foreign_ids() {
        let s = Snapshot::new(
            vec![node("start"), node("n"), node("nx2"), node("n2")],
            vec![],
        );
        assert_eq!(s.next_node_id(), NodeId::new("n3"));
        assert_eq!(Snapshot::default().next_node_id(), NodeId::new("n1"));
    }

    #[test]
    fn test_without_node_cascades_exactly_incident_edges() {
        let s = triangle().with_node(node("n4")).with_edge(Edge::new(
            "n3".into(),
            "n4".into(),
        ));
        let after = s.without_node(&NodeId::new("n1"));

        assert!(!after.contains_node(&NodeId::new("n1")));
        let remaining: Vec<&str> =
            after.edges.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(remaining, vec!["n2-n3", "n3-n4"]);
        assert_eq!(after.dangling_edges().count(), 0);
        // The source snapshot is untouched.
        assert_eq!(s.edges.len(), 4);
    }

    #[test]
    fn test_with_positions_ignores_unknown_ids() {
        let s = triangle();
        let n2 = NodeId::new("n2");
        let ghost = NodeId::new("ghost");
        let moved = s.with_positions([
            (&n2, Position::new(5.0, 6.0)),
            (&ghost, Position::new(1.0, 1.0)),
        ]);
        assert_eq!(moved.node(&n2).unwrap().position, Position::new(5.0, 6.0));
        assert_eq!(moved.nodes.len(), 3);
    }

    #[test]
    fn test_style_patches_touch_only_their_target() {
        let s = triangle();
        let n1 = NodeId::new("n1");
        let styled = s.with_node_style(
            &n1,
            &NodeStylePatch {
                fill: Some(Rgb(10, 20, 30)),
                ..Default::default()
            },
        );
        assert_eq!(styled.node(&n1).unwrap().style.fill, Rgb(10, 20, 30));
        assert_eq!(
            styled.node(&NodeId::new("n2")).unwrap().style,
            NodeStyle::default()
        );

        let e = EdgeId::new("n2-n3");
        let dotted =
            s.with_edge_style(&e, &EdgeStylePatch::dash(DashPattern::Dotted));
        assert_eq!(dotted.edge(&e).unwrap().style.dash, DashPattern::Dotted);
        assert_eq!(
            dotted.edge(&EdgeId::new("n1-n2")).unwrap().style.dash,
            DashPattern::Solid
        );
    }

    #[test]
    fn test_initial_snapshot_is_consistent() {
        let s = initial_snapshot();
        assert_eq!(s.nodes.len(), 2);
        assert_eq!(s.edges[0].id, EdgeId::new("n1-n2"));
        assert_eq!(s.nodes[0].style.label, crate::style::NEW_NODE_LABEL);
        assert_eq!(s.dangling_edges().count(), 0);
        assert_eq!(s.next_node_id(), NodeId::new("n3"));
    }

    #[test]
    fn test_with_size_clamps_to_minimum() {
        let s = triangle();
        let n1 = NodeId::new("n1");
        assert_eq!(s.node(&n1).unwrap().size, None);

        let sized = s.with_size(&n1, Size::new(200.0, 80.0));
        assert_eq!(sized.node(&n1).unwrap().size, Some(Size::new(200.0, 80.0)));

        let tiny = s.with_size(&n1, Size::new(10.0, 10.0));
        assert_eq!(tiny.node(&n1).unwrap().size, Some(NODE_MIN_SIZE));
        assert_eq!(tiny.node(&NodeId::new("n2")).unwrap().size, None);
    }

    #[test]
    fn test_missing_size_deserializes_as_none() {
        let json = r#"{"id":"n1","position":{"x":0.0,"y":0.0}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.size, None);
    }
}
