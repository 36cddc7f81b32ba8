use serde::{Deserialize, Serialize};

use crate::ConnectError;
use crate::graph::{Edge, NodeId, Snapshot};
use crate::port::Port;

/// A request to draw a connector between two node ports.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Connection {
    pub source: NodeId,
    pub source_port: Port,
    pub target: NodeId,
    pub target_port: Port,
}

impl Connection {
    pub fn new(
        source: impl Into<NodeId>,
        source_port: Port,
        target: impl Into<NodeId>,
        target_port: Port,
    ) -> Self {
        Self {
            source: source.into(),
            source_port,
            target: target.into(),
            target_port,
        }
    }

    fn to_edge(&self) -> Edge {
        let mut edge = Edge::new(self.source.clone(), self.target.clone());
        edge.source_port = Some(self.source_port);
        edge.target_port = Some(self.target_port);
        edge
    }
}

/// Checks a connection against the snapshot: both ends must exist and
/// differ, the port sides must differ, and the pair must not already be
/// linked in either direction.
pub fn validate(
    snapshot: &Snapshot,
    connection: &Connection,
) -> Result<(), ConnectError> {
    for id in [&connection.source, &connection.target] {
        if !snapshot.contains_node(id) {
            return Err(ConnectError::MissingNode(id.clone()));
        }
    }
    if connection.source == connection.target {
        return Err(ConnectError::SelfLoop(connection.source.clone()));
    }
    if connection.source_port.side == connection.target_port.side {
        return Err(ConnectError::SameSide(connection.source_port.side));
    }
    if snapshot
        .edges
        .iter()
        .any(|e| e.links(&connection.source, &connection.target))
    {
        return Err(ConnectError::Duplicate(
            connection.source.clone(),
            connection.target.clone(),
        ));
    }
    Ok(())
}

impl Snapshot {
    /// Appends a default-styled edge for `connection` if it is valid.
    pub fn with_connection(
        &self,
        connection: &Connection,
    ) -> Result<Snapshot, ConnectError> {
        validate(self, connection)?;
        Ok(self.with_edge(connection.to_edge()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{EdgeId, Node, Position};
    use crate::port::Side;
    use crate::style::EdgeStyle;

    fn three_nodes() -> Snapshot {
        Snapshot::new(
            ["n1", "n2", "n3"]
                .into_iter()
                .map(|id| Node::new(id.into(), Position::default()))
                .collect(),
            vec![],
        )
    }

    #[test]
    fn test_accepts_opposite_sides() {
        let s = three_nodes();
        let c = Connection::new(
            "n1",
            Port::source(Side::Bottom),
            "n2",
            Port::target(Side::Top),
        );
        let next = s.with_connection(&c).unwrap();
        assert_eq!(next.edges.len(), s.edges.len() + 1);
        let edge = &next.edges[0];
        assert_eq!(edge.id, EdgeId::new("n1-n2"));
        assert_eq!(edge.style, EdgeStyle::default());
        assert_eq!(edge.source_port, Some(Port::source(Side::Bottom)));
        assert_eq!(edge.target_port, Some(Port::target(Side::Top)));
    }

    #[test]
    fn test_rejects_same_side() {
        let c = Connection::new(
            "n1",
            Port::source(Side::Left),
            "n2",
            Port::target(Side::Left),
        );
        assert_eq!(
            three_nodes().with_connection(&c),
            Err(ConnectError::SameSide(Side::Left))
        );
    }

    #[test]
    fn test_rejects_duplicates_in_either_direction() {
        let forward = Connection::new(
            "n1",
            Port::source(Side::Right),
            "n2",
            Port::target(Side::Left),
        );
        let s = three_nodes().with_connection(&forward).unwrap();

        let again = s.with_connection(&forward);
        assert!(matches!(again, Err(ConnectError::Duplicate(_, _))));

        let backward = Connection::new(
            "n2",
            Port::source(Side::Bottom),
            "n1",
            Port::target(Side::Top),
        );
        assert!(matches!(
            s.with_connection(&backward),
            Err(ConnectError::Duplicate(_, _))
        ));

        // A different pair is still fine.
        let other = Connection::new(
            "n2",
            Port::source(Side::Bottom),
            "n3",
            Port::target(Side::Top),
        );
        assert_eq!(s.with_connection(&other).unwrap().edges.len(), 2);
    }

    #[test]
    fn test_rejects_self_loops_and_missing_nodes() {
        let s = three_nodes();
        let self_loop = Connection::new(
            "n1",
            Port::source(Side::Right),
            "n1",
            Port::target(Side::Left),
        );
        assert_eq!(
            validate(&s, &self_loop),
            Err(ConnectError::SelfLoop("n1".into()))
        );

        let missing = Connection::new(
            "n1",
            Port::source(Side::Right),
            "n9",
            Port::target(Side::Left),
        );
        assert_eq!(
            validate(&s, &missing),
            Err(ConnectError::MissingNode("n9".into()))
        );
    }
}
