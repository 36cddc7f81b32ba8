use crate::graph::NodeId;
use crate::port::Side;

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("invalid color {0:?}, expected #rgb or #rrggbb")]
    Color(String),
    #[error("invalid port id {0:?}, expected <t|r|b|l>-<s|t>")]
    Port(String),
}

/// Reasons a connect request is refused. None of these reach the user;
/// the gesture is simply not completed.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum ConnectError {
    #[error("both ends are on the {0} side")]
    SameSide(Side),
    #[error("{0} and {1} are already connected")]
    Duplicate(NodeId, NodeId),
    #[error("cannot connect {0} to itself")]
    SelfLoop(NodeId),
    #[error("node {0} does not exist")]
    MissingNode(NodeId),
}
