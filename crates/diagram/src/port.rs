use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::ParseError;

/// Side of a node rectangle a port sits on.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    pub const ALL: [Side; 4] =
        [Side::Top, Side::Right, Side::Bottom, Side::Left];

    fn letter(self) -> char {
        match self {
            Side::Top => 't',
            Side::Right => 'r',
            Side::Bottom => 'b',
            Side::Left => 'l',
        }
    }

    /// Unit outward normal, y pointing down.
    pub fn normal(self) -> (f32, f32) {
        match self {
            Side::Top => (0.0, -1.0),
            Side::Right => (1.0, 0.0),
            Side::Bottom => (0.0, 1.0),
            Side::Left => (-1.0, 0.0),
        }
    }

    /// Side of a `width` x `height` box centered on the origin that is
    /// closest to the point `(dx, dy)`.
    pub fn nearest(dx: f32, dy: f32, width: f32, height: f32) -> Side {
        // Normalize so the box becomes a square before comparing.
        let nx = dx / width.max(f32::EPSILON);
        let ny = dy / height.max(f32::EPSILON);
        if nx.abs() >= ny.abs() {
            if nx >= 0.0 { Side::Right } else { Side::Left }
        } else if ny >= 0.0 {
            Side::Bottom
        } else {
            Side::Top
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Side::Top => "top",
            Side::Right => "right",
            Side::Bottom => "bottom",
            Side::Left => "left",
        };
        f.write_str(name)
    }
}

/// Direction of a port: outbound (`Source`) or inbound (`Target`).
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize,
)]
pub enum PortKind {
    Source,
    Target,
}

/// A handle on one side of a node. Every side carries one port of each
/// kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Port {
    pub side: Side,
    pub kind: PortKind,
}

impl Port {
    pub const fn source(side: Side) -> Self {
        Self {
            side,
            kind: PortKind::Source,
        }
    }

    pub const fn target(side: Side) -> Self {
        Self {
            side,
            kind: PortKind::Target,
        }
    }
}

impl fmt::Display for Port {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.kind {
            PortKind::Source => 's',
            PortKind::Target => 't',
        };
        write!(f, "{}-{}", self.side.letter(), kind)
    }
}

impl FromStr for Port {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseError::Port(s.to_string());
        let (side, kind) = s.split_once('-').ok_or_else(invalid)?;
        let side = match side {
            "t" => Side::Top,
            "r" => Side::Right,
            "b" => Side::Bottom,
            "l" => Side::Left,
            _ => return Err(invalid()),
        };
        let kind = match kind {
            "s" => PortKind::Source,
            "t" => PortKind::Target,
            _ => return Err(invalid()),
        };
        Ok(Self { side, kind })
    }
}

impl TryFrom<String> for Port {
    type Error = ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Port> for String {
    fn from(value: Port) -> Self {
        value.to_string()
    }
}
