use diagram::{DashPattern, Edge, EdgeStyle, Node, Port, Side};
use eframe::egui::{Color32, Pos2, Shape, Stroke};
use egui_graphs::{DisplayEdge, DrawContext, EdgeProps, Node as GraphNode};
use once_cell::sync::Lazy;
use petgraph::{EdgeType, stable_graph::IndexType};
use std::sync::RwLock;

use crate::colors::to_color32;
use crate::node_shape::{EditableNodeShape, port_anchor};

/// Extra distance around the stroke that still counts as a hit.
const HIT_TOLERANCE: f32 = 4.0;
const SELECTED_UNDERLAY: Color32 =
    Color32::from_rgba_premultiplied(26, 115, 232, 90);

pub const DEFAULT_SOURCE_SIDE: Side = Side::Bottom;
pub const DEFAULT_TARGET_SIDE: Side = Side::Top;

static DASH: Lazy<RwLock<(f32, f32)>> = Lazy::new(|| RwLock::new((5.0, 5.0)));

fn dash_lengths() -> (f32, f32) {
    *DASH.read().unwrap()
}

pub fn set_dash_lengths(dash: f32, gap: f32) {
    let mut guard = DASH.write().unwrap();
    *guard = (dash.max(1.0), gap.max(1.0));
}

fn port_side(port: Option<Port>, fallback: Side) -> Side {
    port.map_or(fallback, |p| p.side)
}

/// Distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Pos2, a: Pos2, b: Pos2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_sq();
    if len_sq < f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Straight connector between the two ports an edge was drawn from,
/// solid or dashed.
#[derive(Clone, Debug)]
pub struct ConnectorShape {
    source_side: Side,
    target_side: Side,
    style: EdgeStyle,
    selected: bool,
}

impl From<EdgeProps<Edge>> for ConnectorShape {
    fn from(props: EdgeProps<Edge>) -> Self {
        Self {
            source_side: port_side(props.payload.source_port, DEFAULT_SOURCE_SIDE),
            target_side: port_side(props.payload.target_port, DEFAULT_TARGET_SIDE),
            style: props.payload.style.clone(),
            selected: props.selected,
        }
    }
}

impl ConnectorShape {
    /// Canvas positions of both ends.
    fn endpoints<Ty: EdgeType, Ix: IndexType>(
        &self,
        start: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
        end: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
    ) -> (Pos2, Pos2) {
        (
            port_anchor(start.location(), start.display().size(), self.source_side),
            port_anchor(end.location(), end.display().size(), self.target_side),
        )
    }
}

impl<Ty: EdgeType, Ix: IndexType>
    DisplayEdge<Node, Edge, Ty, Ix, EditableNodeShape> for ConnectorShape
{
    fn is_inside(
        &self,
        start: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
        end: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
        pos: Pos2,
    ) -> bool {
        let (a, b) = self.endpoints(start, end);
        distance_to_segment(pos, a, b)
            <= self.style.stroke_width / 2.0 + HIT_TOLERANCE
    }

    fn shapes(
        &mut self,
        start: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
        end: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
        ctx: &DrawContext,
    ) -> Vec<Shape> {
        let (a, b) = self.endpoints(start, end);
        let points = [
            ctx.meta.canvas_to_screen_pos(a),
            ctx.meta.canvas_to_screen_pos(b),
        ];
        let width = ctx.meta.canvas_to_screen_size(self.style.stroke_width);
        let stroke = Stroke::new(width, to_color32(self.style.stroke));

        let mut res = Vec::new();
        if self.selected {
            res.push(Shape::line_segment(
                points,
                Stroke::new(width + 4.0, SELECTED_UNDERLAY),
            ));
        }
        match self.style.dash {
            DashPattern::Solid => res.push(Shape::line_segment(points, stroke)),
            DashPattern::Dotted => {
                let (dash, gap) = dash_lengths();
                res.extend(Shape::dashed_line(
                    &points,
                    stroke,
                    ctx.meta.canvas_to_screen_size(dash),
                    ctx.meta.canvas_to_screen_size(gap),
                ));
            }
        }
        res
    }

    fn update(&mut self, state: &EdgeProps<Edge>) {
        self.source_side = port_side(state.payload.source_port, DEFAULT_SOURCE_SIDE);
        self.target_side = port_side(state.payload.target_port, DEFAULT_TARGET_SIDE);
        self.style = state.payload.style.clone();
        self.selected = state.selected;
    }

    fn extra_bounds(
        &self,
        _start: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
        _end: &GraphNode<Node, Edge, Ty, Ix, EditableNodeShape>,
    ) -> Option<(Pos2, Pos2)> {
        None
    }
}
