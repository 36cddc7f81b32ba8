use diagram::{Node, NodeStyle, Side, Size};
use eframe::egui::{
    Color32, CornerRadius, FontId, Pos2, Rect, Shape, Stroke, StrokeKind, Vec2,
    epaint::{CircleShape, RectShape, TextShape},
};
use egui_graphs::{DisplayNode, DrawContext, NodeProps};
use once_cell::sync::Lazy;
use petgraph::{EdgeType, stable_graph::IndexType};
use std::sync::RwLock;

use crate::colors::{font_family, to_color32};
use crate::config::EditorConfig;

const CORNER_RADIUS: u8 = 4;
const LABEL_PADDING: f32 = 10.0;
/// Average glyph width as a fraction of the font size.
const GLYPH_WIDTH: f32 = 0.6;
const HALO_GAP: f32 = 3.0;
const HALO_COLOR: Color32 = Color32::from_rgb(26, 115, 232);
/// Screen size of the square resize grip on a selected node.
pub const RESIZE_GRIP: f32 = 8.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeGeometry {
    pub min_width: f32,
    pub height: f32,
    pub port_radius: f32,
}

impl From<&EditorConfig> for NodeGeometry {
    fn from(config: &EditorConfig) -> Self {
        Self {
            min_width: config.node_min_width,
            height: config.node_height,
            port_radius: config.port_radius,
        }
    }
}

static GEOMETRY: Lazy<RwLock<NodeGeometry>> =
    Lazy::new(|| RwLock::new(NodeGeometry::from(&EditorConfig::default())));

pub fn set_node_geometry(geometry: NodeGeometry) {
    let mut guard = GEOMETRY.write().unwrap();
    *guard = geometry;
}

pub fn node_geometry() -> NodeGeometry {
    *GEOMETRY.read().unwrap()
}

/// Canvas size of a node. An explicit size wins; otherwise at least the
/// configured box, wider for long labels and taller for large fonts.
pub fn node_size(
    style: &NodeStyle,
    explicit: Option<Size>,
    geometry: &NodeGeometry,
) -> Vec2 {
    if let Some(size) = explicit {
        return Vec2::new(size.width, size.height);
    }
    let chars = style.label.chars().count() as f32;
    let text_width = chars * style.font_size * GLYPH_WIDTH;
    Vec2::new(
        geometry.min_width.max(text_width + 2.0 * LABEL_PADDING),
        geometry.height.max(style.font_size + 2.0 * LABEL_PADDING),
    )
}

/// Grip in the bottom-right corner of a screen-space node rect.
pub fn resize_grip(rect: Rect) -> Rect {
    Rect::from_center_size(rect.right_bottom(), Vec2::splat(RESIZE_GRIP))
}

/// Midpoint of `side` on a box of `size` centered on `center`.
pub fn port_anchor(center: Pos2, size: Vec2, side: Side) -> Pos2 {
    let (nx, ny) = side.normal();
    center + Vec2::new(nx * size.x / 2.0, ny * size.y / 2.0)
}

/// Rounded box with a centered label, a selection halo and one port per
/// side. Ports are only drawn while the node is hovered or selected.
#[derive(Clone, Debug)]
pub struct EditableNodeShape {
    pos: Pos2,
    selected: bool,
    dragged: bool,
    hovered: bool,
    style: NodeStyle,
    size: Vec2,
    port_radius: f32,
}

impl From<NodeProps<Node>> for EditableNodeShape {
    fn from(props: NodeProps<Node>) -> Self {
        let geometry = node_geometry();
        let style = props.payload.style.clone();
        Self {
            pos: props.location(),
            selected: props.selected,
            dragged: props.dragged,
            hovered: props.hovered,
            size: node_size(&style, props.payload.size, &geometry),
            style,
            port_radius: geometry.port_radius,
        }
    }
}

impl<E: Clone, Ty: EdgeType, Ix: IndexType> DisplayNode<Node, E, Ty, Ix>
    for EditableNodeShape
{
    fn closest_boundary_point(&self, dir: Vec2) -> Pos2 {
        if dir.length_sq() < f32::EPSILON {
            return self.pos;
        }
        let d = dir.normalized();
        let half = self.size / 2.0;
        let tx = if d.x.abs() > f32::EPSILON { half.x / d.x.abs() } else { f32::INFINITY };
        let ty = if d.y.abs() > f32::EPSILON { half.y / d.y.abs() } else { f32::INFINITY };
        self.pos + d * tx.min(ty)
    }

    fn shapes(&mut self, ctx: &DrawContext) -> Vec<Shape> {
        let mut res = Vec::with_capacity(8);
        let center = ctx.meta.canvas_to_screen_pos(self.pos);
        let size = self.size * ctx.meta.canvas_to_screen_size(1.0);
        let rect = Rect::from_center_size(center, size);

        if self.selected {
            res.push(
                RectShape::stroke(
                    rect.expand(HALO_GAP),
                    CornerRadius::same(CORNER_RADIUS + HALO_GAP as u8),
                    Stroke::new(2.0, HALO_COLOR),
                    StrokeKind::Outside,
                )
                .into(),
            );
        }

        let border_width =
            ctx.meta.canvas_to_screen_size(self.style.border_width);
        res.push(
            RectShape::new(
                rect,
                CornerRadius::same(CORNER_RADIUS),
                to_color32(self.style.fill),
                Stroke::new(border_width, to_color32(self.style.border_color)),
                StrokeKind::Inside,
            )
            .into(),
        );

        let text_color = to_color32(self.style.text_color);
        let font = FontId::new(
            ctx.meta.canvas_to_screen_size(self.style.font_size),
            font_family(&self.style.font_family),
        );
        let galley = ctx.ctx.fonts_mut(|f| {
            f.layout_no_wrap(self.style.label.clone(), font, text_color)
        });
        let label_pos = center - galley.size() / 2.0;
        res.push(TextShape::new(label_pos, galley, text_color).into());

        if self.hovered || self.selected || self.dragged {
            let radius = ctx.meta.canvas_to_screen_size(self.port_radius);
            let stroke = Stroke::new(1.0, to_color32(self.style.border_color));
            for side in Side::ALL {
                res.push(
                    CircleShape {
                        center: port_anchor(center, size, side),
                        radius,
                        fill: Color32::WHITE,
                        stroke,
                    }
                    .into(),
                );
            }
        }

        if self.selected {
            res.push(
                RectShape::filled(
                    resize_grip(rect),
                    CornerRadius::ZERO,
                    HALO_COLOR,
                )
                .into(),
            );
        }
        res
    }

    fn update(&mut self, state: &NodeProps<Node>) {
        let geometry = node_geometry();
        self.pos = state.location();
        self.selected = state.selected;
        self.dragged = state.dragged;
        self.hovered = state.hovered;
        self.style = state.payload.style.clone();
        self.size = node_size(&self.style, state.payload.size, &geometry);
        self.port_radius = geometry.port_radius;
    }

    fn is_inside(&self, pos: Pos2) -> bool {
        Rect::from_center_size(self.pos, self.size).contains(pos)
    }
}

impl EditableNodeShape {
    pub fn size(&self) -> Vec2 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn geometry() -> NodeGeometry {
        NodeGeometry::from(&EditorConfig::default())
    }

    #[test]
    fn test_short_labels_use_the_minimum_box() {
        let size = node_size(&NodeStyle::default().with_label("a"), None, &geometry());
        assert_eq!(size, Vec2::new(150.0, 40.0));
    }

    #[test]
    fn test_long_labels_and_big_fonts_grow_the_box() {
        let mut style = NodeStyle::default().with_label("x".repeat(40));
        style.font_size = 30.0;
        let size = node_size(&style, None, &geometry());
        assert!(size.x > 150.0, "width {} should grow", size.x);
        assert_eq!(size.y, 50.0);
    }

    #[test]
    fn test_explicit_size_overrides_label_sizing() {
        let style = NodeStyle::default().with_label("x".repeat(40));
        let size = node_size(&style, Some(Size::new(130.0, 70.0)), &geometry());
        assert_eq!(size, Vec2::new(130.0, 70.0));
    }

    #[test]
    fn test_resize_grip_sits_on_bottom_right_corner() {
        let rect = Rect::from_min_max(Pos2::new(0.0, 0.0), Pos2::new(100.0, 40.0));
        let grip = resize_grip(rect);
        assert_eq!(grip.center(), Pos2::new(100.0, 40.0));
        assert_eq!(grip.width(), RESIZE_GRIP);
    }

    #[test]
    fn test_port_anchors_sit_on_side_midpoints() {
        let center = Pos2::new(10.0, 20.0);
        let size = Vec2::new(100.0, 40.0);
        assert_eq!(port_anchor(center, size, Side::Top), Pos2::new(10.0, 0.0));
        assert_eq!(port_anchor(center, size, Side::Right), Pos2::new(60.0, 20.0));
        assert_eq!(port_anchor(center, size, Side::Bottom), Pos2::new(10.0, 40.0));
        assert_eq!(port_anchor(center, size, Side::Left), Pos2::new(-40.0, 20.0));
    }
}
