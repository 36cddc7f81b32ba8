use diagram::{
    Action, Commit, DashPattern, Edge, EdgeStylePatch, Node, NodeStylePatch,
    Rgb, Store,
};
use eframe::egui;
use eframe::egui::color_picker::{Alpha, color_edit_button_srgba};

use crate::colors::{from_color32, to_color32};
use crate::config::{BORDER_WIDTH_RANGE, FONT_SIZE_RANGE, STROKE_WIDTH_RANGE};

const MARGIN: f32 = 10.0;
const WIDTH: f32 = 220.0;

/// Color picker row. Returns the new color while the picker changes it.
fn color_row(ui: &mut egui::Ui, label: &str, color: Rgb) -> Option<Rgb> {
    let mut picked = to_color32(color);
    let changed = ui
        .horizontal(|ui| {
            ui.label(label);
            color_edit_button_srgba(ui, &mut picked, Alpha::Opaque).changed()
        })
        .inner;
    changed.then(|| from_color32(picked))
}

/// Right-hand panel for whatever is selected. Shows nothing when the
/// selection is empty.
pub fn show(ctx: &egui::Context, store: &Store, dispatch: impl FnMut(Action)) {
    let node = store.selected_node();
    let edge = store.selected_edge();
    if node.is_none() && edge.is_none() {
        return;
    }
    let mut dispatch = dispatch;
    egui::Area::new(egui::Id::new("inspector"))
        .anchor(egui::Align2::RIGHT_TOP, egui::vec2(-MARGIN, MARGIN))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.set_width(WIDTH);
                if let Some(node) = node {
                    node_inspector(ui, node, &mut dispatch);
                } else if let Some(edge) = edge {
                    edge_inspector(ui, edge, &mut dispatch);
                }
            });
        });
}

fn node_inspector(
    ui: &mut egui::Ui,
    node: &Node,
    dispatch: &mut impl FnMut(Action),
) {
    let style = &node.style;
    let mut preview = |patch: NodeStylePatch| {
        dispatch(Action::UpdateNodeStyle {
            patch,
            commit: Commit::Preview,
        })
    };

    ui.heading("Node Settings");
    ui.separator();

    ui.label("Label");
    let mut label = style.label.clone();
    if ui.text_edit_singleline(&mut label).changed() {
        preview(NodeStylePatch::label(label));
    }

    if let Some(fill) = color_row(ui, "Background", style.fill) {
        preview(NodeStylePatch {
            fill: Some(fill),
            ..Default::default()
        });
    }
    if let Some(border_color) = color_row(ui, "Border", style.border_color) {
        preview(NodeStylePatch {
            border_color: Some(border_color),
            ..Default::default()
        });
    }
    if let Some(text_color) = color_row(ui, "Text Color", style.text_color) {
        preview(NodeStylePatch {
            text_color: Some(text_color),
            ..Default::default()
        });
    }

    ui.label("Border Width");
    let mut border_width = style.border_width;
    if ui
        .add(
            egui::Slider::new(&mut border_width, BORDER_WIDTH_RANGE.range())
                .step_by(BORDER_WIDTH_RANGE.step as f64),
        )
        .changed()
    {
        preview(NodeStylePatch {
            border_width: Some(BORDER_WIDTH_RANGE.clamp(border_width)),
            ..Default::default()
        });
    }

    ui.label("Font Size");
    let mut font_size = style.font_size;
    if ui
        .add(
            egui::DragValue::new(&mut font_size)
                .range(FONT_SIZE_RANGE.range())
                .speed(FONT_SIZE_RANGE.step),
        )
        .changed()
    {
        preview(NodeStylePatch {
            font_size: Some(FONT_SIZE_RANGE.clamp(font_size)),
            ..Default::default()
        });
    }
}

fn edge_inspector(
    ui: &mut egui::Ui,
    edge: &Edge,
    dispatch: &mut impl FnMut(Action),
) {
    let style = &edge.style;

    ui.heading("Connector Settings");
    ui.separator();

    if let Some(stroke) = color_row(ui, "Color", style.stroke) {
        dispatch(Action::UpdateEdgeStyle {
            patch: EdgeStylePatch {
                stroke: Some(stroke),
                ..Default::default()
            },
            commit: Commit::Preview,
        });
    }

    ui.label("Thickness");
    let mut width = style.stroke_width;
    if ui
        .add(
            egui::DragValue::new(&mut width)
                .range(STROKE_WIDTH_RANGE.range())
                .speed(STROKE_WIDTH_RANGE.step),
        )
        .changed()
    {
        dispatch(Action::UpdateEdgeStyle {
            patch: EdgeStylePatch {
                stroke_width: Some(STROKE_WIDTH_RANGE.clamp(width)),
                ..Default::default()
            },
            commit: Commit::Preview,
        });
    }

    ui.label("Line Type");
    let mut dash = style.dash;
    egui::ComboBox::from_id_salt("line_type")
        .selected_text(dash.label())
        .show_ui(ui, |ui| {
            for option in [DashPattern::Solid, DashPattern::Dotted] {
                ui.selectable_value(&mut dash, option, option.label());
            }
        });
    if dash != style.dash {
        dispatch(Action::UpdateEdgeStyle {
            patch: EdgeStylePatch::dash(dash),
            commit: Commit::Record,
        });
    }
}
