use diagram::{Action, Store};
use eframe::egui;

use crate::canvas::{Canvas, EditMode};
use crate::config::EditorConfig;
use crate::connector_shape::set_dash_lengths;
use crate::context_menu::ContextMenuView;
use crate::node_shape::{NodeGeometry, set_node_geometry};
use crate::state::State;
use crate::toolbar::ToolbarFlags;
use crate::{inspector, shortcuts, toolbar};

pub struct DiagramEditor {
    state: State,
    canvas: Canvas,
    context_menu: ContextMenuView,
}

impl DiagramEditor {
    pub fn new(config: EditorConfig) -> Self {
        let config = config.clamped();
        set_node_geometry(NodeGeometry::from(&config));
        set_dash_lengths(config.dash_length, config.gap_length);
        log::info!("starting editor with {config:?}");

        Self {
            state: State::new(Store::default()),
            canvas: Canvas::new(&config),
            context_menu: ContextMenuView::default(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.state.store
    }
}

/// A pending preview is sealed once nothing can still extend it: no
/// pointer button is held and no text field owns the keyboard.
fn should_seal_preview(store: &Store, pointer_down: bool, typing: bool) -> bool {
    store.history().is_previewing() && !pointer_down && !typing
}

fn hint(mode: EditMode) -> &'static str {
    match mode {
        EditMode::Move => {
            "Drag to move · Hold Ctrl/Cmd and drag between nodes to connect · \
             Double-click to rename · Right-click for menu"
        }
        EditMode::Connect => "Connect mode: drag from one node to another",
    }
}

impl eframe::App for DiagramEditor {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.state.flush_actions();
        self.state.flush_effects();

        let mut queued: Vec<Action> = Vec::new();
        let store = &self.state.store;

        shortcuts::handle(ctx, &store.selection, |a| queued.push(a));
        toolbar::show(ctx, ToolbarFlags::from_store(store), |a| queued.push(a));
        inspector::show(ctx, store, |a| queued.push(a));
        // Before the canvas, so a close lands ahead of a fresh open.
        self.context_menu
            .show(ctx, &store.context_menu, &self.canvas, |a| queued.push(a));

        let mode = self.canvas.mode();
        let (nodes, edges) = (self.canvas.node_count(), self.canvas.edge_count());
        egui::TopBottomPanel::bottom("hints").show(ctx, |ui| {
            ui.horizontal(|ui| {
                ui.label(hint(mode));
                ui.with_layout(egui::Layout::right_to_left(egui::Align::Center), |ui| {
                    ui.label(format!("{nodes} nodes · {edges} connectors"));
                });
            });
        });

        let canvas = &mut self.canvas;
        egui::CentralPanel::default().show(ctx, |ui| {
            canvas.show(ui, store, |a| queued.push(a));
        });

        let pointer_down = ctx.input(|i| i.pointer.any_down());
        if should_seal_preview(store, pointer_down, ctx.wants_keyboard_input()) {
            queued.push(Action::CommitPreview);
        }

        if !queued.is_empty() {
            for action in queued {
                self.state.dispatch(action);
            }
            ctx.request_repaint();
        }
    }
}
