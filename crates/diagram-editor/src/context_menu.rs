use diagram::{Action, ContextMenu};
use eframe::egui::{self, Pos2};

use crate::canvas::{Canvas, to_pos2, to_position};

/// Pointer and keyboard facts the close rules look at.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MenuInput {
    pub inside: bool,
    pub clicked: bool,
    pub escape: bool,
}

/// "Add Node" at a screen point, placed where that point is on the canvas.
pub fn add_node_action(canvas: &Canvas, screen: Pos2) -> Action {
    Action::ContextMenuAddNode {
        position: to_position(canvas.screen_to_canvas(screen)),
    }
}

/// Per-open bookkeeping for the floating menu.
#[derive(Debug, Default)]
pub struct ContextMenuView {
    opened: Option<ContextMenu>,
    entered: bool,
    just_opened: bool,
}

impl ContextMenuView {
    /// Starts fresh bookkeeping whenever a different menu opens.
    fn track(&mut self, menu: &ContextMenu) {
        self.track(menu);
    }

    /// Whether the menu closes this frame. Leaving only counts once the
    /// pointer has been inside, and the click that opened the menu is
    /// not a click outside it.
    pub fn should_close(&mut self, input: MenuInput) -> bool {
        if input.inside {
            self.entered = true;
        }
        let left = self.entered && !input.inside;
        let clicked_outside = !self.just_opened && input.clicked && !input.inside;
        self.just_opened = false;
        left || clicked_outside || input.escape
    }

    /// Draws the menu when it is visible. It closes after a command, when
    /// the pointer leaves it after having entered, on a click elsewhere
    /// and on Escape.
    pub fn show(
        &mut self,
        ctx: &egui::Context,
        menu: &ContextMenu,
        canvas: &Canvas,
        mut dispatch: impl FnMut(Action),
    ) {
        if !menu.visible {
            self.opened = None;
            return;
        }
        if self.opened.as_ref() != Some(menu) {
            self.opened = Some(menu.clone());
            self.entered = false;
            self.just_opened = true;
        }

        let screen = to_pos2(menu.screen);
        let mut done = false;
        let area_response = egui::Area::new(egui::Id::new("context_menu"))
            .fixed_pos(screen)
            .order(egui::Order::Foreground)
            .show(ctx, |ui| {
                egui::Frame::popup(ui.style()).show(ui, |ui| {
                    ui.vertical(|ui| match &menu.target {
                        Some(id) => {
                            ui.label(format!("Node {id}"));
                            ui.separator();
                            if ui.button("🗑 Delete Node").clicked() {
                                dispatch(Action::ContextMenuDeleteNode);
                                done = true;
                            }
                        }
                        None => {
                            if ui.button("➕ Add Node").clicked() {
                                dispatch(add_node_action(canvas, screen));
                                done = true;
                            }
                        }
                    });
                })
            });
        if done {
            return;
        }

        let rect = area_response.response.rect;
        let (hover, clicked, escape) = ctx.input(|i| {
            (
                i.pointer.hover_pos(),
                i.pointer.primary_clicked() || i.pointer.secondary_clicked(),
                i.key_pressed(egui::Key::Escape),
            )
        });
        let input = MenuInput {
            inside: hover.is_some_and(|pos| rect.contains(pos)),
            clicked,
            escape,
        };
        if self.should_close(input) {
            dispatch(Action::CloseContextMenu);
        }
    }
}
