use diagram::{Action, Store};
use eframe::egui;

const MARGIN: f32 = 10.0;

/// Which toolbar commands are available.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolbarFlags {
    pub can_delete: bool,
    pub can_undo: bool,
    pub can_redo: bool,
}

impl ToolbarFlags {
    pub fn from_store(store: &Store) -> Self {
        Self {
            can_delete: store.can_delete(),
            can_undo: store.can_undo(),
            can_redo: store.can_redo(),
        }
    }
}

/// Floating command column in the top-left corner.
pub fn show(
    ctx: &egui::Context,
    flags: ToolbarFlags,
    mut dispatch: impl FnMut(Action),
) {
    egui::Area::new(egui::Id::new("toolbar"))
        .anchor(egui::Align2::LEFT_TOP, egui::vec2(MARGIN, MARGIN))
        .show(ctx, |ui| {
            egui::Frame::popup(ui.style()).show(ui, |ui| {
                ui.vertical(|ui| {
                    if ui.button("➕ Add Node").clicked() {
                        dispatch(Action::AddNode);
                    }
                    if ui
                        .add_enabled(flags.can_delete, egui::Button::new("🗑 Delete Node"))
                        .clicked()
                    {
                        dispatch(Action::DeleteNode { id: None });
                    }
                    if ui
                        .add_enabled(flags.can_undo, egui::Button::new("↩ Undo"))
                        .clicked()
                    {
                        dispatch(Action::Undo);
                    }
                    if ui
                        .add_enabled(flags.can_redo, egui::Button::new("↪ Redo"))
                        .clicked()
                    {
                        dispatch(Action::Redo);
                    }
                    if ui.button("AI Suggest").clicked() {
                        dispatch(Action::Suggest);
                    }
                });
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram::{NodeId, Selection};

    #[test]
    fn test_flags_follow_store() {
        let mut store = Store::default();
        assert_eq!(
            ToolbarFlags::from_store(&store),
            ToolbarFlags {
                can_delete: false,
                can_undo: false,
                can_redo: false,
            }
        );

        store.selection = Selection::Node(NodeId::new("n1"));
        diagram::update(&mut store, Action::DeleteNode { id: None });
        let flags = ToolbarFlags::from_store(&store);
        assert!(flags.can_undo);
        assert!(!flags.can_delete, "deleted node is no longer selected");

        diagram::update(&mut store, Action::Undo);
        assert!(ToolbarFlags::from_store(&store).can_redo);
    }
}
