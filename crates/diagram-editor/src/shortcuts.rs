use diagram::{Action, EdgeChange, Selection};
use eframe::egui;

/// Editing keys pressed this frame.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Keys {
    pub undo: bool,
    pub redo: bool,
    pub delete: bool,
}

impl Keys {
    pub fn read(i: &egui::InputState) -> Self {
        let command = i.modifiers.command;
        let shift = i.modifiers.shift;
        Self {
            undo: command && !shift && i.key_pressed(egui::Key::Z),
            redo: command
                && ((shift && i.key_pressed(egui::Key::Z))
                    || i.key_pressed(egui::Key::Y)),
            delete: i.key_pressed(egui::Key::Delete)
                || i.key_pressed(egui::Key::Backspace),
        }
    }
}

/// Actions for the keys pressed, given what is selected.
pub fn actions(keys: Keys, selection: &Selection) -> Vec<Action> {
    let mut actions = Vec::new();
    if keys.undo {
        actions.push(Action::Undo);
    } else if keys.redo {
        actions.push(Action::Redo);
    }
    if keys.delete {
        match selection {
            Selection::None => {}
            Selection::Node(_) => actions.push(Action::DeleteNode { id: None }),
            Selection::Edge(id) => actions.push(Action::ApplyEdgeChanges {
                changes: vec![EdgeChange::Remove { id: id.clone() }],
            }),
        }
    }
    actions
}

/// Undo/redo and delete keys. Ignored while a text field has focus.
pub fn handle(
    ctx: &egui::Context,
    selection: &Selection,
    mut dispatch: impl FnMut(Action),
) {
    if ctx.wants_keyboard_input() {
        return;
    }
    let keys = ctx.input(Keys::read);
    for action in actions(keys, selection) {
        dispatch(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram::{EdgeId, NodeId};

    #[test]
    fn test_undo_takes_precedence_over_redo() {
        let keys = Keys {
            undo: true,
            redo: true,
            delete: false,
        };
        assert_eq!(actions(keys, &Selection::None), vec![Action::Undo]);
    }

    #[test]
    fn test_delete_follows_selection() {
        let keys = Keys {
            delete: true,
            ..Keys::default()
        };
        assert!(actions(keys, &Selection::None).is_empty());
        assert_eq!(
            actions(keys, &Selection::Node(NodeId::new("n1"))),
            vec![Action::DeleteNode { id: None }]
        );
        assert_eq!(
            actions(keys, &Selection::Edge(EdgeId::new("n1-n2"))),
            vec![Action::ApplyEdgeChanges {
                changes: vec![EdgeChange::Remove {
                    id: EdgeId::new("n1-n2")
                }],
            }]
        );
    }
}
