use crate::changes::{EdgeChange, NodeChange};
use crate::connection::Connection;
use crate::effects::Effect;
use crate::graph::{EdgeId, NodeId, Position};
use crate::history::Commit;
use crate::store::{Selection, Store, TOOLBAR_INSERT_POSITION};
use crate::style::{EdgeStylePatch, NodeStylePatch};

/// Actions that can be dispatched to modify the editor state
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    // Node Actions
    /// Add a default node at the toolbar insertion point
    AddNode,
    /// Add a default node at a canvas position and select it
    AddNodeAt { position: Position },
    /// Delete a node and its edges; `None` targets the selection
    DeleteNode { id: Option<NodeId> },
    /// Change the label of any node
    RenameNode {
        id: NodeId,
        label: String,
        commit: Commit,
    },
    /// Merge a style patch into the selected node
    UpdateNodeStyle {
        patch: NodeStylePatch,
        commit: Commit,
    },
    /// Changes reported by the canvas for nodes
    ApplyNodeChanges { changes: Vec<NodeChange> },

    // Edge Actions
    /// Draw a connector between two ports
    Connect { connection: Connection },
    /// Merge a style patch into the selected edge
    UpdateEdgeStyle {
        patch: EdgeStylePatch,
        commit: Commit,
    },
    /// Changes reported by the canvas for edges
    ApplyEdgeChanges { changes: Vec<EdgeChange> },

    // History Actions
    Undo,
    Redo,
    /// Seal a pending preview into one undo step
    CommitPreview,

    // UI State Actions
    SelectNode { id: NodeId },
    SelectEdge { id: EdgeId },
    ClearSelection,
    /// Open the inline label editor on a node
    BeginLabelEdit { id: NodeId },
    EndLabelEdit,
    /// Show the context menu at a screen position
    OpenContextMenu {
        screen: Position,
        target: Option<NodeId>,
    },
    CloseContextMenu,
    /// Menu "Add Node": insert at a canvas position, then close
    ContextMenuAddNode { position: Position },
    /// Menu "Delete Node": delete the menu's target, then close
    ContextMenuDeleteNode,

    /// Toolbar "AI Suggest"
    Suggest,
}

/// Apply a single action to modify the store state
pub fn update(store: &mut Store, action: Action) -> Vec<Effect> {
    let version = store.history().version();
    let mut effects = match action {
        // Node Actions
        Action::AddNode => {
            store.add_node(TOOLBAR_INSERT_POSITION);
            vec![]
        }
        Action::AddNodeAt { position } => {
            let id = store.add_node(position);
            store.selection = Selection::Node(id);
            vec![]
        }
        Action::DeleteNode { id } => {
            store.delete_node(id.as_ref());
            vec![]
        }
        Action::RenameNode { id, label, commit } => {
            store.rename_node(&id, label, commit);
            vec![]
        }
        Action::UpdateNodeStyle { patch, commit } => {
            store.update_selected_node_style(&patch, commit);
            vec![]
        }
        Action::ApplyNodeChanges { changes } => {
            store.apply_node_changes(changes);
            vec![]
        }

        // Edge Actions
        Action::Connect { connection } => {
            if let Err(e) = store.connect(&connection) {
                log::debug!("connection rejected: {e}");
            }
            vec![]
        }
        Action::UpdateEdgeStyle { patch, commit } => {
            store.update_selected_edge_style(&patch, commit);
            vec![]
        }
        Action::ApplyEdgeChanges { changes } => {
            store.apply_edge_changes(changes);
            vec![]
        }

        // History Actions
        Action::Undo => {
            store.undo();
            vec![]
        }
        Action::Redo => {
            store.redo();
            vec![]
        }
        Action::CommitPreview => {
            store.commit_preview();
            vec![]
        }

        // UI State Actions
        Action::SelectNode { id } => {
            if store.snapshot().contains_node(&id) {
                store.selection = Selection::Node(id);
            }
            vec![]
        }
        Action::SelectEdge { id } => {
            if store.snapshot().contains_edge(&id) {
                store.selection = Selection::Edge(id);
            }
            vec![]
        }
        Action::ClearSelection => {
            store.selection = Selection::None;
            vec![]
        }
        Action::BeginLabelEdit { id } => {
            if store.snapshot().contains_node(&id) {
                store.editing_label = Some(id);
            }
            vec![]
        }
        Action::EndLabelEdit => {
            store.editing_label = None;
            store.commit_preview();
            vec![]
        }
        Action::OpenContextMenu { screen, target } => {
            store.open_context_menu(screen, target);
            vec![]
        }
        Action::CloseContextMenu => {
            store.close_context_menu();
            vec![]
        }
        Action::ContextMenuAddNode { position } => {
            let id = store.add_node(position);
            store.selection = Selection::Node(id);
            store.close_context_menu();
            vec![]
        }
        Action::ContextMenuDeleteNode => {
            let target = store.context_menu.target.take();
            if target.is_some() {
                store.delete_node(target.as_ref());
            }
            store.close_context_menu();
            vec![]
        }

        Action::Suggest => vec![Effect::Suggest],
    };
    if store.history().version() != version {
        effects.push(Effect::LogSnapshot);
    }
    effects
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::port::{Port, Side};
    use crate::style::DashPattern;

    fn n(id: &str) -> NodeId {
        NodeId::new(id)
    }

    #[test]
    fn test_toolbar_add_uses_fixed_position_and_keeps_selection() {
        let mut store = Store::default();
        store.selection = Selection::Node(n("n1"));
        update(&mut store, Action::AddNode);
        let added = store.snapshot().node(&n("n3")).unwrap();
        assert_eq!(added.position, TOOLBAR_INSERT_POSITION);
        assert_eq!(store.selection, Selection::Node(n("n1")));
    }

    #[test]
    fn test_context_menu_add_selects_and_closes() {
        let mut store = Store::default();
        update(
            &mut store,
            Action::OpenContextMenu {
                screen: Position::new(400.0, 300.0),
                target: None,
            },
        );
        assert!(store.context_menu.visible);

        update(
            &mut store,
            Action::ContextMenuAddNode {
                position: Position::new(120.0, 80.0),
            },
        );
        assert!(!store.context_menu.visible, "menu closes after a command");
        assert_eq!(store.selection, Selection::Node(n("n3")));
        assert_eq!(
            store.selected_node().unwrap().position,
            Position::new(120.0, 80.0)
        );
    }

    #[test]
    fn test_context_menu_delete_targets_the_clicked_node() {
        let mut store = Store::default();
        update(
            &mut store,
            Action::OpenContextMenu {
                screen: Position::default(),
                target: Some(n("n2")),
            },
        );
        update(&mut store, Action::ContextMenuDeleteNode);
        assert!(!store.snapshot().contains_node(&n("n2")));
        assert!(store.snapshot().edges.is_empty());
        assert!(store.selection.is_empty());
        assert_eq!(store.context_menu, Default::default());
    }

    #[test]
    fn test_context_menu_delete_without_target_only_closes() {
        let mut store = Store::default();
        store.selection = Selection::Node(n("n1"));
        update(
            &mut store,
            Action::OpenContextMenu {
                screen: Position::default(),
                target: None,
            },
        );
        update(&mut store, Action::ContextMenuDeleteNode);
        assert_eq!(store.snapshot().nodes.len(), 2, "selection is not the target");
        assert!(!store.context_menu.visible);
    }

    #[test]
    fn test_rejected_connect_leaves_history_alone() {
        let mut store = Store::default();
        let effects = update(
            &mut store,
            Action::Connect {
                connection: Connection::new(
                    "n2",
                    Port::source(Side::Top),
                    "n1",
                    Port::target(Side::Bottom),
                ),
            },
        );
        assert!(effects.is_empty());
        assert_eq!(store.history().len(), 1);
    }

    #[test]
    fn test_changes_emit_log_effect() {
        let mut store = Store::default();
        let effects = update(&mut store, Action::AddNode);
        assert_eq!(effects, vec![Effect::LogSnapshot]);

        let effects = update(&mut store, Action::ClearSelection);
        assert!(effects.is_empty(), "selection is not part of the snapshot");

        let effects = update(&mut store, Action::Suggest);
        assert_eq!(effects, vec![Effect::Suggest]);
    }

    #[test]
    fn test_edge_style_update_needs_edge_selection() {
        let mut store = Store::default();
        let dotted = Action::UpdateEdgeStyle {
            patch: EdgeStylePatch::dash(DashPattern::Dotted),
            commit: Commit::Record,
        };
        update(&mut store, dotted.clone());
        assert!(!store.can_undo(), "no edge selected");

        update(
            &mut store,
            Action::SelectEdge {
                id: EdgeId::new("n1-n2"),
            },
        );
        update(&mut store, dotted);
        assert_eq!(store.selected_edge().unwrap().style.dash, DashPattern::Dotted);
    }

    #[test]
    fn test_inline_rename_seals_on_end() {
        let mut store = Store::default();
        update(&mut store, Action::BeginLabelEdit { id: n("n1") });
        assert_eq!(store.editing_label, Some(n("n1")));
        for label in ["S", "St", "Start"] {
            update(
                &mut store,
                Action::RenameNode {
                    id: n("n1"),
                    label: label.to_string(),
                    commit: Commit::Preview,
                },
            );
        }
        update(&mut store, Action::EndLabelEdit);
        assert_eq!(store.editing_label, None);
        assert_eq!(store.history().len(), 2, "typing is one undo step");
        assert_eq!(store.snapshot().node(&n("n1")).unwrap().style.label, "Start");
    }

    #[test]
    fn test_select_unknown_entities_is_ignored() {
        let mut store = Store::default();
        update(&mut store, Action::SelectNode { id: n("n9") });
        update(
            &mut store,
            Action::SelectEdge {
                id: EdgeId::new("n9-n1"),
            },
        );
        assert!(store.selection.is_empty());
    }
}
