use diagram::{
    Action, Commit, DashPattern, EdgeChange, EdgeId, EdgeStylePatch, Node,
    NodeChange, NodeId, NodeStylePatch, Position, Selection, Snapshot, Store,
    update,
};

fn single_node() -> Snapshot {
    Snapshot::new(
        vec![Node::new(NodeId::new("n1"), Position::new(0.0, 0.0))],
        vec![],
    )
}

#[test]
fn add_then_delete_then_undo_twice() {
    let initial = single_node();
    let mut store = Store::new(initial.clone());

    update(
        &mut store,
        Action::AddNodeAt {
            position: Position::new(200.0, 200.0),
        },
    );
    let ids: Vec<&str> =
        store.snapshot().nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n1", "n2"]);

    update(
        &mut store,
        Action::DeleteNode {
            id: Some(NodeId::new("n1")),
        },
    );
    let ids: Vec<&str> =
        store.snapshot().nodes.iter().map(|n| n.id.as_str()).collect();
    assert_eq!(ids, vec!["n2"]);
    assert!(store.snapshot().edges.is_empty());

    update(&mut store, Action::Undo);
    update(&mut store, Action::Undo);
    assert_eq!(*store.snapshot(), initial);
    assert!(!store.can_undo());
    assert!(store.selection.is_empty(), "n2 vanished with the undo");
}

#[test]
fn dotted_edge_style_is_undoable() {
    let mut store = Store::default();
    let edge = EdgeId::new("n1-n2");
    update(&mut store, Action::SelectEdge { id: edge.clone() });
    update(
        &mut store,
        Action::UpdateEdgeStyle {
            patch: EdgeStylePatch::dash(DashPattern::Dotted),
            commit: Commit::Record,
        },
    );
    assert_eq!(
        store.snapshot().edge(&edge).unwrap().style.dash,
        DashPattern::Dotted
    );

    update(&mut store, Action::Undo);
    assert_eq!(
        store.snapshot().edge(&edge).unwrap().style.dash,
        DashPattern::Solid
    );
    assert_eq!(store.selection, Selection::Edge(edge), "edge still exists");
}

#[test]
fn drag_of_five_frames_undoes_in_one_step() {
    let mut store = Store::default();
    let n2 = NodeId::new("n2");
    let start = store.snapshot().node(&n2).unwrap().position;

    for frame in 1..=5 {
        update(
            &mut store,
            Action::ApplyNodeChanges {
                changes: vec![NodeChange::Position {
                    id: n2.clone(),
                    position: Position::new(frame as f32 * 4.0, 150.0),
                    dragging: true,
                }],
            },
        );
    }
    update(
        &mut store,
        Action::ApplyNodeChanges {
            changes: vec![NodeChange::Position {
                id: n2.clone(),
                position: Position::new(24.0, 150.0),
                dragging: false,
            }],
        },
    );
    assert_eq!(store.history().len(), 2);

    update(&mut store, Action::Undo);
    assert_eq!(store.snapshot().node(&n2).unwrap().position, start);

    update(&mut store, Action::Redo);
    assert_eq!(
        store.snapshot().node(&n2).unwrap().position,
        Position::new(24.0, 150.0)
    );
}

#[test]
fn new_edit_after_undo_drops_redo() {
    let mut store = Store::default();
    update(&mut store, Action::AddNode);
    update(&mut store, Action::AddNode);
    update(&mut store, Action::Undo);
    assert!(store.can_redo());

    update(
        &mut store,
        Action::ApplyEdgeChanges {
            changes: vec![EdgeChange::Remove {
                id: EdgeId::new("n1-n2"),
            }],
        },
    );
    assert!(!store.can_redo());
    assert_eq!(store.history().len(), 3);
    assert_eq!(store.snapshot().nodes.len(), 3);
    assert!(store.snapshot().edges.is_empty());
}

#[test]
fn ids_keep_growing_across_deletes_and_undo() {
    let mut store = Store::default();
    update(&mut store, Action::AddNode);
    update(
        &mut store,
        Action::DeleteNode {
            id: Some(NodeId::new("n3")),
        },
    );
    update(&mut store, Action::AddNode);
    assert!(store.snapshot().contains_node(&NodeId::new("n3")));

    update(&mut store, Action::Undo);
    update(&mut store, Action::Undo);
    update(&mut store, Action::AddNode);
    // Back at [n1, n2, n3], so the next id is n4.
    assert!(store.snapshot().contains_node(&NodeId::new("n4")));
}

#[test]
fn undo_clicked_while_typing_reverts_only_the_typed_label() {
    let mut store = Store::default();
    update(&mut store, Action::AddNode);
    update(&mut store, Action::SelectNode { id: NodeId::new("n1") });
    update(
        &mut store,
        Action::UpdateNodeStyle {
            patch: NodeStylePatch::label("Typed"),
            commit: Commit::Preview,
        },
    );

    // Same frame order as the editor: the button's action, then sealing.
    update(&mut store, Action::Undo);
    update(&mut store, Action::CommitPreview);
    assert_eq!(store.snapshot().nodes.len(), 3, "the add is not undone");
    let label = |store: &Store| {
        store
            .snapshot()
            .node(&NodeId::new("n1"))
            .map(|n| n.style.label.clone())
    };
    assert_eq!(label(&store).as_deref(), Some("empty node"));

    update(&mut store, Action::Redo);
    assert_eq!(label(&store).as_deref(), Some("Typed"));
}
