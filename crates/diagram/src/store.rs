use crate::changes::{EdgeChange, NodeChange};
use crate::connection::Connection;
use crate::graph::{Edge, EdgeId, Node, NodeId, Position, Snapshot, initial_snapshot};
use crate::history::{Commit, History};
use crate::style::{EdgeStylePatch, NodeStylePatch};
use crate::ConnectError;

/// Where the toolbar's "Add Node" drops new nodes.
pub const TOOLBAR_INSERT_POSITION: Position = Position::new(0.0, -100.0);

/// At most one node or one edge is selected. Selection lives beside the
/// history and is never undone.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
    #[default]
    None,
    Node(NodeId),
    Edge(EdgeId),
}

impl Selection {
    pub fn node(&self) -> Option<&NodeId> {
        match self {
            Selection::Node(id) => Some(id),
            _ => None,
        }
    }

    pub fn edge(&self) -> Option<&EdgeId> {
        match self {
            Selection::Edge(id) => Some(id),
            _ => None,
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Selection::None
    }
}

/// Transient state of the right-click menu. `screen` is in screen
/// coordinates; the canvas translates it when a node is added there.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ContextMenu {
    pub visible: bool,
    pub screen: Position,
    pub target: Option<NodeId>,
}

pub struct Store {
    history: History<Snapshot>,
    pub selection: Selection,
    pub context_menu: ContextMenu,
    /// Node whose label is being edited inline on the canvas.
    pub editing_label: Option<NodeId>,
}

impl Default for Store {
    fn default() -> Self {
        Self::new(initial_snapshot())
    }
}

impl Store {
    pub fn new(initial: Snapshot) -> Self {
        Self {
            history: History::new(initial),
            selection: Selection::None,
            context_menu: ContextMenu::default(),
            editing_label: None,
        }
    }

    /// The current graph, including any pending preview.
    pub fn snapshot(&self) -> &Snapshot {
        self.history.present()
    }

    pub fn history(&self) -> &History<Snapshot> {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn can_delete(&self) -> bool {
        self.selected_node().is_some()
    }

    pub fn selected_node(&self) -> Option<&Node> {
        self.selection.node().and_then(|id| self.snapshot().node(id))
    }

    pub fn selected_edge(&self) -> Option<&Edge> {
        self.selection.edge().and_then(|id| self.snapshot().edge(id))
    }

    // ------------------------------------------------------------------
    // History
    // ------------------------------------------------------------------

    /// Replaces the current snapshot. A recorded commit identical to the
    /// last entry only drops the pending preview.
    pub fn commit(&mut self, next: Snapshot, mode: Commit) {
        match mode {
            Commit::Record if next == *self.history.committed() => {
                self.history.discard_preview();
            }
            Commit::Preview if next == *self.history.present() => {}
            _ => {
                log::debug!(
                    "commit {:?}: {} nodes, {} edges",
                    mode,
                    next.nodes.len(),
                    next.edges.len()
                );
                self.history.commit(next, mode);
            }
        }
        self.prune_selection();
    }

    /// Seals a pending preview into one undo step.
    pub fn commit_preview(&mut self) {
        if self.history.is_previewing() {
            let live = self.snapshot().clone();
            self.commit(live, Commit::Record);
        }
    }

    /// A pending preview is sealed first, so undo reverts exactly that
    /// edit and redo can bring it back.
    pub fn undo(&mut self) {
        self.commit_preview();
        if self.history.can_undo() {
            log::debug!("undo to entry {}", self.history.pointer() - 1);
        }
        self.history.undo();
        self.prune_selection();
    }

    pub fn redo(&mut self) {
        self.commit_preview();
        if self.history.can_redo() {
            log::debug!("redo to entry {}", self.history.pointer() + 1);
        }
        self.history.redo();
        self.prune_selection();
    }

    /// Forgets references to entities the present snapshot no longer has.
    fn prune_selection(&mut self) {
        let snapshot = self.history.present();
        let stale = match &self.selection {
            Selection::None => false,
            Selection::Node(id) => !snapshot.contains_node(id),
            Selection::Edge(id) => !snapshot.contains_edge(id),
        };
        if stale {
            self.selection = Selection::None;
        }
        if let Some(id) = &self.editing_label
            && !snapshot.contains_node(id)
        {
            self.editing_label = None;
        }
        if let Some(id) = &self.context_menu.target
            && !snapshot.contains_node(id)
        {
            self.context_menu = ContextMenu::default();
        }
    }

    // ------------------------------------------------------------------
    // Nodes
    // ------------------------------------------------------------------

    /// Inserts a default node at `position` and returns its id.
    pub fn add_node(&mut self, position: Position) -> NodeId {
        self.commit_preview();
        let id = self.snapshot().next_node_id();
        let next = self.snapshot().with_node(Node::new(id.clone(), position));
        self.commit(next, Commit::Record);
        id
    }

    /// Deletes `id`, or the selected node when `id` is `None`, together
    /// with its edges.
    pub fn delete_node(&mut self, id: Option<&NodeId>) {
        let Some(id) = id.or(self.selection.node()).cloned() else {
            log::warn!("delete requested with no node selected");
            return;
        };
        if !self.snapshot().contains_node(&id) {
            log::warn!("delete requested for unknown node {id}");
            return;
        }
        self.commit_preview();
        let next = self.snapshot().without_node(&id);
        self.commit(next, Commit::Record);
    }

    pub fn rename_node(&mut self, id: &NodeId, label: String, mode: Commit) {
        let next = self
            .snapshot()
            .with_node_style(id, &NodeStylePatch::label(label));
        self.commit(next, mode);
    }

    pub fn update_selected_node_style(
        &mut self,
        patch: &NodeStylePatch,
        mode: Commit,
    ) {
        let Some(id) = self.selection.node().cloned() else {
            return;
        };
        let next = self.snapshot().with_node_style(&id, patch);
        self.commit(next, mode);
    }

    /// Applies a batch of canvas changes. Moves and resizes still in
    /// progress only preview; a final one or any removal records one
    /// entry for the whole batch.
    pub fn apply_node_changes(&mut self, changes: Vec<NodeChange>) {
        if changes.iter().any(|c| matches!(c, NodeChange::Remove { .. })) {
            self.commit_preview();
        }
        let mut next: Option<Snapshot> = None;
        let mut mode = Commit::Preview;
        for change in changes {
            match change {
                NodeChange::Position {
                    id,
                    position,
                    dragging,
                } => {
                    let base = next.as_ref().unwrap_or(self.snapshot());
                    next = Some(base.with_positions([(&id, position)]));
                    if !dragging {
                        mode = Commit::Record;
                    }
                }
                NodeChange::Dimensions { id, size, resizing } => {
                    let base = next.as_ref().unwrap_or(self.snapshot());
                    next = Some(base.with_size(&id, size));
                    if !resizing {
                        mode = Commit::Record;
                    }
                }
                NodeChange::Select { id, selected } => {
                    if selected {
                        self.selection = Selection::Node(id);
                    } else if self.selection.node() == Some(&id) {
                        self.selection = Selection::None;
                    }
                }
                NodeChange::Remove { id } => {
                    let base = next.as_ref().unwrap_or(self.snapshot());
                    next = Some(base.without_node(&id));
                    mode = Commit::Record;
                }
            }
        }
        if let Some(next) = next {
            self.commit(next, mode);
        }
    }

    // ------------------------------------------------------------------
    // Edges
    // ------------------------------------------------------------------

    pub fn connect(
        &mut self,
        connection: &Connection,
    ) -> Result<(), ConnectError> {
        let next = self.snapshot().with_connection(connection)?;
        self.commit_preview();
        self.commit(next, Commit::Record);
        Ok(())
    }

    pub fn update_selected_edge_style(
        &mut self,
        patch: &EdgeStylePatch,
        mode: Commit,
    ) {
        let Some(id) = self.selection.edge().cloned() else {
            return;
        };
        let next = self.snapshot().with_edge_style(&id, patch);
        self.commit(next, mode);
    }

    pub fn apply_edge_changes(&mut self, changes: Vec<EdgeChange>) {
        if changes.iter().any(|c| matches!(c, EdgeChange::Remove { .. })) {
            self.commit_preview();
        }
        let mut next: Option<Snapshot> = None;
        for change in changes {
            match change {
                EdgeChange::Select { id, selected } => {
                    if selected {
                        self.selection = Selection::Edge(id);
                    } else if self.selection.edge() == Some(&id) {
                        self.selection = Selection::None;
                    }
                }
                EdgeChange::Remove { id } => {
                    let base = next.as_ref().unwrap_or(self.snapshot());
                    next = Some(base.without_edge(&id));
                }
            }
        }
        if let Some(next) = next {
            self.commit(next, Commit::Record);
        }
    }

    // ------------------------------------------------------------------
    // Context menu
    // ------------------------------------------------------------------

    /// Opens the menu at `screen`. Right-clicking a node also selects it.
    pub fn open_context_menu(
        &mut self,
        screen: Position,
        target: Option<NodeId>,
    ) {
        if let Some(id) = &target {
            self.selection = Selection::Node(id.clone());
        }
        self.context_menu = ContextMenu {
            visible: true,
            screen,
            target,
        };
    }

    pub fn close_context_menu(&mut self) {
        self.context_menu = ContextMenu::default();
    }
}
