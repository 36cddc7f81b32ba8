// Canvas adapter - keeps an egui_graphs display graph in step with the
// store and turns what happens on it into actions

use diagram::{
    Action, Commit, Connection, Edge, EdgeChange, EdgeId, NODE_MIN_SIZE, Node,
    NodeChange, NodeId, Port, Position, Selection, Side, Size, Snapshot, Store,
};
use eframe::egui::{self, Pos2, Rect, Vec2};
use egui_graphs::{
    Graph, GraphView, MetadataFrame, SettingsInteraction, SettingsNavigation,
    SettingsStyle,
};
use petgraph::Directed;
use petgraph::graph::DefaultIx;
use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use std::collections::{HashMap, HashSet};

use crate::config::EditorConfig;
use crate::connector_shape::ConnectorShape;
use crate::layout_pinned::{LayoutPinned, LayoutStatePinned};
use crate::node_shape::{EditableNodeShape, resize_grip};

// UI Constants
const DRAG_THRESHOLD: f32 = 2.0;
const CONNECT_PREVIEW_STROKE_WIDTH: f32 = 2.0;
const CONNECT_PREVIEW_COLOR: egui::Color32 =
    egui::Color32::from_rgb(100, 100, 255);

pub type DiagramGraph = Graph<
    Node,
    Edge,
    Directed,
    DefaultIx,
    EditableNodeShape,
    ConnectorShape,
>;

pub type DiagramGraphView<'a> = GraphView<
    'a,
    Node,
    Edge,
    Directed,
    DefaultIx,
    EditableNodeShape,
    ConnectorShape,
    LayoutStatePinned,
    LayoutPinned,
>;

pub fn to_pos2(p: Position) -> Pos2 {
    Pos2::new(p.x, p.y)
}

pub fn to_position(p: Pos2) -> Position {
    Position::new(p.x, p.y)
}

/// What a primary drag on a node does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditMode {
    /// Drag moves nodes.
    Move,
    /// Drag from one node to another draws a connector.
    Connect,
}

impl EditMode {
    /// Connect mode lasts while the command key is held.
    pub fn from_modifiers(modifiers: &egui::Modifiers) -> Self {
        if modifiers.command {
            EditMode::Connect
        } else {
            EditMode::Move
        }
    }
}

#[derive(Debug, Clone)]
struct ResizeDrag {
    id: NodeId,
    start: Vec2,
    travel: Vec2,
}

/// Size after the bottom-right grip moved `travel` canvas units from a
/// box of `start`. Nodes stay centered on their position, so the box
/// grows by twice the travel and the corner follows the pointer.
pub fn resized(start: Vec2, travel: Vec2) -> Size {
    Size::new(start.x + 2.0 * travel.x, start.y + 2.0 * travel.y)
        .at_least(NODE_MIN_SIZE)
}

#[derive(Debug, Clone, Copy)]
struct ConnectDrag {
    source: NodeIndex,
    press: Pos2,
    started: bool,
}

/// Actions that move the selection from `current` to `next`: the old
/// entity is deselected before the new one is selected.
pub fn selection_actions(current: &Selection, next: &Selection) -> Vec<Action> {
    if current == next {
        return vec![];
    }
    let mut actions = Vec::with_capacity(2);
    match current {
        Selection::None => {}
        Selection::Node(id) => actions.push(Action::ApplyNodeChanges {
            changes: vec![NodeChange::Select {
                id: id.clone(),
                selected: false,
            }],
        }),
        Selection::Edge(id) => actions.push(Action::ApplyEdgeChanges {
            changes: vec![EdgeChange::Select {
                id: id.clone(),
                selected: false,
            }],
        }),
    }
    match next {
        Selection::None => {}
        Selection::Node(id) => actions.push(Action::ApplyNodeChanges {
            changes: vec![NodeChange::Select {
                id: id.clone(),
                selected: true,
            }],
        }),
        Selection::Edge(id) => actions.push(Action::ApplyEdgeChanges {
            changes: vec![EdgeChange::Select {
                id: id.clone(),
                selected: true,
            }],
        }),
    }
    actions
}

/// Resolves the library's selection flags into a single selection. A
/// newly flagged entity wins over the one already selected; nodes win
/// over edges.
pub fn resolve_selection(
    current: &Selection,
    nodes: &[NodeId],
    edges: &[EdgeId],
) -> Selection {
    if let Some(id) = nodes.iter().find(|id| current.node() != Some(*id)) {
        return Selection::Node(id.clone());
    }
    if let Some(id) = edges.iter().find(|id| current.edge() != Some(*id)) {
        return Selection::Edge(id.clone());
    }
    if let Some(id) = nodes.first() {
        return Selection::Node(id.clone());
    }
    if let Some(id) = edges.first() {
        return Selection::Edge(id.clone());
    }
    Selection::None
}

pub struct Canvas {
    graph: DiagramGraph,
    nodes: HashMap<NodeId, NodeIndex>,
    edges: HashMap<EdgeId, EdgeIndex>,
    seen_version: Option<u64>,
    /// Nodes the library reported as dragged on the previous frame.
    dragging: HashSet<NodeId>,
    connect: Option<ConnectDrag>,
    resize: Option<ResizeDrag>,
    mode: EditMode,
    zoom_and_pan: bool,
    meta: Option<MetadataFrame>,
    label_edit: Option<(NodeId, String)>,
}

impl Canvas {
    pub fn new(config: &EditorConfig) -> Self {
        Self {
            graph: DiagramGraph::from(&StableGraph::<Node, Edge>::new()),
            nodes: HashMap::new(),
            edges: HashMap::new(),
            seen_version: None,
            dragging: HashSet::new(),
            connect: None,
            resize: None,
            mode: EditMode::Move,
            zoom_and_pan: config.zoom_and_pan,
            meta: None,
            label_edit: None,
        }
    }

    pub fn mode(&self) -> EditMode {
        self.mode
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    /// Converts a screen position using the transform of the last frame.
    pub fn screen_to_canvas(&self, pos: Pos2) -> Pos2 {
        match &self.meta {
            Some(meta) => meta.screen_to_canvas_pos(pos),
            None => pos,
        }
    }

    pub fn canvas_to_screen(&self, pos: Pos2) -> Pos2 {
        match &self.meta {
            Some(meta) => meta.canvas_to_screen_pos(pos),
            None => pos,
        }
    }

    /// Screen pixels per canvas unit.
    fn zoom(&self) -> f32 {
        self.meta
            .as_ref()
            .map_or(1.0, |meta| meta.canvas_to_screen_size(1.0))
    }

    // ------------------------------------------------------------------
    // Store -> display
    // ------------------------------------------------------------------

    /// Brings the display graph in line with the present snapshot. Runs
    /// only when the history version moved, and updates in place so a
    /// drag in progress keeps its state.
    pub fn reconcile(&mut self, store: &Store) {
        let version = store.history().version();
        if self.seen_version == Some(version) {
            return;
        }
        let snapshot = store.snapshot();
        self.remove_stale(snapshot);
        for node in &snapshot.nodes {
            self.upsert_node(node);
        }
        for edge in &snapshot.edges {
            self.upsert_edge(edge);
        }
        self.seen_version = Some(version);
        log::trace!(
            "reconciled display graph to version {version}: {} nodes, {} edges",
            self.nodes.len(),
            self.edges.len()
        );
    }

    fn remove_stale(&mut self, snapshot: &Snapshot) {
        let stale_edges: Vec<EdgeId> = self
            .edges
            .keys()
            .filter(|id| !snapshot.contains_edge(id))
            .cloned()
            .collect();
        for id in stale_edges {
            if let Some(idx) = self.edges.remove(&id) {
                self.graph.remove_edge(idx);
            }
        }
        let stale_nodes: Vec<NodeId> = self
            .nodes
            .keys()
            .filter(|id| !snapshot.contains_node(id))
            .cloned()
            .collect();
        for id in stale_nodes {
            if let Some(idx) = self.nodes.remove(&id) {
                self.graph.remove_node(idx);
            }
            self.dragging.remove(&id);
        }
    }

    fn upsert_node(&mut self, node: &Node) {
        let idx = match self.nodes.get(&node.id) {
            Some(idx) => *idx,
            None => {
                let idx = self.graph.add_node(node.clone());
                self.nodes.insert(node.id.clone(), idx);
                if let Some(display) = self.graph.node_mut(idx) {
                    display.set_location(to_pos2(node.position));
                    display.set_label(node.style.label.clone());
                }
                return;
            }
        };
        if let Some(display) = self.graph.node_mut(idx) {
            if display.payload() == node {
                return;
            }
            *display.payload_mut() = node.clone();
            let target = to_pos2(node.position);
            if !display.dragged() && display.location() != target {
                display.set_location(target);
            }
            // Setting the label refreshes the display shape.
            display.set_label(node.style.label.clone());
        }
    }

    fn upsert_edge(&mut self, edge: &Edge) {
        if let Some(idx) = self.edges.get(&edge.id).copied() {
            let same_ends = self.graph.edge(idx).is_some_and(|e| {
                e.payload().source == edge.source
                    && e.payload().target == edge.target
            });
            if same_ends {
                if let Some(display) = self.graph.edge_mut(idx)
                    && display.payload() != edge
                {
                    *display.payload_mut() = edge.clone();
                    display.set_label(String::new());
                }
                return;
            }
            self.graph.remove_edge(idx);
            self.edges.remove(&edge.id);
        }
        let (Some(source), Some(target)) =
            (self.nodes.get(&edge.source), self.nodes.get(&edge.target))
        else {
            log::warn!("edge {} references a missing node", edge.id);
            return;
        };
        let idx = self.graph.add_edge_with_label(
            *source,
            *target,
            edge.clone(),
            String::new(),
        );
        self.edges.insert(edge.id.clone(), idx);
    }

    /// Mirrors the store's selection onto the library's selection flags.
    fn push_selection(&mut self, selection: &Selection) {
        for (id, idx) in &self.nodes {
            let want = selection.node() == Some(id);
            if let Some(node) = self.graph.node_mut(*idx)
                && node.selected() != want
            {
                node.set_selected(want);
            }
        }
        for (id, idx) in &self.edges {
            let want = selection.edge() == Some(id);
            if let Some(edge) = self.graph.edge_mut(*idx)
                && edge.selected() != want
            {
                edge.set_selected(want);
            }
        }
    }

    // ------------------------------------------------------------------
    // Display -> actions
    // ------------------------------------------------------------------

    fn flagged_selection(&self) -> (Vec<NodeId>, Vec<EdgeId>) {
        let nodes = self
            .graph
            .nodes_iter()
            .filter(|(_, n)| n.selected())
            .map(|(_, n)| n.payload().id.clone())
            .collect();
        let edges = self
            .graph
            .edges_iter()
            .filter(|(_, e)| e.selected())
            .map(|(_, e)| e.payload().id.clone())
            .collect();
        (nodes, edges)
    }

    /// Position changes for nodes the library moved this frame. A node
    /// that stops being dragged gets one final, non-dragging change.
    fn collect_moves(&mut self) -> Vec<NodeChange> {
        let mut changes = Vec::new();
        for (_, node) in self.graph.nodes_iter() {
            let id = &node.payload().id;
            let location = node.location();
            if node.dragged() {
                self.dragging.insert(id.clone());
                if location != to_pos2(node.payload().position) {
                    changes.push(NodeChange::Position {
                        id: id.clone(),
                        position: to_position(location),
                        dragging: true,
                    });
                }
            } else if self.dragging.remove(id) {
                changes.push(NodeChange::Position {
                    id: id.clone(),
                    position: to_position(location),
                    dragging: false,
                });
            }
        }
        changes
    }

    fn node_id(&self, idx: NodeIndex) -> Option<NodeId> {
        self.graph.node(idx).map(|n| n.payload().id.clone())
    }

    /// Side of the node's box nearest to a screen position.
    fn nearest_side(&self, idx: NodeIndex, screen: Pos2) -> Side {
        let Some(node) = self.graph.node(idx) else {
            return Side::Bottom;
        };
        let offset = self.screen_to_canvas(screen) - node.location();
        let size = node.display().size();
        Side::nearest(offset.x, offset.y, size.x, size.y)
    }

    // Drag-to-connect: press on a source node, drag to a target node,
    // release to connect. Returns the preview line while dragging.
    fn handle_connect(
        &mut self,
        pointer: &egui::PointerState,
        dispatch: &mut impl FnMut(Action),
    ) -> Option<(Pos2, Pos2)> {
        if pointer.primary_pressed()
            && let Some(hovered) = self.graph.hovered_node()
            && let Some(press) = pointer.interact_pos()
        {
            self.connect = Some(ConnectDrag {
                source: hovered,
                press,
                started: false,
            });
        }

        if pointer.primary_down()
            && let Some(drag) = self.connect.as_mut()
            && pointer.delta().length() > DRAG_THRESHOLD
        {
            drag.started = true;
        }

        let preview = match self.connect {
            Some(drag) if drag.started => {
                pointer.hover_pos().map(|to| (drag.press, to))
            }
            _ => None,
        };

        if pointer.primary_released() {
            if let Some(drag) = self.connect
                && drag.started
                && let Some(target) = self.graph.hovered_node()
                && target != drag.source
                && let Some(release) = pointer.interact_pos()
                && let (Some(source_id), Some(target_id)) =
                    (self.node_id(drag.source), self.node_id(target))
            {
                let connection = Connection::new(
                    source_id,
                    Port::source(self.nearest_side(drag.source, drag.press)),
                    target_id,
                    Port::target(self.nearest_side(target, release)),
                );
                dispatch(Action::Connect { connection });
            }
            self.connect = None;
        }

        preview
    }

    /// Grip on the selected node. Frames of the drag preview the new size;
    /// releasing the grip records it.
    fn handle_resize(
        &mut self,
        ui: &mut egui::Ui,
        store: &Store,
        dispatch: &mut impl FnMut(Action),
    ) {
        let Some(id) = store.selection.node() else {
            self.resize = None;
            return;
        };
        let Some(node) = self.nodes.get(id).and_then(|idx| self.graph.node(*idx))
        else {
            return;
        };
        let (location, size) = (node.location(), node.display().size());
        let zoom = self.zoom();
        let rect =
            Rect::from_center_size(self.canvas_to_screen(location), size * zoom);
        let response = ui.interact(
            resize_grip(rect),
            ui.id().with("resize_grip"),
            egui::Sense::drag(),
        );
        if response.hovered() || response.dragged() {
            ui.ctx().set_cursor_icon(egui::CursorIcon::ResizeNwSe);
        }
        if response.drag_started() {
            self.resize = Some(ResizeDrag {
                id: id.clone(),
                start: size,
                travel: Vec2::ZERO,
            });
        }
        let Some(drag) = self.resize.as_mut() else {
            return;
        };
        drag.travel += response.drag_delta() / zoom;
        let stopped = response.drag_stopped();
        if (response.dragged() || stopped) && drag.travel != Vec2::ZERO {
            dispatch(Action::ApplyNodeChanges {
                changes: vec![NodeChange::Dimensions {
                    id: drag.id.clone(),
                    size: resized(drag.start, drag.travel),
                    resizing: !stopped,
                }],
            });
        }
        if stopped {
            self.resize = None;
        }
    }

    fn settings_interaction(&self) -> SettingsInteraction {
        match self.mode {
            EditMode::Move => SettingsInteraction::new()
                .with_dragging_enabled(true)
                .with_node_clicking_enabled(true)
                .with_node_selection_enabled(true)
                .with_edge_clicking_enabled(true)
                .with_edge_selection_enabled(true),
            EditMode::Connect => SettingsInteraction::new()
                .with_dragging_enabled(false)
                .with_node_clicking_enabled(true)
                .with_node_selection_enabled(false)
                .with_edge_selection_enabled(false),
        }
    }

    fn settings_navigation(&self) -> SettingsNavigation {
        SettingsNavigation::new()
            .with_fit_to_screen_enabled(false)
            .with_zoom_and_pan_enabled(
                self.zoom_and_pan && self.mode == EditMode::Move,
            )
    }

    // ------------------------------------------------------------------
    // Frame
    // ------------------------------------------------------------------

    /// Draws the canvas and reports what the user did through `dispatch`.
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        store: &Store,
        mut dispatch: impl FnMut(Action),
    ) {
        self.reconcile(store);
        self.push_selection(&store.selection);

        let mode = ui.input(|i| EditMode::from_modifiers(&i.modifiers));
        if mode != self.mode {
            self.connect = None;
            self.mode = mode;
        }

        let settings_interaction = self.settings_interaction();
        let settings_navigation = self.settings_navigation();
        let settings_style = SettingsStyle::new();
        let response = ui.add(
            &mut DiagramGraphView::new(&mut self.graph)
                .with_interactions(&settings_interaction)
                .with_navigations(&settings_navigation)
                .with_styles(&settings_style),
        );
        self.meta = Some(MetadataFrame::new(None).load(ui));

        let moves = self.collect_moves();
        if !moves.is_empty() {
            dispatch(Action::ApplyNodeChanges { changes: moves });
        }

        if self.mode == EditMode::Move {
            self.handle_resize(ui, store, &mut dispatch);
            let (nodes, edges) = self.flagged_selection();
            let next = resolve_selection(&store.selection, &nodes, &edges);
            for action in selection_actions(&store.selection, &next) {
                dispatch(action);
            }
        }

        let pointer = ui.input(|i| i.pointer.clone());
        if self.mode == EditMode::Connect {
            if let Some((from, to)) = self.handle_connect(&pointer, &mut dispatch) {
                ui.painter().line_segment(
                    [from, to],
                    egui::Stroke::new(
                        CONNECT_PREVIEW_STROKE_WIDTH,
                        CONNECT_PREVIEW_COLOR,
                    ),
                );
            }
        }

        if pointer.button_double_clicked(egui::PointerButton::Primary)
            && let Some(idx) = self.graph.hovered_node()
            && let Some(id) = self.node_id(idx)
        {
            dispatch(Action::BeginLabelEdit { id });
        }

        if pointer.secondary_clicked()
            && let Some(pos) = pointer.interact_pos()
            && response.rect.contains(pos)
        {
            let target =
                self.graph.hovered_node().and_then(|idx| self.node_id(idx));
            dispatch(Action::OpenContextMenu {
                screen: to_position(pos),
                target,
            });
        }

        self.show_label_editor(ui.ctx(), store, &mut dispatch);
    }

    /// Inline text field over a node whose label is being edited.
    fn show_label_editor(
        &mut self,
        ctx: &egui::Context,
        store: &Store,
        dispatch: &mut impl FnMut(Action),
    ) {
        let Some(id) = store.editing_label.clone() else {
            self.label_edit = None;
            return;
        };
        let Some(node) = store.snapshot().node(&id) else {
            return;
        };
        let just_opened = self.label_edit.as_ref().map(|(i, _)| i) != Some(&id);
        if just_opened {
            self.label_edit = Some((id.clone(), node.style.label.clone()));
        }
        let Some(idx) = self.nodes.get(&id).copied() else {
            return;
        };
        let size = self
            .graph
            .node(idx)
            .map(|n| n.display().size())
            .unwrap_or_default();
        let top_left = self.canvas_to_screen(to_pos2(node.position) - size / 2.0);
        let Some((_, buffer)) = self.label_edit.as_mut() else {
            return;
        };

        egui::Area::new(egui::Id::new("inline_label_editor"))
            .fixed_pos(top_left)
            .show(ctx, |ui| {
                let response = ui.add(
                    egui::TextEdit::singleline(buffer)
                        .desired_width(size.x.max(80.0)),
                );
                if just_opened {
                    response.request_focus();
                }
                if response.changed() {
                    dispatch(Action::RenameNode {
                        id: id.clone(),
                        label: buffer.clone(),
                        commit: Commit::Preview,
                    });
                }
                if response.lost_focus() {
                    dispatch(Action::EndLabelEdit);
                }
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(id: &str) -> NodeId {
        NodeId::new(id)
    }

    fn e(id: &str) -> EdgeId {
        EdgeId::new(id)
    }

    #[test]
    fn test_newly_flagged_node_wins() {
        let current = Selection::Node(n("n1"));
        let next = resolve_selection(&current, &[n("n1"), n("n2")], &[]);
        assert_eq!(next, Selection::Node(n("n2")));
    }

    #[test]
    fn test_clicking_an_edge_moves_selection_off_a_node() {
        let current = Selection::Node(n("n1"));
        let next = resolve_selection(&current, &[n("n1")], &[e("n1-n2")]);
        assert_eq!(next, Selection::Edge(e("n1-n2")));
    }

    #[test]
    fn test_unchanged_flags_keep_selection() {
        let current = Selection::Edge(e("n1-n2"));
        assert_eq!(resolve_selection(&current, &[], &[e("n1-n2")]), current);
        assert_eq!(resolve_selection(&current, &[], &[]), Selection::None);
    }

    #[test]
    fn test_selection_actions_deselect_before_select() {
        let actions = selection_actions(
            &Selection::Edge(e("n1-n2")),
            &Selection::Node(n("n2")),
        );
        assert_eq!(actions.len(), 2);
        assert!(matches!(actions[0], Action::ApplyEdgeChanges { .. }));
        assert!(matches!(actions[1], Action::ApplyNodeChanges { .. }));

        let mut store = Store::default();
        store.selection = Selection::Edge(e("n1-n2"));
        for action in actions {
            diagram::update(&mut store, action);
        }
        assert_eq!(store.selection, Selection::Node(n("n2")));

        assert!(selection_actions(&Selection::None, &Selection::None).is_empty());
    }

    #[test]
    fn test_screen_to_canvas_follows_last_frame_view() {
        let mut canvas = Canvas::new(&EditorConfig::default());
        let screen = Pos2::new(110.0, 220.0);
        assert_eq!(canvas.screen_to_canvas(screen), screen, "no frame drawn yet");

        let mut meta = MetadataFrame::new(None);
        meta.zoom = 2.0;
        meta.pan = Vec2::new(10.0, 20.0);
        canvas.meta = Some(meta);
        assert_eq!(canvas.screen_to_canvas(screen), Pos2::new(50.0, 100.0));
        assert_eq!(canvas.canvas_to_screen(Pos2::new(50.0, 100.0)), screen);
    }

    #[test]
    fn test_resize_follows_pointer_and_respects_minimum() {
        let start = Vec2::new(150.0, 40.0);
        assert_eq!(resized(start, Vec2::new(10.0, 20.0)), Size::new(170.0, 80.0));
        assert_eq!(resized(start, Vec2::new(-50.0, -50.0)), NODE_MIN_SIZE);
    }

    #[test]
    fn test_command_key_switches_to_connect() {
        let mut modifiers = egui::Modifiers::default();
        assert_eq!(EditMode::from_modifiers(&modifiers), EditMode::Move);
        modifiers.command = true;
        assert_eq!(EditMode::from_modifiers(&modifiers), EditMode::Connect);
    }
}
