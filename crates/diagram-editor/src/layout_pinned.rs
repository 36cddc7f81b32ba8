use eframe::egui;
use egui_graphs::{DisplayEdge, DisplayNode, Graph, Layout, LayoutState};
use petgraph::EdgeType;
use petgraph::graph::IndexType;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LayoutStatePinned;

impl LayoutState for LayoutStatePinned {}

/// Layout that never moves anything: node locations come from the
/// snapshot and from user drags.
#[derive(Debug, Clone, Default)]
pub struct LayoutPinned {
    state: LayoutStatePinned,
}

impl Layout<LayoutStatePinned> for LayoutPinned {
    fn from_state(state: LayoutStatePinned) -> impl Layout<LayoutStatePinned> {
        Self { state }
    }

    fn next<N, E, Ty, Ix, Dn, De>(
        &mut self,
        _g: &mut Graph<N, E, Ty, Ix, Dn, De>,
        _ui: &egui::Ui,
    ) where
        N: Clone,
        E: Clone,
        Ty: EdgeType,
        Ix: IndexType,
        Dn: DisplayNode<N, E, Ty, Ix>,
        De: DisplayEdge<N, E, Ty, Ix, Dn>,
    {
    }

    fn state(&self) -> LayoutStatePinned {
        self.state.clone()
    }
}
