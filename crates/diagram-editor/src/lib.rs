//! egui front end for the `diagram` crate: a canvas built on
//! `egui_graphs`, a toolbar, inspectors and a context menu, all feeding
//! actions into one store.

mod app;
pub mod canvas;
pub mod colors;
pub mod config;
pub mod connector_shape;
pub mod context_menu;
pub mod inspector;
pub mod layout_pinned;
pub mod logging;
pub mod node_shape;
pub mod shortcuts;
pub mod state;
pub mod toolbar;

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

pub use app::DiagramEditor;
