#![cfg(not(target_arch = "wasm32"))]

use crate::config::EditorConfig;
use crate::{DiagramEditor, logging};

/// Entry point used by the native executable.
pub fn run() -> eframe::Result<()> {
    logging::init();
    let config = EditorConfig::load_or_default();
    let native_options = eframe::NativeOptions::default();

    eframe::run_native(
        "Diagram Editor",
        native_options,
        Box::new(|_cc| Ok(Box::new(DiagramEditor::new(config)))),
    )
}
