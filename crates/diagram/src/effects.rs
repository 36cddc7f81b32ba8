use crate::store::Store;

/// Deferred work produced by the reducer and run after the action queue
/// is flushed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Dump the present snapshot to the log.
    LogSnapshot,
    /// Ask for an automatic layout suggestion.
    Suggest,
}

/// Execute a single effect against the store
pub fn run(store: &Store, effect: Effect) {
    match effect {
        Effect::LogSnapshot => {
            if !log::log_enabled!(log::Level::Trace) {
                return;
            }
            let snapshot = store.snapshot();
            match serde_json::to_string(&snapshot.nodes) {
                Ok(json) => log::trace!("nodes: {json}"),
                Err(e) => log::warn!("could not serialize nodes: {e}"),
            }
            match serde_json::to_string(&snapshot.edges) {
                Ok(json) => log::trace!("edges: {json}"),
                Err(e) => log::warn!("could not serialize edges: {e}"),
            }
        }
        Effect::Suggest => {
            let snapshot = store.snapshot();
            log::info!(
                "layout suggestion requested for {} nodes and {} edges; \
                 no suggestion service is configured",
                snapshot.nodes.len(),
                snapshot.edges.len()
            );
        }
    }
}
