use diagram::actions::{self, Action};
use diagram::effects::{self, Effect};
use diagram::store::Store;

/// The store plus the queues UI code writes into during a frame.
pub struct State {
    pub store: Store,
    action_queue: Vec<Action>,
    effect_queue: Vec<Effect>,
}

impl State {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            action_queue: Vec::new(),
            effect_queue: Vec::new(),
        }
    }

    pub fn dispatch(&mut self, action: Action) {
        self.action_queue.push(action);
    }

    pub fn has_pending_actions(&self) -> bool {
        !self.action_queue.is_empty()
    }

    pub fn flush_actions(&mut self) {
        let actions = std::mem::take(&mut self.action_queue);
        for action in actions {
            let mut effects = actions::update(&mut self.store, action);
            self.effect_queue.append(&mut effects);
        }
    }

    pub fn flush_effects(&mut self) {
        let effects = std::mem::take(&mut self.effect_queue);
        for effect in effects {
            effects::run(&self.store, effect);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diagram::Position;

    #[test]
    fn test_actions_wait_for_flush() {
        let mut state = State::new(Store::default());
        state.dispatch(Action::AddNode);
        state.dispatch(Action::AddNodeAt {
            position: Position::new(1.0, 1.0),
        });
        assert_eq!(state.store.snapshot().nodes.len(), 2, "nothing applied yet");
        assert!(state.has_pending_actions());

        state.flush_actions();
        assert_eq!(state.store.snapshot().nodes.len(), 4);
        assert!(!state.has_pending_actions());
        state.flush_effects();
    }

    #[test]
    fn test_flush_applies_in_dispatch_order() {
        let mut state = State::new(Store::default());
        state.dispatch(Action::AddNode);
        state.dispatch(Action::Undo);
        state.dispatch(Action::Redo);
        state.flush_actions();
        assert_eq!(state.store.snapshot().nodes.len(), 3);
        assert!(!state.store.can_redo());
    }
}
