//! Observer wrapper around [`AppState`] for presentation layers.

use crate::{update, AppState, AppViewModel, Effect, Msg};

/// Called with the fresh view model after every state change.
pub type Observer = Box<dyn FnMut(&AppViewModel) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Owns the state machine and notifies subscribers when it changes.
///
/// Effects are returned from [`Store::dispatch`] rather than executed, so the
/// owner decides how IO happens.
pub struct Store {
    state: AppState,
    observers: Vec<(SubscriptionId, Observer)>,
    next_subscription: u64,
}

impl Store {
    pub fn new(state: AppState) -> Self {
        Self {
            state,
            observers: Vec::new(),
            next_subscription: 0,
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    /// Registers `observer` and immediately calls it with the current view.
    pub fn subscribe(&mut self, mut observer: Observer) -> SubscriptionId {
        observer(&self.state.view());
        self.next_subscription += 1;
        let id = SubscriptionId(self.next_subscription);
        self.observers.push((id, observer));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.observers.len();
        self.observers.retain(|(existing, _)| *existing != id);
        self.observers.len() != before
    }

    pub fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        if was_dirty {
            let view = self.state.view();
            for (_, observer) in &mut self.observers {
                observer(&view);
            }
        }
        effects
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new(AppState::new())
    }
}

impl std::fmt::Debug for Store {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("observers", &self.observers.len())
            .finish()
    }
}
