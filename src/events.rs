//! Change notifications emitted by the store after each successful mutation.
//!
//! Listeners get the slice that changed and re-fetch it from the store.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StoreEvent {
    MoodsUpdated,
    JournalUpdated,
    ChallengesUpdated,
    /// Sessions, subjects, or both (cascade deletes touch both).
    StudyUpdated,
    SettingsUpdated,
    /// Every slice was replaced.
    StoreReset,
}

impl StoreEvent {
    /// Stable event name for forwarding over a UI bridge.
    pub fn name(&self) -> &'static str {
        match self {
            StoreEvent::MoodsUpdated => "moods-updated",
            StoreEvent::JournalUpdated => "journal-updated",
            StoreEvent::ChallengesUpdated => "challenges-updated",
            StoreEvent::StudyUpdated => "study-updated",
            StoreEvent::SettingsUpdated => "settings-updated",
            StoreEvent::StoreReset => "store-reset",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StoreEvent) + Send + 'static>;

#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    listeners: Vec<(SubscriptionId, Listener)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&StoreEvent) + Send + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn emit(&mut self, event: StoreEvent) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&event);
        }
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
