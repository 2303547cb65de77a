//! Application state store.
//!
//! # Responsibility
//! - Hold the current user, note/zone collections, selected date, video URL
//!   and data-loaded flag.
//! - Notify registered observers after every change.
//!
//! # Invariants
//! - Only the workspace orchestrator mutates the store (mutators are
//!   crate-private); everyone else reads or subscribes.
//! - Observers run synchronously, in registration order, after the change
//!   is applied.

use crate::model::ids::DateKey;
use crate::model::note::Note;
use crate::model::zone::Zone;
use crate::session::UserIdentity;

/// Change notification emitted by the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateChange {
    CurrentUserChanged(Option<String>),
    NotesChanged { count: usize },
    ZonesChanged { count: usize },
    SelectedDateChanged(Option<DateKey>),
    VideoUrlChanged(String),
    DataLoadedChanged(bool),
}

/// Handle returned by `subscribe`, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&StateChange)>;

#[derive(Default)]
pub struct AppState {
    current_user: Option<UserIdentity>,
    notes: Vec<Note>,
    zones: Vec<Zone>,
    selected_date: Option<DateKey>,
    video_url: String,
    data_loaded: bool,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for AppState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppState")
            .field("current_user", &self.current_user)
            .field("notes", &self.notes.len())
            .field("zones", &self.zones.len())
            .field("selected_date", &self.selected_date)
            .field("data_loaded", &self.data_loaded)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` for unknown ids.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        self.listeners.len() != before
    }

    pub fn current_user(&self) -> Option<&UserIdentity> {
        self.current_user.as_ref()
    }

    pub fn notes(&self) -> &[Note] {
        &self.notes
    }

    pub fn zones(&self) -> &[Zone] {
        &self.zones
    }

    pub fn selected_date(&self) -> Option<DateKey> {
        self.selected_date
    }

    pub fn video_url(&self) -> &str {
        &self.video_url
    }

    pub fn is_data_loaded(&self) -> bool {
        self.data_loaded
    }

    pub(crate) fn set_current_user(&mut self, user: Option<UserIdentity>) {
        let uid = user.as_ref().map(|user| user.uid.clone());
        self.current_user = user;
        self.emit(StateChange::CurrentUserChanged(uid));
    }

    pub(crate) fn set_notes(&mut self, notes: Vec<Note>) {
        self.notes = notes;
        self.emit(StateChange::NotesChanged {
            count: self.notes.len(),
        });
    }

    pub(crate) fn set_zones(&mut self, zones: Vec<Zone>) {
        self.zones = zones;
        self.emit(StateChange::ZonesChanged {
            count: self.zones.len(),
        });
    }

    /// Applies `mutate` to the note list, then notifies.
    pub(crate) fn update_notes<T>(&mut self, mutate: impl FnOnce(&mut Vec<Note>) -> T) -> T {
        let result = mutate(&mut self.notes);
        self.emit(StateChange::NotesChanged {
            count: self.notes.len(),
        });
        result
    }

    pub(crate) fn update_zones<T>(&mut self, mutate: impl FnOnce(&mut Vec<Zone>) -> T) -> T {
        let result = mutate(&mut self.zones);
        self.emit(StateChange::ZonesChanged {
            count: self.zones.len(),
        });
        result
    }

    pub(crate) fn set_selected_date(&mut self, date: Option<DateKey>) {
        self.selected_date = date;
        self.emit(StateChange::SelectedDateChanged(date));
    }

    pub(crate) fn set_video_url(&mut self, url: String) {
        self.video_url = url;
        self.emit(StateChange::VideoUrlChanged(self.video_url.clone()));
    }

    pub(crate) fn set_data_loaded(&mut self, loaded: bool) {
        self.data_loaded = loaded;
        self.emit(StateChange::DataLoadedChanged(loaded));
    }

    fn emit(&mut self, change: StateChange) {
        for (_, listener) in self.listeners.iter_mut() {
            listener(&change);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{AppState, StateChange};
    use crate::model::ids::DateKey;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn listeners_receive_changes_until_unsubscribed() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut state = AppState::new();
        let sink = Rc::clone(&seen);
        let id = state.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        let date = DateKey::parse("2024-05-01").ok();
        state.set_selected_date(date);
        assert!(state.unsubscribe(id));
        state.set_data_loaded(true);

        assert_eq!(
            seen.borrow().as_slice(),
            &[StateChange::SelectedDateChanged(date)]
        );
        assert!(!state.unsubscribe(id));
    }

    #[test]
    fn update_notes_notifies_with_count() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut state = AppState::new();
        let sink = Rc::clone(&seen);
        state.subscribe(move |change| sink.borrow_mut().push(change.clone()));

        state.update_notes(|notes| notes.clear());
        assert_eq!(
            seen.borrow().as_slice(),
            &[StateChange::NotesChanged { count: 0 }]
        );
    }
}
