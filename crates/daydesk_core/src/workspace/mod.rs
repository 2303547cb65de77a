//! Workspace orchestrator.
//!
//! # Responsibility
//! - Own the state store and be its only writer.
//! - Filter notes and zones by the active date and build view components.
//! - Create, delete and merge-update entities on behalf of views.
//! - Schedule debounced saves through the document store.
//!
//! # Invariants
//! - Deleting a zone clears `zone_id` on every note that referenced it.
//! - Operations naming an unknown id change nothing and schedule no save.
//! - A save never runs without a signed-in user and a loaded document.
//! - Load failures surface as an alert dialog; nothing here is fatal.

pub mod clock;
pub mod debounce;
pub mod layout;
pub mod status;
pub mod video;

use crate::config::BoardConfig;
use crate::dialog::Dialog;
use crate::logging::log_safe;
use crate::model::geometry::{zone_containing, Size};
use crate::model::ids::{DateKey, EntityId};
use crate::model::note::{Note, NotePatch};
use crate::model::zone::{Zone, ZonePatch};
use crate::session::AuthEvent;
use crate::state::{AppState, StateChange, SubscriptionId};
use crate::store::{DocumentStore, UserDocument};
use crate::view::{NoteCallbacks, NoteView, ZoneCallbacks, ZoneView};
use log::{debug, error, info, warn};
use std::borrow::Cow;
use std::collections::{BTreeSet, VecDeque};

pub use clock::{Clock, ManualClock, SystemClock};
pub use debounce::SaveDebouncer;
pub use layout::{LayoutMode, WorkspaceView};
pub use status::SaveStatus;
pub use video::video_id;

const GENERAL_BOARD_TITLE: &str = "General board";
const LOAD_ERROR_TITLE: &str = "Load error";
const LOAD_ERROR_MESSAGE: &str = "Your data could not be loaded. Please try again later.";

/// Merge-update request for either entity kind.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPatch {
    Note(NotePatch),
    Zone(ZonePatch),
}

pub struct Workspace<S, C = SystemClock> {
    config: BoardConfig,
    state: AppState,
    store: S,
    clock: C,
    viewport: Size,
    saver: SaveDebouncer,
    save_status: SaveStatus,
    dialogs: VecDeque<Dialog>,
}

impl<S: DocumentStore> Workspace<S, SystemClock> {
    pub fn with_system_clock(config: BoardConfig, state: AppState, store: S) -> Self {
        Self::new(config, state, store, SystemClock)
    }
}

impl<S: DocumentStore, C: Clock> Workspace<S, C> {
    pub fn new(config: BoardConfig, state: AppState, store: S, clock: C) -> Self {
        let saver = SaveDebouncer::new(config.save_debounce());
        Self {
            config,
            state,
            store,
            clock,
            viewport: Size::new(f64::INFINITY, f64::INFINITY),
            saver,
            save_status: SaveStatus::Idle,
            dialogs: VecDeque::new(),
        }
    }

    pub fn config(&self) -> &BoardConfig {
        &self.config
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&StateChange) + 'static) -> SubscriptionId {
        self.state.subscribe(listener)
    }

    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.state.unsubscribe(id)
    }

    // --- viewport ---

    pub fn set_viewport(&mut self, viewport: Size) {
        self.viewport = viewport;
    }

    pub fn viewport(&self) -> Size {
        self.viewport
    }

    pub fn is_compact(&self) -> bool {
        self.config.is_compact(self.viewport.width)
    }

    // --- session ---

    /// Reacts to sign-in state changes.
    ///
    /// Signing in loads the user's document; signing out empties the board
    /// and drops any pending save. Switching to a different user empties the
    /// board before loading, so a failed load never leaves the previous
    /// user's entities under the new uid.
    pub fn handle_auth_change(&mut self, event: AuthEvent) {
        match event {
            AuthEvent::SignedIn(identity) => {
                info!(
                    "event=auth_change module=workspace status=signed_in uid={}",
                    identity.uid
                );
                let switching = self
                    .state
                    .current_user()
                    .is_some_and(|current| current.uid != identity.uid);
                if switching {
                    self.clear_workspace();
                }
                self.state.set_current_user(Some(identity));
                self.load_data();
            }
            AuthEvent::SignedOut => {
                info!("event=auth_change module=workspace status=signed_out");
                self.state.set_current_user(None);
                self.clear_workspace();
            }
        }
    }

    /// Loads the signed-in user's document into the store.
    ///
    /// Returns `false` when nobody is signed in or the load failed; a
    /// failure queues an alert dialog and leaves the board empty.
    pub fn load_data(&mut self) -> bool {
        let Some(uid) = self.state.current_user().map(|user| user.uid.clone()) else {
            debug!("event=workspace_load module=workspace status=skipped reason=no_user");
            return false;
        };

        match self.store.load_user_data(&uid) {
            Ok(document) => {
                info!(
                    "event=workspace_load module=workspace status=ok notes={} zones={}",
                    document.notes.len(),
                    document.zones.len()
                );
                self.state.set_notes(document.notes);
                self.state.set_zones(document.zones);
                self.state.set_video_url(document.video_url);
                self.state.set_data_loaded(true);
                true
            }
            Err(err) => {
                error!(
                    "event=workspace_load module=workspace status=error error={}",
                    log_safe(&err.to_string())
                );
                self.dialogs
                    .push_back(Dialog::alert(LOAD_ERROR_TITLE, LOAD_ERROR_MESSAGE));
                false
            }
        }
    }

    /// Empties the board and marks data as not loaded.
    pub fn clear_workspace(&mut self) {
        self.saver.cancel();
        self.save_status = SaveStatus::Idle;
        self.state.set_data_loaded(false);
        self.state.set_notes(Vec::new());
        self.state.set_zones(Vec::new());
        self.state.set_video_url(String::new());
    }

    // --- date filter ---

    pub fn active_date(&self) -> Option<DateKey> {
        self.state.selected_date()
    }

    pub fn set_active_date(&mut self, date: Option<DateKey>) {
        debug!(
            "event=date_select module=workspace date={}",
            date.map(|date| date.to_string())
                .unwrap_or_else(|| "general".to_string())
        );
        self.state.set_selected_date(date);
    }

    /// Switches to the undated board and requests a save.
    pub fn show_general_board(&mut self) {
        self.set_active_date(None);
        self.request_save();
    }

    pub fn workspace_title(&self) -> String {
        match self.state.selected_date() {
            Some(date) => date.long_label(),
            None => GENERAL_BOARD_TITLE.to_string(),
        }
    }

    /// Notes whose date equals the active date exactly.
    pub fn notes_in_view(&self) -> impl Iterator<Item = &Note> + '_ {
        let date = self.state.selected_date();
        self.state.notes().iter().filter(move |note| note.date == date)
    }

    pub fn zones_in_view(&self) -> impl Iterator<Item = &Zone> + '_ {
        let date = self.state.selected_date();
        self.state.zones().iter().filter(move |zone| zone.date == date)
    }

    /// Days that have at least one note.
    pub fn note_dates(&self) -> BTreeSet<DateKey> {
        self.state.notes().iter().filter_map(|note| note.date).collect()
    }

    // --- rendering ---

    /// Builds a fresh set of view components for the active date.
    pub fn render(&self) -> WorkspaceView {
        let compact = self.is_compact();
        let zones: Vec<&Zone> = self.zones_in_view().collect();
        let notes: Vec<&Note> = self.notes_in_view().collect();

        let mut zone_views: Vec<ZoneView> = zones
            .iter()
            .map(|zone| ZoneView::new((*zone).clone(), &self.config, compact))
            .collect();
        let mut standalone_notes = Vec::new();

        for note in notes {
            let view = NoteView::new(note.clone(), &self.config, compact);
            let parent = match &note.zone_id {
                Some(zone_id) if compact => zone_views
                    .iter_mut()
                    .find(|zone_view| zone_view.id() == zone_id),
                _ => None,
            };
            match parent {
                Some(zone_view) => {
                    if let Err(view) = zone_view.attach_member(view) {
                        standalone_notes.push(view);
                    }
                }
                None => standalone_notes.push(view),
            }
        }

        let date_selected = self.state.selected_date().is_some();
        let view = WorkspaceView {
            mode: if compact {
                LayoutMode::Narrow
            } else {
                LayoutMode::Wide
            },
            title: self.workspace_title(),
            show_general_button: !compact || date_selected,
            zones: zone_views,
            standalone_notes,
        };
        debug!(
            "event=workspace_render module=workspace mode={:?} zones={} notes={}",
            view.mode,
            view.zones.len(),
            view.note_count()
        );
        view
    }

    // --- entity lifecycle ---

    /// Creates a note on the active date, optionally inside `zone_id`.
    ///
    /// A zone id that names no existing zone is dropped.
    pub fn create_note(&mut self, zone_id: Option<EntityId>) -> EntityId {
        let zone_id = zone_id.filter(|id| self.state.zones().iter().any(|zone| &zone.id == id));
        let note = Note::new(&self.config, self.state.selected_date(), zone_id);
        let id = note.id.clone();
        self.state.update_notes(|notes| notes.push(note));
        info!("event=note_create module=workspace status=ok id={}", id);
        self.request_save();
        id
    }

    pub fn create_zone(&mut self) -> EntityId {
        let zone = Zone::new(&self.config, self.state.selected_date());
        let id = zone.id.clone();
        self.state.update_zones(|zones| zones.push(zone));
        info!("event=zone_create module=workspace status=ok id={}", id);
        self.request_save();
        id
    }

    pub fn delete_note(&mut self, id: &EntityId) -> bool {
        if !self.state.notes().iter().any(|note| &note.id == id) {
            debug!("event=note_delete module=workspace status=stale id={}", id);
            return false;
        }
        self.state.update_notes(|notes| notes.retain(|note| &note.id != id));
        info!("event=note_delete module=workspace status=ok id={}", id);
        self.request_save();
        true
    }

    /// Removes a zone and detaches its member notes.
    pub fn delete_zone(&mut self, id: &EntityId) -> bool {
        if !self.state.zones().iter().any(|zone| &zone.id == id) {
            debug!("event=zone_delete module=workspace status=stale id={}", id);
            return false;
        }
        self.state.update_zones(|zones| zones.retain(|zone| &zone.id != id));
        let detached = self.state.update_notes(|notes| {
            let mut detached = 0usize;
            for note in notes.iter_mut().filter(|note| note.zone_id.as_ref() == Some(id)) {
                note.zone_id = None;
                detached += 1;
            }
            detached
        });
        info!(
            "event=zone_delete module=workspace status=ok id={} detached_notes={}",
            id, detached
        );
        self.request_save();
        true
    }

    pub fn apply_update(&mut self, patch: EntityPatch) -> bool {
        match patch {
            EntityPatch::Note(patch) => self.apply_note_update(&patch),
            EntityPatch::Zone(patch) => self.apply_zone_update(&patch),
        }
    }

    /// Merges `patch` into the stored note with the same id.
    ///
    /// A `zone_id` naming no existing zone is stored as `None`, so a view
    /// rendered before a zone deletion cannot bring the reference back.
    pub fn apply_note_update(&mut self, patch: &NotePatch) -> bool {
        let Some(index) = self
            .state
            .notes()
            .iter()
            .position(|note| note.id == patch.id)
        else {
            debug!(
                "event=note_update module=workspace status=stale id={}",
                patch.id
            );
            return false;
        };
        let dangling = matches!(
            &patch.zone_id,
            Some(Some(zone_id)) if !self.state.zones().iter().any(|zone| &zone.id == zone_id)
        );
        let patch = if dangling {
            let mut patch = patch.clone();
            patch.zone_id = Some(None);
            Cow::Owned(patch)
        } else {
            Cow::Borrowed(patch)
        };
        self.state
            .update_notes(|notes| notes[index].apply_patch(&patch));
        self.request_save();
        true
    }

    pub fn apply_zone_update(&mut self, patch: &ZonePatch) -> bool {
        let Some(index) = self
            .state
            .zones()
            .iter()
            .position(|zone| zone.id == patch.id)
        else {
            debug!(
                "event=zone_update module=workspace status=stale id={}",
                patch.id
            );
            return false;
        };
        self.state
            .update_zones(|zones| zones[index].apply_patch(patch));
        self.request_save();
        true
    }

    /// First zone on the note's date whose rectangle holds the note center.
    pub fn find_parent_zone(&self, note: &Note) -> Option<EntityId> {
        zone_containing(note, self.state.zones()).map(|zone| zone.id.clone())
    }

    /// Stores a new video URL and requests a save.
    ///
    /// URLs without a recognizable video id, and the URL already stored, are
    /// ignored. Returns whether the URL was accepted.
    pub fn set_video_url(&mut self, url: &str) -> bool {
        if video_id(url).is_none() {
            debug!("event=video_url_set module=workspace status=rejected");
            return false;
        }
        if self.state.video_url() == url {
            return false;
        }
        self.state.set_video_url(url.to_string());
        self.request_save();
        true
    }

    // --- persistence ---

    /// Restarts the save quiet period.
    pub fn request_save(&mut self) {
        self.saver.request(self.clock.now());
    }

    pub fn has_pending_save(&self) -> bool {
        self.saver.is_pending()
    }

    /// Advances time-driven work: runs a due save and expires the "Saved"
    /// status. Returns `true` when a save was attempted.
    pub fn tick(&mut self) -> bool {
        let now = self.clock.now();
        self.save_status = self
            .save_status
            .expire(now, self.config.saved_status_linger());
        if self.saver.fire_if_due(now) {
            return self.save_now();
        }
        false
    }

    /// Runs a pending save immediately.
    pub fn flush(&mut self) -> bool {
        if self.saver.take_pending() {
            return self.save_now();
        }
        false
    }

    /// Writes the whole document for the signed-in user.
    ///
    /// Returns `false` when skipped or failed. A failed save keeps every
    /// change in memory; nothing is retried until the next mutation.
    pub fn save_now(&mut self) -> bool {
        let uid = match self.state.current_user() {
            Some(user) if self.state.is_data_loaded() => user.uid.clone(),
            _ => {
                debug!("event=workspace_save module=workspace status=skipped");
                return false;
            }
        };

        self.save_status = SaveStatus::Saving;
        let document = UserDocument {
            notes: self.state.notes().to_vec(),
            zones: self.state.zones().to_vec(),
            video_url: self.state.video_url().to_string(),
        };
        match self.store.save_user_data(&uid, &document) {
            Ok(()) => {
                self.save_status = SaveStatus::Saved {
                    at: self.clock.now(),
                };
                true
            }
            Err(err) => {
                warn!(
                    "event=workspace_save module=workspace status=error error={}",
                    log_safe(&err.to_string())
                );
                self.save_status = SaveStatus::Failed;
                false
            }
        }
    }

    pub fn save_status(&self) -> SaveStatus {
        self.save_status
    }

    pub fn save_message(&self) -> &'static str {
        self.save_status.message()
    }

    // --- dialogs ---

    /// Next dialog waiting to be shown, oldest first.
    pub fn take_dialog(&mut self) -> Option<Dialog> {
        self.dialogs.pop_front()
    }

    pub fn pending_dialogs(&self) -> usize {
        self.dialogs.len()
    }
}

impl<S: DocumentStore, C: Clock> NoteCallbacks for Workspace<S, C> {
    fn on_note_update(&mut self, note: &Note) {
        self.apply_note_update(&NotePatch::from(note));
    }

    fn on_note_delete(&mut self, id: &EntityId) {
        self.delete_note(id);
    }

    fn find_parent_zone(&self, note: &Note) -> Option<EntityId> {
        Workspace::find_parent_zone(self, note)
    }
}

impl<S: DocumentStore, C: Clock> ZoneCallbacks for Workspace<S, C> {
    fn on_zone_update(&mut self, zone: &Zone) {
        self.apply_zone_update(&ZonePatch::from(zone));
    }

    fn on_zone_delete(&mut self, id: &EntityId) {
        self.delete_zone(id);
    }

    fn on_add_note_to_zone(&mut self, zone_id: &EntityId) {
        self.create_note(Some(zone_id.clone()));
    }
}

#[cfg(test)]
mod tests {
    use super::{EntityPatch, LayoutMode, ManualClock, SaveStatus, Workspace};
    use crate::config::BoardConfig;
    use crate::model::geometry::Size;
    use crate::model::ids::DateKey;
    use crate::model::note::NotePatch;
    use crate::session::{AuthEvent, UserIdentity};
    use crate::state::AppState;
    use crate::store::{DocumentStore, StoreError, StoreResult, UserDocument};
    use std::cell::RefCell;
    use std::time::Duration;

    #[derive(Default)]
    struct MemoryStore {
        saved: RefCell<Vec<UserDocument>>,
    }

    impl DocumentStore for MemoryStore {
        fn load_user_data(&self, _user_id: &str) -> StoreResult<UserDocument> {
            Ok(self.saved.borrow().last().cloned().unwrap_or_default())
        }

        fn save_user_data(&self, _user_id: &str, document: &UserDocument) -> StoreResult<()> {
            self.saved.borrow_mut().push(document.clone());
            Ok(())
        }
    }

    struct FailingStore;

    impl DocumentStore for FailingStore {
        fn load_user_data(&self, _user_id: &str) -> StoreResult<UserDocument> {
            Err(StoreError::InvalidData("unreadable".to_string()))
        }

        fn save_user_data(&self, _user_id: &str, _document: &UserDocument) -> StoreResult<()> {
            Err(StoreError::InvalidData("unwritable".to_string()))
        }
    }

    fn signed_in() -> (Workspace<MemoryStore, ManualClock>, ManualClock) {
        let clock = ManualClock::new();
        let mut workspace = Workspace::new(
            BoardConfig::default(),
            AppState::new(),
            MemoryStore::default(),
            clock.clone(),
        );
        workspace.handle_auth_change(AuthEvent::SignedIn(UserIdentity::new("u1", "Ada")));
        (workspace, clock)
    }

    #[test]
    fn title_follows_active_date() {
        let (mut workspace, _) = signed_in();
        assert_eq!(workspace.workspace_title(), "General board");
        workspace.set_active_date(DateKey::parse("2024-03-05").ok());
        assert_eq!(workspace.workspace_title(), "5 March 2024");
    }

    #[test]
    fn stale_update_schedules_nothing() {
        let (mut workspace, _) = signed_in();
        let patch = NotePatch::new("missing".into());
        assert!(!workspace.apply_update(EntityPatch::Note(patch)));
        assert!(!workspace.has_pending_save());
        assert!(!workspace.delete_zone(&"missing".into()));
        assert!(!workspace.has_pending_save());
    }

    #[test]
    fn create_note_drops_unknown_zone() {
        let (mut workspace, _) = signed_in();
        let id = workspace.create_note(Some("nowhere".into()));
        let note = workspace
            .state()
            .notes()
            .iter()
            .find(|note| note.id == id)
            .unwrap();
        assert_eq!(note.zone_id, None);
    }

    #[test]
    fn saved_status_lingers_then_clears() {
        let (mut workspace, clock) = signed_in();
        workspace.create_zone();
        clock.advance(Duration::from_millis(1500));
        assert!(workspace.tick());
        assert_eq!(workspace.save_message(), "Saved");

        clock.advance(Duration::from_millis(1999));
        workspace.tick();
        assert_eq!(workspace.save_message(), "Saved");
        clock.advance(Duration::from_millis(1));
        workspace.tick();
        assert_eq!(workspace.save_status(), SaveStatus::Idle);
    }

    #[test]
    fn general_button_hidden_on_narrow_general_board() {
        let (mut workspace, _) = signed_in();
        workspace.set_viewport(Size::new(768.0, 1000.0));
        let view = workspace.render();
        assert_eq!(view.mode, LayoutMode::Narrow);
        assert!(!view.show_general_button);

        workspace.set_viewport(Size::new(769.0, 1000.0));
        assert!(workspace.render().show_general_button);
    }

    #[test]
    fn load_failure_queues_alert_and_blocks_saves() {
        let clock = ManualClock::new();
        let mut workspace = Workspace::new(
            BoardConfig::default(),
            AppState::new(),
            FailingStore,
            clock.clone(),
        );
        workspace.handle_auth_change(AuthEvent::SignedIn(UserIdentity::new("u1", "Ada")));

        assert!(!workspace.state().is_data_loaded());
        let dialog = workspace.take_dialog().unwrap();
        assert_eq!(dialog.title(), "Load error");

        workspace.create_note(None);
        assert!(!workspace.flush());
        assert_eq!(workspace.save_status(), SaveStatus::Idle);
    }
}
