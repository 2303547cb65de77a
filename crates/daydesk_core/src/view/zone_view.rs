//! Zone view: editable title, add-note/delete controls, full-screen toggle
//! and, in the compact layout, the notes nested inside it.

use super::note_view::NoteView;
use super::ZoneCallbacks;
use crate::config::BoardConfig;
use crate::interaction::{GestureKind, Manipulation, Manipulator, PointerEvent};
use crate::model::geometry::{Rect, Size};
use crate::model::ids::EntityId;
use crate::model::zone::Zone;

const TITLE_PLACEHOLDER: &str = "Zone title";
const OPEN_FULL_SCREEN_LABEL: &str = "View zone";
const CLOSE_FULL_SCREEN_LABEL: &str = "Close";

#[derive(Debug, Clone, PartialEq)]
pub struct ZonePresentation {
    pub element_id: String,
    pub title: String,
    pub title_placeholder: &'static str,
    pub full_screen: bool,
    pub full_screen_label: &'static str,
    pub draggable: bool,
    pub dragging: bool,
    pub frame: Option<Rect>,
    /// Ids of notes rendered inside the zone body (compact layout only).
    pub member_note_ids: Vec<EntityId>,
}

#[derive(Debug, Clone)]
pub struct ZoneView {
    zone: Zone,
    compact: bool,
    full_screen: bool,
    manipulator: Manipulator,
    members: Vec<NoteView>,
}

impl ZoneView {
    pub fn new(zone: Zone, config: &BoardConfig, compact: bool) -> Self {
        let manipulator = Manipulator::new(zone.rect(), config.min_zone_size(), !compact);
        Self {
            zone,
            compact,
            full_screen: false,
            manipulator,
            members: Vec::new(),
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.zone.id
    }

    pub fn zone(&self) -> &Zone {
        &self.zone
    }

    /// Nests a note view in the zone body. Only the compact layout has one;
    /// in the wide layout the note is handed back unchanged.
    pub fn attach_member(&mut self, note: NoteView) -> Result<(), NoteView> {
        if !self.compact {
            return Err(note);
        }
        self.members.push(note);
        Ok(())
    }

    pub fn members(&self) -> &[NoteView] {
        &self.members
    }

    pub fn members_mut(&mut self) -> &mut [NoteView] {
        &mut self.members
    }

    pub fn render(&self) -> ZonePresentation {
        ZonePresentation {
            element_id: format!("zone-{}", self.zone.id),
            title: self.zone.title.clone(),
            title_placeholder: TITLE_PLACEHOLDER,
            full_screen: self.full_screen,
            full_screen_label: if self.full_screen {
                CLOSE_FULL_SCREEN_LABEL
            } else {
                OPEN_FULL_SCREEN_LABEL
            },
            draggable: self.manipulator.is_enabled(),
            dragging: self.manipulator.is_active(),
            frame: (!self.compact).then(|| self.manipulator.presented()),
            member_note_ids: self.members.iter().map(|note| note.id().clone()).collect(),
        }
    }

    pub fn rename_title(&mut self, text: &str, callbacks: &mut impl ZoneCallbacks) {
        self.zone.title = text.to_string();
        callbacks.on_zone_update(&self.zone);
    }

    pub fn request_delete(&self, callbacks: &mut impl ZoneCallbacks) {
        callbacks.on_zone_delete(&self.zone.id);
    }

    pub fn request_add_note(&self, callbacks: &mut impl ZoneCallbacks) {
        callbacks.on_add_note_to_zone(&self.zone.id);
    }

    /// Toggles the expanded presentation. Touches no data.
    pub fn toggle_full_screen(&mut self) -> bool {
        self.full_screen = !self.full_screen;
        self.full_screen
    }

    pub fn pointer(
        &mut self,
        event: PointerEvent,
        container: Option<Size>,
        callbacks: &mut impl ZoneCallbacks,
    ) -> Manipulation {
        let outcome = self.manipulator.handle(event, container);
        if let Manipulation::Committed { kind, rect } = outcome {
            match kind {
                GestureKind::Drag => self.zone.set_origin(rect.origin()),
                GestureKind::Resize => self.zone.set_size(rect.size()),
            }
            callbacks.on_zone_update(&self.zone);
        }
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::ZoneView;
    use crate::config::BoardConfig;
    use crate::interaction::{PointerDown, PointerEvent, PointerTarget};
    use crate::model::geometry::{Point, Size};
    use crate::model::ids::EntityId;
    use crate::model::note::Note;
    use crate::model::zone::Zone;
    use crate::view::{NoteView, ZoneCallbacks};

    #[derive(Default)]
    struct Recorder {
        updates: Vec<Zone>,
        deletes: Vec<EntityId>,
        add_requests: Vec<EntityId>,
    }

    impl ZoneCallbacks for Recorder {
        fn on_zone_update(&mut self, zone: &Zone) {
            self.updates.push(zone.clone());
        }

        fn on_zone_delete(&mut self, id: &EntityId) {
            self.deletes.push(id.clone());
        }

        fn on_add_note_to_zone(&mut self, zone_id: &EntityId) {
            self.add_requests.push(zone_id.clone());
        }
    }

    #[test]
    fn full_screen_toggle_changes_label_only() {
        let config = BoardConfig::default();
        let mut view = ZoneView::new(Zone::new(&config, None), &config, false);
        assert_eq!(view.render().full_screen_label, "View zone");
        assert!(view.toggle_full_screen());
        assert_eq!(view.render().full_screen_label, "Close");
        assert!(!view.toggle_full_screen());
    }

    #[test]
    fn title_edit_and_add_note_report_upward() {
        let config = BoardConfig::default();
        let mut view = ZoneView::new(Zone::new(&config, None), &config, false);
        let mut recorder = Recorder::default();

        view.rename_title("Errands", &mut recorder);
        view.request_add_note(&mut recorder);
        view.request_delete(&mut recorder);

        assert_eq!(recorder.updates[0].title, "Errands");
        assert_eq!(recorder.add_requests, vec![view.id().clone()]);
        assert_eq!(recorder.deletes, vec![view.id().clone()]);
    }

    #[test]
    fn resize_commit_writes_size() {
        let config = BoardConfig::default();
        let mut view = ZoneView::new(Zone::new(&config, None), &config, false);
        let mut recorder = Recorder::default();
        let container = Some(Size::new(1000.0, 800.0));

        // zone spans (50,50)-(450,350); handle at bottom-right
        view.pointer(
            PointerEvent::Down(PointerDown::primary(
                Point::new(450.0, 350.0),
                PointerTarget::ResizeHandle,
            )),
            container,
            &mut recorder,
        );
        view.pointer(PointerEvent::Move(Point::new(550.0, 400.0)), container, &mut recorder);
        view.pointer(PointerEvent::Up, container, &mut recorder);

        let zone = recorder.updates.last().unwrap();
        assert_eq!((zone.width, zone.height), (500.0, 350.0));
        assert_eq!((zone.x, zone.y), (50.0, 50.0));
    }

    #[test]
    fn members_only_attach_in_compact_layout() {
        let config = BoardConfig::default();
        let note = NoteView::new(Note::new(&config, None, None), &config, true);

        let mut wide = ZoneView::new(Zone::new(&config, None), &config, false);
        assert!(wide.attach_member(note.clone()).is_err());
        assert!(wide.render().draggable);

        let mut compact = ZoneView::new(Zone::new(&config, None), &config, true);
        compact.attach_member(note.clone()).unwrap();
        assert_eq!(compact.render().member_note_ids, vec![note.id().clone()]);
        assert!(compact.render().frame.is_none());
        assert!(!compact.render().draggable);
    }
}
