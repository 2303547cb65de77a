//! Note view: tab strip, editable heading, content panels and gestures.

use super::NoteCallbacks;
use crate::config::BoardConfig;
use crate::interaction::{GestureKind, Manipulation, Manipulator, PointerEvent};
use crate::model::geometry::{Rect, Size};
use crate::model::ids::EntityId;
use crate::model::note::Note;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TabButton {
    pub index: usize,
    /// Hover title; the tab's name.
    pub title: String,
    pub active: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPanel {
    pub index: usize,
    pub content: String,
    pub visible: bool,
    /// Compact layout grows text areas to fit their content.
    pub auto_grow: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NotePresentation {
    pub element_id: String,
    pub tabs: Vec<TabButton>,
    /// Editable heading showing the active tab's name.
    pub heading: String,
    pub panels: Vec<ContentPanel>,
    pub draggable: bool,
    pub dragging: bool,
    /// Absolute frame; `None` in the compact layout where notes flow.
    pub frame: Option<Rect>,
}

#[derive(Debug, Clone)]
pub struct NoteView {
    note: Note,
    compact: bool,
    manipulator: Manipulator,
}

impl NoteView {
    pub fn new(note: Note, config: &BoardConfig, compact: bool) -> Self {
        let manipulator = Manipulator::new(note.rect(), config.min_note_size(), !compact);
        Self {
            note,
            compact,
            manipulator,
        }
    }

    pub fn id(&self) -> &EntityId {
        &self.note.id
    }

    pub fn note(&self) -> &Note {
        &self.note
    }

    pub fn render(&self) -> NotePresentation {
        let active = self.note.active_tab_index();
        let tabs = self
            .note
            .tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| TabButton {
                index,
                title: tab.name.clone(),
                active: index == active,
            })
            .collect();
        let panels = self
            .note
            .tabs()
            .iter()
            .enumerate()
            .map(|(index, tab)| ContentPanel {
                index,
                content: tab.content.clone(),
                visible: index == active,
                auto_grow: self.compact,
            })
            .collect();

        NotePresentation {
            element_id: format!("note-{}", self.note.id),
            tabs,
            heading: self.note.active_tab().name.clone(),
            panels,
            draggable: self.manipulator.is_enabled(),
            dragging: self.manipulator.is_active(),
            frame: (!self.compact).then(|| self.manipulator.presented()),
        }
    }

    /// Makes tab `index` active. Out-of-range indexes are ignored.
    pub fn switch_tab(&mut self, index: usize, callbacks: &mut impl NoteCallbacks) {
        if self.note.switch_tab(index) {
            callbacks.on_note_update(&self.note);
        }
    }

    /// Live edit of the heading; renames the active tab.
    pub fn rename_active_tab(&mut self, text: &str, callbacks: &mut impl NoteCallbacks) {
        self.note.rename_active_tab(text);
        callbacks.on_note_update(&self.note);
    }

    pub fn edit_content(
        &mut self,
        tab_index: usize,
        text: &str,
        callbacks: &mut impl NoteCallbacks,
    ) {
        if self.note.set_tab_content(tab_index, text) {
            callbacks.on_note_update(&self.note);
        }
    }

    pub fn request_delete(&self, callbacks: &mut impl NoteCallbacks) {
        callbacks.on_note_delete(&self.note.id);
    }

    /// Feeds pointer input to the drag/resize contract.
    ///
    /// A finished drag re-derives the note's zone before reporting.
    pub fn pointer(
        &mut self,
        event: PointerEvent,
        container: Option<Size>,
        callbacks: &mut impl NoteCallbacks,
    ) -> Manipulation {
        let outcome = self.manipulator.handle(event, container);
        if let Manipulation::Committed { kind, rect } = outcome {
            match kind {
                GestureKind::Drag => {
                    self.note.set_origin(rect.origin());
                    self.note.zone_id = callbacks.find_parent_zone(&self.note);
                }
                GestureKind::Resize => self.note.set_size(rect.size()),
            }
            callbacks.on_note_update(&self.note);
        }
        outcome
    }
}
