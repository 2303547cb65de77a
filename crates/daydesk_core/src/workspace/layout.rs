//! Render output of the workspace.

use crate::model::ids::EntityId;
use crate::view::{NoteView, ZoneView};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Free-positioned zones and notes with drag/resize.
    Wide,
    /// Stacked flow; notes nest inside their zone.
    Narrow,
}

/// One render pass worth of view components.
///
/// Built fresh by `Workspace::render`; never reused across renders.
#[derive(Debug, Clone)]
pub struct WorkspaceView {
    pub mode: LayoutMode,
    pub title: String,
    /// The "back to general board" control. Narrow layouts only show it
    /// while a date is selected.
    pub show_general_button: bool,
    pub zones: Vec<ZoneView>,
    /// Notes rendered at the top level (all notes in the wide layout).
    pub standalone_notes: Vec<NoteView>,
}

impl WorkspaceView {
    pub fn note_count(&self) -> usize {
        self.standalone_notes.len()
            + self
                .zones
                .iter()
                .map(|zone| zone.members().len())
                .sum::<usize>()
    }

    /// Looks a note view up wherever it is nested.
    pub fn note_mut(&mut self, id: &EntityId) -> Option<&mut NoteView> {
        if let Some(index) = self.standalone_notes.iter().position(|note| note.id() == id) {
            return self.standalone_notes.get_mut(index);
        }
        self.zones
            .iter_mut()
            .flat_map(|zone| zone.members_mut().iter_mut())
            .find(|note| note.id() == id)
    }

    pub fn zone_mut(&mut self, id: &EntityId) -> Option<&mut ZoneView> {
        self.zones.iter_mut().find(|zone| zone.id() == id)
    }
}
