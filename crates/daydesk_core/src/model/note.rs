//! Note record: a positioned, resizable, multi-tab text container.
//!
//! # Responsibility
//! - Own the tab list and keep the active-tab index in range.
//! - Provide merge-style partial updates used by the orchestrator.
//!
//! # Invariants
//! - `tabs` is never empty.
//! - `0 <= active_tab_index < tabs.len()` after every public mutation.

use crate::config::BoardConfig;
use crate::model::geometry::{Point, Rect, Size};
use crate::model::ids::{DateKey, EntityId};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// One named page of a note.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NoteTab {
    pub name: String,
    #[serde(default)]
    pub content: String,
}

impl NoteTab {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }
}

/// Structural problems found in a note record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoteValidationError {
    NoTabs(EntityId),
    ActiveTabOutOfRange {
        id: EntityId,
        index: usize,
        tab_count: usize,
    },
}

impl Display for NoteValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NoTabs(id) => write!(f, "note {id} has no tabs"),
            Self::ActiveTabOutOfRange {
                id,
                index,
                tab_count,
            } => write!(
                f,
                "note {id} active tab {index} out of range for {tab_count} tabs"
            ),
        }
    }
}

impl Error for NoteValidationError {}

/// Deserialization goes through [`Note::validate`], so a decoded note always
/// has at least one tab and an in-range active index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "NoteRecord")]
pub struct Note {
    pub id: EntityId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// `None` places the note on the general board.
    pub date: Option<DateKey>,
    /// Weak reference to a zone; may dangle.
    pub zone_id: Option<EntityId>,
    active_tab_index: usize,
    tabs: Vec<NoteTab>,
}

/// Unchecked wire shape of a note.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct NoteRecord {
    id: EntityId,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    date: Option<DateKey>,
    zone_id: Option<EntityId>,
    active_tab_index: usize,
    tabs: Vec<NoteTab>,
}

impl TryFrom<NoteRecord> for Note {
    type Error = NoteValidationError;

    fn try_from(record: NoteRecord) -> Result<Self, Self::Error> {
        let note = Self {
            id: record.id,
            x: record.x,
            y: record.y,
            width: record.width,
            height: record.height,
            date: record.date,
            zone_id: record.zone_id,
            active_tab_index: record.active_tab_index,
            tabs: record.tabs,
        };
        note.validate()?;
        Ok(note)
    }
}

impl Note {
    /// Creates a note with default geometry and the configured empty tabs.
    pub fn new(config: &BoardConfig, date: Option<DateKey>, zone_id: Option<EntityId>) -> Self {
        let tab_count = config.initial_tab_count.max(1);
        let tabs = (0..tab_count)
            .map(|index| NoteTab::new(config.tab_name(index), ""))
            .collect();
        Self {
            id: EntityId::generate(),
            x: config.default_note_x,
            y: config.default_note_y,
            width: config.default_note_width,
            height: config.default_note_height,
            date,
            zone_id,
            active_tab_index: 0,
            tabs,
        }
    }

    /// Replaces the tab list, validating the index against it.
    pub fn with_tabs(
        mut self,
        tabs: Vec<NoteTab>,
        active_tab_index: usize,
    ) -> Result<Self, NoteValidationError> {
        self.tabs = tabs;
        self.active_tab_index = active_tab_index;
        self.validate()?;
        Ok(self)
    }

    pub fn validate(&self) -> Result<(), NoteValidationError> {
        if self.tabs.is_empty() {
            return Err(NoteValidationError::NoTabs(self.id.clone()));
        }
        if self.active_tab_index >= self.tabs.len() {
            return Err(NoteValidationError::ActiveTabOutOfRange {
                id: self.id.clone(),
                index: self.active_tab_index,
                tab_count: self.tabs.len(),
            });
        }
        Ok(())
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn set_origin(&mut self, origin: Point) {
        self.x = origin.x;
        self.y = origin.y;
    }

    pub fn set_size(&mut self, size: Size) {
        self.width = size.width;
        self.height = size.height;
    }

    pub fn tabs(&self) -> &[NoteTab] {
        &self.tabs
    }

    pub fn active_tab_index(&self) -> usize {
        self.active_tab_index
    }

    pub fn active_tab(&self) -> &NoteTab {
        &self.tabs[self.active_tab_index]
    }

    /// Selects a tab. Returns `false` and changes nothing when out of range.
    pub fn switch_tab(&mut self, index: usize) -> bool {
        if index >= self.tabs.len() {
            return false;
        }
        self.active_tab_index = index;
        true
    }

    pub fn rename_active_tab(&mut self, name: impl Into<String>) {
        let index = self.active_tab_index;
        self.tabs[index].name = name.into();
    }

    /// Sets one tab's content. Returns `false` when `index` is out of range.
    pub fn set_tab_content(&mut self, index: usize, content: impl Into<String>) -> bool {
        match self.tabs.get_mut(index) {
            Some(tab) => {
                tab.content = content.into();
                true
            }
            None => false,
        }
    }

    /// Merges the fields present in `patch` into this note.
    ///
    /// An empty tab list in the patch is ignored; the active index is pulled
    /// back into range when the merged tab list is shorter.
    pub fn apply_patch(&mut self, patch: &NotePatch) {
        if let Some(x) = patch.x {
            self.x = x;
        }
        if let Some(y) = patch.y {
            self.y = y;
        }
        if let Some(width) = patch.width {
            self.width = width;
        }
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(date) = &patch.date {
            self.date = *date;
        }
        if let Some(zone_id) = &patch.zone_id {
            self.zone_id = zone_id.clone();
        }
        if let Some(tabs) = &patch.tabs {
            if !tabs.is_empty() {
                self.tabs = tabs.clone();
            }
        }
        if let Some(index) = patch.active_tab_index {
            self.active_tab_index = index;
        }
        if self.active_tab_index >= self.tabs.len() {
            self.active_tab_index = self.tabs.len().saturating_sub(1);
        }
    }
}

/// Partial note update keyed by id. `None` fields are left untouched.
///
/// Nullable fields use `Option<Option<_>>`: `Some(None)` clears the value.
#[derive(Debug, Clone, PartialEq)]
pub struct NotePatch {
    pub id: EntityId,
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub width: Option<f64>,
    pub height: Option<f64>,
    pub date: Option<Option<DateKey>>,
    pub zone_id: Option<Option<EntityId>>,
    pub active_tab_index: Option<usize>,
    pub tabs: Option<Vec<NoteTab>>,
}

impl NotePatch {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            x: None,
            y: None,
            width: None,
            height: None,
            date: None,
            zone_id: None,
            active_tab_index: None,
            tabs: None,
        }
    }
}

impl From<&Note> for NotePatch {
    fn from(note: &Note) -> Self {
        Self {
            id: note.id.clone(),
            x: Some(note.x),
            y: Some(note.y),
            width: Some(note.width),
            height: Some(note.height),
            date: Some(note.date),
            zone_id: Some(note.zone_id.clone()),
            active_tab_index: Some(note.active_tab_index),
            tabs: Some(note.tabs.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Note, NotePatch, NoteTab, NoteValidationError};
    use crate::config::BoardConfig;
    use crate::model::ids::EntityId;

    #[test]
    fn new_note_uses_config_defaults() {
        let note = Note::new(&BoardConfig::default(), None, None);
        assert_eq!(note.tabs().len(), 5);
        assert_eq!(note.tabs()[0].name, "Note 1");
        assert_eq!(note.active_tab_index(), 0);
        assert_eq!((note.x, note.y, note.width, note.height), (20.0, 20.0, 320.0, 240.0));
        assert!(note.zone_id.is_none());
    }

    #[test]
    fn switch_tab_rejects_out_of_range() {
        let mut note = Note::new(&BoardConfig::default(), None, None);
        assert!(note.switch_tab(4));
        assert!(!note.switch_tab(5));
        assert_eq!(note.active_tab_index(), 4);
    }

    #[test]
    fn with_tabs_validates_index() {
        let note = Note::new(&BoardConfig::default(), None, None);
        let err = note
            .with_tabs(vec![NoteTab::new("only", "")], 1)
            .unwrap_err();
        assert!(matches!(err, NoteValidationError::ActiveTabOutOfRange { .. }));
    }

    #[test]
    fn patch_keeps_absent_fields_and_clamps_index() {
        let mut note = Note::new(&BoardConfig::default(), None, Some(EntityId::from("z1")));
        note.switch_tab(3);

        let mut patch = NotePatch::new(note.id.clone());
        patch.x = Some(400.0);
        patch.tabs = Some(vec![NoteTab::new("a", "1"), NoteTab::new("b", "2")]);
        note.apply_patch(&patch);

        assert_eq!(note.x, 400.0);
        assert_eq!(note.y, 20.0);
        assert_eq!(note.zone_id, Some(EntityId::from("z1")));
        assert_eq!(note.tabs().len(), 2);
        assert_eq!(note.active_tab_index(), 1);
    }

    #[test]
    fn patch_can_clear_zone() {
        let mut note = Note::new(&BoardConfig::default(), None, Some(EntityId::from("z1")));
        let mut patch = NotePatch::new(note.id.clone());
        patch.zone_id = Some(None);
        note.apply_patch(&patch);
        assert!(note.zone_id.is_none());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let note = Note::new(&BoardConfig::default(), None, None);
        let value = serde_json::to_value(&note).unwrap();
        assert!(value.get("activeTabIndex").is_some());
        assert!(value.get("zoneId").unwrap().is_null());
        assert!(value.get("date").unwrap().is_null());
    }

    #[test]
    fn decoding_rejects_notes_without_tabs_or_with_bad_index() {
        let base = serde_json::json!({
            "id": "n1", "x": 0, "y": 0, "width": 320, "height": 240,
            "date": null, "zoneId": null, "activeTabIndex": 0, "tabs": []
        });
        assert!(serde_json::from_value::<Note>(base.clone()).is_err());

        let mut out_of_range = base.clone();
        out_of_range["tabs"] = serde_json::json!([{ "name": "Note 1", "content": "" }]);
        out_of_range["activeTabIndex"] = serde_json::json!(3);
        assert!(serde_json::from_value::<Note>(out_of_range).is_err());

        let mut valid = base;
        valid["tabs"] = serde_json::json!([{ "name": "Note 1", "content": "x" }]);
        let note: Note = serde_json::from_value(valid).unwrap();
        assert_eq!(note.active_tab().content, "x");
    }
}
