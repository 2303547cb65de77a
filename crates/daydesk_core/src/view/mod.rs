//! Entity view components.
//!
//! # Responsibility
//! - Wrap one note or zone record for the duration of a single render pass.
//! - Produce presentation models for the display adapter.
//! - Route edits and pointer gestures back to the orchestrator through the
//!   callback traits below.
//!
//! # Invariants
//! - Views own a transient copy of their record; the state store keeps the
//!   authoritative one.
//! - Every mutating operation reports the full updated record before it
//!   returns. Views queue nothing.

pub mod note_view;
pub mod zone_view;

use crate::model::ids::EntityId;
use crate::model::note::Note;
use crate::model::zone::Zone;

pub use note_view::{ContentPanel, NotePresentation, NoteView, TabButton};
pub use zone_view::{ZonePresentation, ZoneView};

/// Upward contract for note views.
pub trait NoteCallbacks {
    fn on_note_update(&mut self, note: &Note);
    fn on_note_delete(&mut self, id: &EntityId);
    /// Zone that should own `note` at its current geometry.
    fn find_parent_zone(&self, note: &Note) -> Option<EntityId>;
}

/// Upward contract for zone views.
pub trait ZoneCallbacks {
    fn on_zone_update(&mut self, zone: &Zone);
    fn on_zone_delete(&mut self, id: &EntityId);
    fn on_add_note_to_zone(&mut self, zone_id: &EntityId);
}
