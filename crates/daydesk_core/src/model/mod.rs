//! Board domain model: notes, zones, identifiers and geometry.
//!
//! # Responsibility
//! - Define canonical records persisted in a user's board document.
//! - Provide the pure containment rule that maps notes to zones.
//!
//! # Invariants
//! - Every record is identified by a stable `EntityId`.
//! - `Note::active_tab_index` always indexes an existing tab.
//! - `Note::zone_id` is a weak reference; dangling values mean "unassigned".

pub mod geometry;
pub mod ids;
pub mod note;
pub mod zone;
