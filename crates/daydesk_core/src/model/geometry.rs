//! Pixel geometry and the zone containment rule.
//!
//! # Responsibility
//! - Provide axis-aligned rectangle math for board records.
//! - Decide which zone, if any, a note belongs to.
//!
//! # Invariants
//! - Containment is inclusive of edges.
//! - Containment never crosses dates: a zone only holds notes of its own date.
//! - Ties resolve to the first matching zone in input order.

use crate::model::note::Note;
use crate::model::zone::Zone;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Inclusive point containment on all four edges.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }
}

/// Returns the first zone of the note's date whose box contains the note's
/// center point.
///
/// Zones of any other date are skipped, so callers may pass the whole zone
/// collection.
pub fn zone_containing<'a>(note: &Note, zones: &'a [Zone]) -> Option<&'a Zone> {
    let center = note.rect().center();
    zones
        .iter()
        .filter(|zone| zone.date == note.date)
        .find(|zone| zone.rect().contains_point(center))
}

#[cfg(test)]
mod tests {
    use super::{zone_containing, Point, Rect};
    use crate::config::BoardConfig;
    use crate::model::ids::DateKey;
    use crate::model::note::Note;
    use crate::model::zone::Zone;

    fn note_at(x: f64, y: f64, w: f64, h: f64, date: Option<DateKey>) -> Note {
        let mut note = Note::new(&BoardConfig::default(), date, None);
        note.x = x;
        note.y = y;
        note.width = w;
        note.height = h;
        note
    }

    fn zone_at(x: f64, y: f64, w: f64, h: f64, date: Option<DateKey>) -> Zone {
        let mut zone = Zone::new(&BoardConfig::default(), date);
        zone.x = x;
        zone.y = y;
        zone.width = w;
        zone.height = h;
        zone
    }

    #[test]
    fn rect_contains_edges() {
        let rect = Rect::new(10.0, 10.0, 100.0, 50.0);
        assert!(rect.contains_point(Point::new(10.0, 10.0)));
        assert!(rect.contains_point(Point::new(110.0, 60.0)));
        assert!(!rect.contains_point(Point::new(110.5, 60.0)));
        assert!(!rect.contains_point(Point::new(9.9, 30.0)));
    }

    #[test]
    fn center_inside_single_zone_is_contained() {
        let zone = zone_at(50.0, 50.0, 400.0, 300.0, None);
        let note = note_at(60.0, 60.0, 100.0, 100.0, None);
        let zones = vec![zone.clone()];
        assert_eq!(zone_containing(&note, &zones).map(|z| &z.id), Some(&zone.id));
    }

    #[test]
    fn center_outside_every_zone_is_unassigned() {
        let zones = vec![zone_at(50.0, 50.0, 100.0, 100.0, None)];
        let note = note_at(500.0, 500.0, 100.0, 100.0, None);
        assert!(zone_containing(&note, &zones).is_none());
    }

    #[test]
    fn center_on_edge_counts_as_inside() {
        let zones = vec![zone_at(0.0, 0.0, 100.0, 100.0, None)];
        // center = (100, 50): exactly on the right edge.
        let note = note_at(50.0, 0.0, 100.0, 100.0, None);
        assert!(zone_containing(&note, &zones).is_some());
    }

    #[test]
    fn zones_of_other_dates_are_ignored() {
        let day_one = DateKey::parse("2024-01-01").ok();
        let day_two = DateKey::parse("2024-01-02").ok();
        let zones = vec![zone_at(50.0, 50.0, 400.0, 300.0, day_two)];
        let note = note_at(60.0, 60.0, 320.0, 240.0, day_one);
        assert!(zone_containing(&note, &zones).is_none());
    }

    #[test]
    fn overlapping_zones_resolve_to_first_in_order() {
        let first = zone_at(0.0, 0.0, 500.0, 500.0, None);
        let second = zone_at(0.0, 0.0, 200.0, 200.0, None);
        let zones = vec![first.clone(), second];
        let note = note_at(10.0, 10.0, 50.0, 50.0, None);
        assert_eq!(zone_containing(&note, &zones).map(|z| &z.id), Some(&first.id));
    }
}
