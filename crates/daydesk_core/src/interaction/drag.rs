//! Drag gesture: moves an element while keeping it inside its container.

use super::{PointerButton, PointerDown, PointerTarget};
use crate::model::geometry::{Point, Rect, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
struct DragSession {
    /// Pointer position relative to the element's top-left at grab time.
    grab_offset: Point,
}

#[derive(Debug, Clone, Default)]
pub struct DragGesture {
    session: Option<DragSession>,
}

impl DragGesture {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a drag if `down` qualifies. Returns whether a session began.
    ///
    /// Pointer-downs on editable text, delete controls or the resize handle
    /// never start a drag.
    pub fn begin(&mut self, down: &PointerDown, element: Rect) -> bool {
        if self.session.is_some() || down.button != PointerButton::Primary {
            return false;
        }
        if down.target != PointerTarget::Surface {
            return false;
        }
        self.session = Some(DragSession {
            grab_offset: Point::new(down.position.x - element.x, down.position.y - element.y),
        });
        true
    }

    /// Candidate origin for the current pointer, or `None` when idle or the
    /// container is unresolved.
    pub fn update(&self, pointer: Point, element: Size, container: Option<Size>) -> Option<Point> {
        let session = self.session?;
        let container = container?;
        let x = pointer.x - session.grab_offset.x;
        let y = pointer.y - session.grab_offset.y;
        Some(Point::new(
            clamp_axis(x, container.width - element.width),
            clamp_axis(y, container.height - element.height),
        ))
    }

    /// Ends the session. Returns whether one was active.
    pub fn end(&mut self) -> bool {
        self.session.take().is_some()
    }
}

/// Clamps into `[0, max]`; an element larger than its container pins to 0.
fn clamp_axis(value: f64, max: f64) -> f64 {
    value.min(max).max(0.0)
}

#[cfg(test)]
mod tests {
    use super::{clamp_axis, DragGesture};
    use crate::interaction::{PointerDown, PointerTarget};
    use crate::model::geometry::{Point, Rect, Size};

    #[test]
    fn oversized_element_pins_to_origin() {
        assert_eq!(clamp_axis(40.0, -100.0), 0.0);
    }

    #[test]
    fn update_keeps_grab_offset() {
        let mut drag = DragGesture::new();
        let element = Rect::new(100.0, 100.0, 50.0, 50.0);
        assert!(drag.begin(
            &PointerDown::primary(Point::new(120.0, 130.0), PointerTarget::Surface),
            element
        ));
        let origin = drag
            .update(
                Point::new(220.0, 230.0),
                element.size(),
                Some(Size::new(1000.0, 1000.0)),
            )
            .unwrap();
        assert_eq!(origin, Point::new(200.0, 200.0));
    }

    #[test]
    fn resize_handle_does_not_start_drag() {
        let mut drag = DragGesture::new();
        assert!(!drag.begin(
            &PointerDown::primary(Point::new(1.0, 1.0), PointerTarget::ResizeHandle),
            Rect::new(0.0, 0.0, 10.0, 10.0)
        ));
    }
}
