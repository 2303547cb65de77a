//! Resize gesture: grows or shrinks an element from its resize handle.

use super::{PointerButton, PointerDown, PointerTarget};
use crate::model::geometry::{Point, Size};

#[derive(Debug, Clone, Copy, PartialEq)]
struct ResizeSession {
    start_pointer: Point,
    start_size: Size,
}

#[derive(Debug, Clone)]
pub struct ResizeGesture {
    min_size: Size,
    session: Option<ResizeSession>,
}

impl ResizeGesture {
    pub fn new(min_size: Size) -> Self {
        Self {
            min_size,
            session: None,
        }
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Starts a resize when a primary pointer-down lands on the handle.
    pub fn begin(&mut self, down: &PointerDown, element: Size) -> bool {
        if self.session.is_some()
            || down.button != PointerButton::Primary
            || down.target != PointerTarget::ResizeHandle
        {
            return false;
        }
        self.session = Some(ResizeSession {
            start_pointer: down.position,
            start_size: element,
        });
        true
    }

    /// Candidate size, floored at the minimum. No upper bound applies.
    pub fn update(&self, pointer: Point) -> Option<Size> {
        let session = self.session?;
        let width = session.start_size.width + (pointer.x - session.start_pointer.x);
        let height = session.start_size.height + (pointer.y - session.start_pointer.y);
        Some(Size::new(
            width.max(self.min_size.width),
            height.max(self.min_size.height),
        ))
    }

    pub fn end(&mut self) -> bool {
        self.session.take().is_some()
    }
}
