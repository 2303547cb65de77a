//! Pointer manipulation contract for board elements.
//!
//! # Responsibility
//! - Turn raw pointer input into drag and resize gestures.
//! - Produce presentation-only previews while a gesture is active and a
//!   single committed geometry when it ends.
//!
//! # Invariants
//! - At most one drag and one resize session exist per element.
//! - Nothing is committed before pointer release.
//! - Dragged positions stay inside the container; resized sizes never drop
//!   below the element's minimum.
//! - The contract is inert while disabled (compact layout).
//!
//! The state machine is pure: the caller supplies element and container
//! geometry with each event, so no rendering surface is required.

pub mod drag;
pub mod resize;

use crate::model::geometry::{Point, Rect, Size};
use drag::DragGesture;
use log::debug;
use resize::ResizeGesture;

/// Mouse button that produced a pointer-down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    Primary,
    Secondary,
    Middle,
}

/// What the pointer landed on inside an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerTarget {
    /// Plain element body; starts a drag.
    Surface,
    /// Text field, editable heading or content area.
    EditableText,
    DeleteControl,
    ResizeHandle,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerDown {
    pub position: Point,
    pub button: PointerButton,
    pub target: PointerTarget,
}

impl PointerDown {
    pub fn primary(position: Point, target: PointerTarget) -> Self {
        Self {
            position,
            button: PointerButton::Primary,
            target,
        }
    }
}

/// Pointer input delivered to one element's manipulator.
///
/// `Move` and `Up` are process-wide: they reach the manipulator regardless
/// of where the pointer is, as long as a gesture is active.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(PointerDown),
    Move(Point),
    Up,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GestureKind {
    Drag,
    Resize,
}

/// Result of feeding one pointer event to a manipulator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Manipulation {
    /// Event did not affect any gesture.
    Ignored,
    Started(GestureKind),
    /// In-progress geometry to present; the backing record is untouched.
    Preview { kind: GestureKind, rect: Rect },
    /// Gesture ended; `rect` must be written back to the record.
    Committed { kind: GestureKind, rect: Rect },
}

/// Drag plus resize state for one element.
#[derive(Debug, Clone)]
pub struct Manipulator {
    enabled: bool,
    min_size: Size,
    drag: DragGesture,
    resize: ResizeGesture,
    presented: Rect,
}

impl Manipulator {
    /// Creates an idle manipulator presenting `rect`.
    pub fn new(rect: Rect, min_size: Size, enabled: bool) -> Self {
        Self {
            enabled,
            min_size,
            drag: DragGesture::new(),
            resize: ResizeGesture::new(min_size),
            presented: rect,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn is_active(&self) -> bool {
        self.drag.is_active() || self.resize.is_active()
    }

    /// Geometry currently shown on screen, including any live preview.
    pub fn presented(&self) -> Rect {
        self.presented
    }

    /// Feeds one pointer event.
    ///
    /// `container` is the workspace viewport size; `None` when it is not
    /// mounted, in which case drag moves are dropped.
    pub fn handle(&mut self, event: PointerEvent, container: Option<Size>) -> Manipulation {
        if !self.enabled {
            return Manipulation::Ignored;
        }

        match event {
            PointerEvent::Down(down) => self.handle_down(down),
            PointerEvent::Move(pointer) => self.handle_move(pointer, container),
            PointerEvent::Up => self.handle_up(),
        }
    }

    fn handle_down(&mut self, down: PointerDown) -> Manipulation {
        if self.is_active() {
            return Manipulation::Ignored;
        }
        if self.resize.begin(&down, self.presented.size()) {
            return Manipulation::Started(GestureKind::Resize);
        }
        if self.drag.begin(&down, self.presented) {
            return Manipulation::Started(GestureKind::Drag);
        }
        Manipulation::Ignored
    }

    fn handle_move(&mut self, pointer: Point, container: Option<Size>) -> Manipulation {
        if self.resize.is_active() {
            return match self.resize.update(pointer) {
                Some(size) => {
                    self.presented.width = size.width;
                    self.presented.height = size.height;
                    Manipulation::Preview {
                        kind: GestureKind::Resize,
                        rect: self.presented,
                    }
                }
                None => Manipulation::Ignored,
            };
        }
        if self.drag.is_active() {
            return match self.drag.update(pointer, self.presented.size(), container) {
                Some(origin) => {
                    self.presented.x = origin.x;
                    self.presented.y = origin.y;
                    Manipulation::Preview {
                        kind: GestureKind::Drag,
                        rect: self.presented,
                    }
                }
                None => Manipulation::Ignored,
            };
        }
        Manipulation::Ignored
    }

    fn handle_up(&mut self) -> Manipulation {
        let kind = if self.resize.end() {
            GestureKind::Resize
        } else if self.drag.end() {
            GestureKind::Drag
        } else {
            return Manipulation::Ignored;
        };

        // Committed geometry is whole pixels; a resize never lands below the
        // floor, even when the floor itself is fractional.
        let mut committed = Rect::new(
            self.presented.x.trunc(),
            self.presented.y.trunc(),
            self.presented.width.trunc(),
            self.presented.height.trunc(),
        );
        if kind == GestureKind::Resize {
            committed.width = whole_at_least(committed.width, self.min_size.width);
            committed.height = whole_at_least(committed.height, self.min_size.height);
        }
        self.presented = committed;
        debug!(
            "event=gesture_commit module=interaction status=ok kind={:?}",
            kind
        );
        Manipulation::Committed {
            kind,
            rect: self.presented,
        }
    }
}

fn whole_at_least(value: f64, floor: f64) -> f64 {
    if value < floor {
        floor.ceil()
    } else {
        value
    }
}
