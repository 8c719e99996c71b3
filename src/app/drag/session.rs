// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/session.rs
//
// The single press/drag session and its long-press timer.

use std::time::{Duration, Instant};

use super::input::{Point, PointerId, Rect};
use super::signal::{DragEnd, DragStart, DropTarget, ItemPress};
use crate::constant::{DRAG_THRESHOLD, LONG_PRESS_MS};
use crate::domain::board::{ContainerId, ItemId};

/// Thresholds for telling a long press from a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragConfig {
    /// Hold time before a stationary press requests the editor (default: 500ms).
    pub long_press: Duration,
    /// Pointer travel in pixels before a press becomes a drag (default: 5).
    pub drag_threshold: f32,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            long_press: Duration::from_millis(LONG_PRESS_MS),
            drag_threshold: DRAG_THRESHOLD,
        }
    }
}

/// Handle of a scheduled long-press timer.
///
/// Every press gets a fresh id, so a timer that fires after its press was
/// resolved is recognized as stale and ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LongPressTimer {
    pub id: TimerId,
    pub deadline: Instant,
}

impl LongPressTimer {
    pub fn is_due(&self, now: Instant) -> bool {
        now >= self.deadline
    }
}

/// Floating copy of the dragged item that follows the pointer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Mirror {
    pub item: ItemId,
    /// Top-left corner on screen.
    pub position: Point,
    /// Pointer offset from the item's top-left corner at press time.
    pub grab_offset: Point,
    pub width: f32,
    pub height: f32,
}

impl Mirror {
    fn follow(&mut self, pointer: Point) {
        self.position = Point::new(pointer.x - self.grab_offset.x, pointer.y - self.grab_offset.y);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionState {
    /// Pointer is down; waiting for either the timer or enough movement.
    Pressing { timer: LongPressTimer },
    /// Item is following the pointer; `target` is the current drop target.
    Dragging {
        mirror: Mirror,
        target: Option<DropTarget>,
    },
}

/// Observable phase of the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragPhase {
    Idle,
    Pressing,
    Dragging,
}

/// A press on an item, possibly turned into a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragSession {
    pub item: ItemId,
    pub from_container: ContainerId,
    pub from_index: usize,
    pub pointer_origin: Point,
    pub pointer: PointerId,
    /// Bounds of the pressed item at press time.
    pub item_rect: Rect,
    pub state: SessionState,
}

impl DragSession {
    pub fn press(
        press: ItemPress,
        pointer: PointerId,
        origin: Point,
        item_rect: Rect,
        timer: LongPressTimer,
    ) -> Self {
        Self {
            item: press.item,
            from_container: press.container,
            from_index: press.index,
            pointer_origin: origin,
            pointer,
            item_rect,
            state: SessionState::Pressing { timer },
        }
    }

    pub fn phase(&self) -> DragPhase {
        match self.state {
            SessionState::Pressing { .. } => DragPhase::Pressing,
            SessionState::Dragging { .. } => DragPhase::Dragging,
        }
    }

    pub fn timer(&self) -> Option<LongPressTimer> {
        match self.state {
            SessionState::Pressing { timer } => Some(timer),
            SessionState::Dragging { .. } => None,
        }
    }

    pub fn mirror(&self) -> Option<&Mirror> {
        match &self.state {
            SessionState::Dragging { mirror, .. } => Some(mirror),
            SessionState::Pressing { .. } => None,
        }
    }

    pub fn target(&self) -> Option<&DropTarget> {
        match &self.state {
            SessionState::Dragging { target, .. } => target.as_ref(),
            SessionState::Pressing { .. } => None,
        }
    }

    /// Whether the pointer has travelled far enough to start dragging.
    pub fn exceeds_threshold(&self, position: Point, threshold: f32) -> bool {
        self.pointer_origin.distance(position) >= threshold
    }

    /// Leave `Pressing` for `Dragging`, dropping the long-press timer.
    pub fn begin_drag(&mut self, position: Point) {
        let mut mirror = Mirror {
            item: self.item,
            position: Point::new(self.item_rect.x, self.item_rect.y),
            grab_offset: Point::new(
                self.pointer_origin.x - self.item_rect.x,
                self.pointer_origin.y - self.item_rect.y,
            ),
            width: self.item_rect.width,
            height: self.item_rect.height,
        };
        mirror.follow(position);
        self.state = SessionState::Dragging {
            mirror,
            target: None,
        };
    }

    /// Move the mirror and record the drop target under the pointer.
    pub fn update_drag(&mut self, position: Point, new_target: Option<DropTarget>) {
        if let SessionState::Dragging { mirror, target } = &mut self.state {
            mirror.follow(position);
            *target = new_target;
        }
    }

    pub fn item_press(&self) -> ItemPress {
        ItemPress {
            item: self.item,
            container: self.from_container.clone(),
            index: self.from_index,
        }
    }

    pub fn drag_start(&self) -> DragStart {
        DragStart {
            item: self.item,
            from_container: self.from_container.clone(),
            from_index: self.from_index,
        }
    }

    pub fn drag_end(&self, dropped: bool) -> DragEnd {
        DragEnd {
            item: self.item,
            from_container: self.from_container.clone(),
            from_index: self.from_index,
            dropped,
        }
    }
}
