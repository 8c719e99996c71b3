// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/registry.rs
//
// Container registry: mounted drop targets, their geometry and callbacks.

use std::fmt;

use super::input::{Point, Rect};
use super::signal::{DragEnd, DragStart, DropEvent, FileDrop, ItemPress};
use crate::domain::board::{ContainerId, ItemId};

/// How a container lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListAxis {
    /// Single row, left to right.
    Horizontal,
    /// Single column, top to bottom.
    Vertical,
    /// Rows that wrap, read left to right then top to bottom.
    #[default]
    Wrapping,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotKind {
    Item(ItemId),
    /// "Drop here" placeholder shown in empty rows; always sorts last.
    Empty,
}

/// One rendered child of a container.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Slot {
    pub kind: SlotKind,
    pub rect: Rect,
}

impl Slot {
    pub fn item(id: ItemId, rect: Rect) -> Self {
        Self {
            kind: SlotKind::Item(id),
            rect,
        }
    }

    pub fn empty(rect: Rect) -> Self {
        Self {
            kind: SlotKind::Empty,
            rect,
        }
    }
}

/// Geometry of a mounted container, queried at hit-test time.
pub trait ContainerSurface {
    /// Current bounds on screen.
    fn bounds(&self) -> Rect;

    /// Current children in list order.
    fn slots(&self) -> Vec<Slot>;

    fn axis(&self) -> ListAxis {
        ListAxis::Wrapping
    }
}

/// Callbacks of a mounted container.
pub trait ContainerHandler {
    /// An item was released over this container. The handler owns the list
    /// mutation and must tolerate a stale `from_index`.
    fn on_drop(&mut self, event: &DropEvent);

    fn on_drag_start(&mut self, _event: &DragStart) {}

    fn on_drag_end(&mut self, _event: &DragEnd) {}

    fn on_click(&mut self, _press: &ItemPress) {}

    fn on_file_drop(&mut self, _drop: &FileDrop) {}
}

struct ContainerEntry {
    id: ContainerId,
    surface: Box<dyn ContainerSurface>,
    handler: Box<dyn ContainerHandler>,
}

/// Registry of mounted containers in registration order.
///
/// At most one entry per id: registering again replaces the old entry in
/// place. Owners must unregister on unmount, otherwise the stale surface is
/// still hit-tested.
#[derive(Default)]
pub struct ContainerRegistry {
    entries: Vec<ContainerEntry>,
}

impl fmt::Debug for ContainerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|e| &e.id))
            .finish()
    }
}

impl ContainerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(
        &mut self,
        id: ContainerId,
        surface: Box<dyn ContainerSurface>,
        handler: Box<dyn ContainerHandler>,
    ) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == id) {
            log::debug!("Replacing container {id}");
            entry.surface = surface;
            entry.handler = handler;
            return;
        }
        log::debug!("Registering container {id}");
        self.entries.push(ContainerEntry {
            id,
            surface,
            handler,
        });
    }

    /// Remove a container. Returns whether it was registered.
    pub fn unregister(&mut self, id: &ContainerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| &e.id != id);
        let removed = self.entries.len() != before;
        if removed {
            log::debug!("Unregistered container {id}");
        }
        removed
    }

    pub fn contains(&self, id: &ContainerId) -> bool {
        self.entries.iter().any(|e| &e.id == id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn ids(&self) -> impl Iterator<Item = &ContainerId> {
        self.entries.iter().map(|e| &e.id)
    }

    /// First container, in registration order, whose bounds contain `point`.
    pub fn find_container_at(&self, point: Point) -> Option<&ContainerId> {
        self.entries
            .iter()
            .find(|e| e.surface.bounds().contains(point))
            .map(|e| &e.id)
    }

    pub fn surface(&self, id: &ContainerId) -> Option<&dyn ContainerSurface> {
        self.entries
            .iter()
            .find(|e| &e.id == id)
            .map(|e| e.surface.as_ref())
    }

    pub fn handler_mut(
        &mut self,
        id: &ContainerId,
    ) -> Option<&mut (dyn ContainerHandler + 'static)> {
        self.entries
            .iter_mut()
            .find(|e| &e.id == id)
            .map(|e| e.handler.as_mut())
    }
}

/// Item under `point`, its index among item slots, and its rect.
pub fn item_at(slots: &[Slot], point: Point) -> Option<(usize, ItemId, Rect)> {
    slots
        .iter()
        .filter_map(|slot| match slot.kind {
            SlotKind::Item(id) => Some((id, slot.rect)),
            SlotKind::Empty => None,
        })
        .enumerate()
        .find(|(_, (_, rect))| rect.contains(point))
        .map(|(index, (id, rect))| (index, id, rect))
}

/// Whether `rect`'s midpoint comes before `point` in reading order.
fn precedes(rect: &Rect, point: Point, axis: ListAxis) -> bool {
    let mid = rect.center();
    match axis {
        ListAxis::Horizontal => point.x > mid.x,
        ListAxis::Vertical => point.y > mid.y,
        ListAxis::Wrapping => {
            point.y >= rect.bottom() || (point.y >= rect.y && point.x > mid.x)
        }
    }
}

/// Insertion index for `point`: the number of item siblings whose midpoint
/// precedes it. The dragged item and empty placeholders are not counted, so
/// the index addresses the list after the dragged item is removed.
pub fn insertion_index(slots: &[Slot], axis: ListAxis, point: Point, dragged: ItemId) -> usize {
    slots
        .iter()
        .filter(|slot| matches!(slot.kind, SlotKind::Item(id) if id != dragged))
        .filter(|slot| precedes(&slot.rect, point, axis))
        .count()
}
