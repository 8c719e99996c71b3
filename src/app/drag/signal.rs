// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/signal.rs
//
// Drag coordinator output: callback payloads and emitted signals.

use std::path::PathBuf;

use super::input::Point;
use crate::domain::board::{ContainerId, ItemId};

/// An item pressed at a position inside a container.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemPress {
    pub item: ItemId,
    pub container: ContainerId,
    pub index: usize,
}

/// Passed to the source container when a press turns into a drag.
#[derive(Debug, Clone, PartialEq)]
pub struct DragStart {
    pub item: ItemId,
    pub from_container: ContainerId,
    pub from_index: usize,
}

/// Passed to the destination container on drop. The receiver owns the
/// list mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct DropEvent {
    pub item: ItemId,
    pub from_container: ContainerId,
    pub from_index: usize,
    pub to_container: ContainerId,
    pub to_index: usize,
}

impl DropEvent {
    pub fn is_reorder(&self) -> bool {
        self.from_container == self.to_container
    }
}

/// Passed to the source container when a drag ends either way.
#[derive(Debug, Clone, PartialEq)]
pub struct DragEnd {
    pub item: ItemId,
    pub from_container: ContainerId,
    pub from_index: usize,
    pub dropped: bool,
}

/// External files released over a container.
#[derive(Debug, Clone, PartialEq)]
pub struct FileDrop {
    pub container: ContainerId,
    pub position: Point,
    pub files: Vec<PathBuf>,
}

/// Where a drop would land right now.
#[derive(Debug, Clone, PartialEq)]
pub struct DropTarget {
    pub container: ContainerId,
    pub index: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancelReason {
    /// Released outside every registered container.
    NoTarget,
    /// The host aborted the drag (a modal opened, Escape, ...).
    External,
    /// The platform cancelled the pointer stream.
    PointerCancelled,
}

/// Semantic events produced by the drag coordinator.
#[derive(Debug, Clone, PartialEq)]
pub enum DragSignal {
    /// Pointer went down on an item; drag or long press still undecided.
    PressStarted(ItemPress),
    /// Press-and-hold elapsed: open the item editor.
    EditRequested(ItemPress),
    /// Released before moving or holding.
    Clicked(ItemPress),
    DragStarted(DragStart),
    /// Mirror moved; `target` is the current drop target, if any.
    DragMoved {
        position: Point,
        target: Option<DropTarget>,
    },
    Dropped(DropEvent),
    Cancelled {
        item: ItemId,
        reason: CancelReason,
    },
}
