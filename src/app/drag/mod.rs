// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/mod.rs
//
// Pointer-driven drag and drop between registered containers.

mod coordinator;
mod file_drop;
mod handler;
mod input;
mod registry;
mod session;
mod signal;

pub use coordinator::DragCoordinator;
pub use file_drop::{is_image_path, DragPayload, FileDropListener, NativeDragEvent, NativeDragKind};
pub use handler::BoardDropHandler;
pub use input::{Point, PointerButton, PointerEvent, PointerId, Rect};
pub use registry::{
    insertion_index, item_at, ContainerHandler, ContainerRegistry, ContainerSurface, ListAxis,
    Slot, SlotKind,
};
pub use session::{DragConfig, DragPhase, DragSession, LongPressTimer, Mirror, SessionState, TimerId};
pub use signal::{
    CancelReason, DragEnd, DragSignal, DragStart, DropEvent, DropTarget, FileDrop, ItemPress,
};
