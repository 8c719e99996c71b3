// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/message.rs
//
// Application messages: pointer input, timers, and editor actions.

use std::time::Instant;

use crate::app::drag::{NativeDragEvent, PointerEvent, TimerId};
use crate::config::AppConfig;
use crate::domain::board::ItemId;
use crate::domain::crop::CropDescriptor;

#[derive(Debug, Clone)]
pub enum AppMessage {
    // Pointer input.
    PointerDown(PointerEvent, Instant),
    PointerMove(PointerEvent, Instant),
    PointerUp(PointerEvent, Instant),
    PointerCancel(PointerEvent),

    // Timers.
    Tick(Instant),
    LongPressElapsed(TimerId),

    // Native OS drag (files).
    NativeDrag(NativeDragEvent),

    // Image loading.
    ImageLoaded {
        item: ItemId,
        width: u32,
        height: u32,
    },

    // Editor.
    OpenEditor(ItemId),
    CloseEditor,
    SetCrop {
        item: ItemId,
        crop: Option<CropDescriptor>,
    },

    /// Settings were edited; applies to the next press.
    ConfigChanged(AppConfig),

    /// Escape pressed or a modal took over.
    CancelDrag,
}
