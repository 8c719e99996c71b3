// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/update.rs
//
// Message dispatch.

use crate::app::drag::{CancelReason, DragSignal};
use crate::app::message::AppMessage;
use crate::app::model::AppModel;

impl AppModel {
    /// Apply one message. Returns the drag signals it produced so the view
    /// can animate them.
    pub fn update(&mut self, message: AppMessage) -> Vec<DragSignal> {
        let signals = match message {
            AppMessage::PointerDown(event, now) => self.coordinator.pointer_down(&event, now),
            AppMessage::PointerMove(event, now) => self.coordinator.pointer_move(&event, now),
            AppMessage::PointerUp(event, now) => self.coordinator.pointer_up(&event, now),
            AppMessage::PointerCancel(event) => self.coordinator.pointer_cancel(&event),
            AppMessage::Tick(now) => self.coordinator.tick(now),
            AppMessage::LongPressElapsed(id) => self.coordinator.on_timer(id),
            AppMessage::CancelDrag => self.coordinator.cancel(CancelReason::External),

            AppMessage::NativeDrag(event) => {
                self.coordinator.handle_native_drag(&event);
                Vec::new()
            }
            AppMessage::ImageLoaded {
                item,
                width,
                height,
            } => {
                self.set_natural_size(item, width, height);
                Vec::new()
            }

            AppMessage::OpenEditor(item) => self.open_editor(item),
            AppMessage::CloseEditor => {
                self.close_editor();
                Vec::new()
            }
            AppMessage::SetCrop { item, crop } => {
                if self.set_crop(item, crop) {
                    self.clear_error();
                } else {
                    self.set_error(format!("Unknown item {item}"));
                }
                Vec::new()
            }
            AppMessage::ConfigChanged(config) => {
                self.set_config(config);
                Vec::new()
            }
        };

        for signal in &signals {
            if let DragSignal::EditRequested(press) = signal {
                self.editing = Some(press.item);
            }
        }
        signals
    }
}
