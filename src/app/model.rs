// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/model.rs
//
// Application state.

use std::cell::RefCell;
use std::rc::Rc;

use crate::app::drag::{
    BoardDropHandler, CancelReason, ContainerSurface, DragCoordinator, DragSignal,
};
use crate::config::AppConfig;
use crate::domain::board::{ContainerId, ItemId, TierBoard};
use crate::domain::crop::{resolve_render_rect, CropDescriptor, RenderInstruction};

pub struct AppModel {
    // Data.
    pub board: Rc<RefCell<TierBoard>>,

    // Interaction.
    pub coordinator: DragCoordinator,
    /// Item whose crop editor is open.
    pub editing: Option<ItemId>,

    pub config: AppConfig,

    // UI state.
    pub error: Option<String>,
}

impl AppModel {
    pub fn new(board: TierBoard, config: AppConfig) -> Self {
        Self {
            board: Rc::new(RefCell::new(board)),
            coordinator: DragCoordinator::new(config.drag_config()),
            editing: None,
            config,
            error: None,
        }
    }

    pub fn set_error<S: Into<String>>(&mut self, msg: S) {
        self.error = Some(msg.into());
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// Swap in new settings. A press already in flight keeps its long-press
    /// deadline.
    pub fn set_config(&mut self, config: AppConfig) {
        self.coordinator.set_config(config.drag_config());
        self.config = config;
    }

    /// Register a rendered container; drops on it move items on the board.
    pub fn mount_container(&mut self, id: ContainerId, surface: Box<dyn ContainerSurface>) {
        let handler = BoardDropHandler::new(Rc::clone(&self.board), id.clone());
        self.coordinator
            .registry_mut()
            .register(id, surface, Box::new(handler));
    }

    pub fn unmount_container(&mut self, id: &ContainerId) {
        self.coordinator.registry_mut().unregister(id);
    }

    /// Open the crop editor for `item`, aborting any drag in flight.
    pub fn open_editor(&mut self, item: ItemId) -> Vec<DragSignal> {
        let signals = self.coordinator.cancel(CancelReason::External);
        if self.board.borrow().position_of(item).is_some() {
            self.editing = Some(item);
        }
        signals
    }

    pub fn close_editor(&mut self) {
        self.editing = None;
    }

    /// Store the crop chosen in the editor. `None` resets to automatic.
    pub fn set_crop(&mut self, item: ItemId, crop: Option<CropDescriptor>) -> bool {
        let mut board = self.board.borrow_mut();
        let Some(entry) = board.items_mut().find(|i| i.id == item) else {
            return false;
        };
        entry.crop = crop;
        log::debug!("Crop of {item} set to {crop:?}");
        true
    }

    pub fn set_natural_size(&mut self, item: ItemId, width: u32, height: u32) -> bool {
        let mut board = self.board.borrow_mut();
        let Some(entry) = board.items_mut().find(|i| i.id == item) else {
            return false;
        };
        entry.set_natural_size(width, height);
        true
    }

    /// How to paint `item` inside a card of the configured size.
    pub fn render_instruction(&self, item: ItemId) -> RenderInstruction {
        let board = self.board.borrow();
        board
            .items()
            .find(|i| i.id == item)
            .map_or(RenderInstruction::Hidden, |i| {
                resolve_render_rect(
                    i,
                    f64::from(self.config.card_width),
                    f64::from(self.config.card_height),
                )
            })
    }
}
