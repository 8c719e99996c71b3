// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/drag/file_drop.rs
//
// Native OS file drag-and-drop, kept apart from the pointer drag engine.

use std::path::{Path, PathBuf};

use image::ImageFormat;

use super::input::Point;
use super::registry::ContainerRegistry;
use super::signal::FileDrop;
use crate::domain::board::ContainerId;

/// Platform drag type that announces a file list.
pub const FILES_TYPE: &str = "Files";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NativeDragKind {
    Enter,
    Over,
    Leave,
    Drop,
}

/// Data carried by a platform drag.
///
/// Some platforms only reveal the file paths on drop; the announced `types`
/// are enough to classify the drag on enter.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct DragPayload {
    pub types: Vec<String>,
    pub files: Vec<PathBuf>,
}

impl DragPayload {
    pub fn files(files: Vec<PathBuf>) -> Self {
        Self {
            types: vec![FILES_TYPE.to_string()],
            files,
        }
    }

    pub fn text() -> Self {
        Self {
            types: vec!["text/plain".to_string()],
            files: Vec::new(),
        }
    }

    pub fn has_files(&self) -> bool {
        !self.files.is_empty() || self.types.iter().any(|t| t == FILES_TYPE)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct NativeDragEvent {
    pub kind: NativeDragKind,
    pub position: Point,
    pub payload: DragPayload,
}

/// Whether `path` has an image extension the decoder understands.
pub fn is_image_path(path: &Path) -> bool {
    ImageFormat::from_path(path).is_ok_and(|format| format.reading_enabled())
}

/// Listener for external file drops onto registered containers.
///
/// Only drags whose payload carries files are handled; everything else is
/// left untouched for the platform. It never reads or writes the pointer
/// drag session.
#[derive(Debug, Default)]
pub struct FileDropListener {
    hover: Option<ContainerId>,
}

impl FileDropListener {
    pub fn accepts(event: &NativeDragEvent) -> bool {
        event.payload.has_files()
    }

    /// Container currently highlighted as a file drop target.
    pub fn hover(&self) -> Option<&ContainerId> {
        self.hover.as_ref()
    }

    /// Handle one native drag event. Returns the drop, if the event released
    /// image files over a container.
    pub fn handle(
        &mut self,
        registry: &mut ContainerRegistry,
        event: &NativeDragEvent,
    ) -> Option<FileDrop> {
        if !Self::accepts(event) {
            return None;
        }

        match event.kind {
            NativeDragKind::Enter | NativeDragKind::Over => {
                self.hover = registry.find_container_at(event.position).cloned();
                None
            }
            NativeDragKind::Leave => {
                self.hover = None;
                None
            }
            NativeDragKind::Drop => {
                self.hover = None;
                let container = registry.find_container_at(event.position)?.clone();

                let files: Vec<PathBuf> = event
                    .payload
                    .files
                    .iter()
                    .filter(|path| is_image_path(path))
                    .cloned()
                    .collect();
                if files.is_empty() {
                    log::debug!("Ignoring file drop on {container}: no image files");
                    return None;
                }

                let drop = FileDrop {
                    container,
                    position: event.position,
                    files,
                };
                if let Some(handler) = registry.handler_mut(&drop.container) {
                    handler.on_file_drop(&drop);
                }
                log::debug!("Dropped {} file(s) on {}", drop.files.len(), drop.container);
                Some(drop)
            }
        }
    }
}
