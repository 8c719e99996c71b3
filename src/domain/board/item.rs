// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/board/item.rs
//
// Ranked item: an image entry placed into a tier slot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::domain::crop::CropDescriptor;

/// Stable identity of an item across moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(pub u64);

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An entry on the board (anime, game, character, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Item {
    pub id: ItemId,
    pub title: String,
    /// Image location (file path or URL), resolved by the loader.
    pub image: String,
    /// Decoded pixel width; `None` until the image has loaded.
    #[serde(skip)]
    pub natural_width: Option<u32>,
    /// Decoded pixel height; `None` until the image has loaded.
    #[serde(skip)]
    pub natural_height: Option<u32>,
    /// Crop chosen in the item editor. `None` behaves like `Auto`.
    #[serde(default, rename = "cropPosition", skip_serializing_if = "Option::is_none")]
    pub crop: Option<CropDescriptor>,
}

impl Item {
    pub fn new(id: ItemId, title: impl Into<String>, image: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            image: image.into(),
            natural_width: None,
            natural_height: None,
            crop: None,
        }
    }

    /// Natural dimensions, only once both are known and non-zero.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match (self.natural_width, self.natural_height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Called by the image loader once the bitmap has decoded.
    pub fn set_natural_size(&mut self, width: u32, height: u32) {
        self.natural_width = Some(width);
        self.natural_height = Some(height);
    }

    pub fn crop_descriptor(&self) -> CropDescriptor {
        self.crop.unwrap_or_default()
    }
}
