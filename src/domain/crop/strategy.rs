// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/strategy.rs
//
// Turns an item and its crop descriptor into render instructions.

use super::descriptor::{CropDescriptor, PresetAnchor};
use super::geometry::{adapt_crop_to_ratio, cover_rect, normalize_crop_resolution, CropRect};
use crate::constant::{AUTO_TALL_TOLERANCE, MIN_CROP_SIZE};
use crate::domain::board::Item;

/// Overscale-and-offset placement of the whole natural image inside a card.
///
/// Drawing the full image at `draw_width x draw_height`, translated by
/// `(offset_x, offset_y)` and clipped to the card, shows exactly `source`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRenderRect {
    pub draw_width: f64,
    pub draw_height: f64,
    pub offset_x: f64,
    pub offset_y: f64,
    /// Region of the natural image that ends up visible.
    pub source: CropRect,
}

/// What the live view should paint for an item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RenderInstruction {
    /// Natural size unknown yet; painting now would flash a wrong crop.
    Hidden,
    Visible(TargetRenderRect),
}

impl RenderInstruction {
    pub fn is_hidden(&self) -> bool {
        matches!(self, Self::Hidden)
    }

    pub fn rect(&self) -> Option<&TargetRenderRect> {
        match self {
            Self::Hidden => None,
            Self::Visible(rect) => Some(rect),
        }
    }
}

/// Anchor used by [`CropDescriptor::Auto`].
///
/// Images clearly taller than the card keep their top (portrait art usually
/// has the face there); everything else is centered.
pub fn auto_anchor(natural_width: f64, natural_height: f64, target_ratio: f64) -> PresetAnchor {
    let image_ratio = natural_width / natural_height;
    if image_ratio < target_ratio * (1.0 - AUTO_TALL_TOLERANCE) {
        PresetAnchor::TopCenter
    } else {
        PresetAnchor::Center
    }
}

/// Region of the natural image shown for `descriptor` at `target_ratio`.
///
/// Every consumer (live view, edit preview, export) goes through here, so a
/// custom rect is always normalized to the current resolution first and only
/// then adapted to the ratio. A custom rect smaller than one pixel is grown
/// to one pixel around its center. Returns `None` for unusable dimensions.
pub fn resolve_source_rect(
    descriptor: &CropDescriptor,
    natural_width: f64,
    natural_height: f64,
    target_ratio: f64,
) -> Option<CropRect> {
    let usable = |v: f64| v.is_finite() && v > 0.0;
    if !usable(natural_width) || !usable(natural_height) || !usable(target_ratio) {
        return None;
    }

    let rect = match descriptor {
        CropDescriptor::Auto => {
            let anchor = auto_anchor(natural_width, natural_height, target_ratio);
            cover_rect(target_ratio, natural_width, natural_height, anchor)
        }
        CropDescriptor::Preset { anchor } => {
            cover_rect(target_ratio, natural_width, natural_height, *anchor)
        }
        CropDescriptor::Custom(custom) => {
            let normalized =
                normalize_crop_resolution(custom.rect(), natural_width, custom.reference_width)
                    .grown_to(
                        MIN_CROP_SIZE.min(natural_width),
                        MIN_CROP_SIZE.min(natural_height),
                    );
            adapt_crop_to_ratio(normalized, target_ratio, natural_width, natural_height)
        }
    };

    Some(rect)
}

/// Placement for an image of the given natural size inside a
/// `container_width x container_height` card.
pub fn resolve_for_size(
    descriptor: &CropDescriptor,
    natural_width: f64,
    natural_height: f64,
    container_width: f64,
    container_height: f64,
) -> RenderInstruction {
    let target_ratio = container_width / container_height;
    let Some(source) =
        resolve_source_rect(descriptor, natural_width, natural_height, target_ratio)
    else {
        return RenderInstruction::Hidden;
    };
    if !source.is_valid() {
        return RenderInstruction::Hidden;
    }

    let scale = container_width / source.width;
    let rect = TargetRenderRect {
        draw_width: natural_width * scale,
        draw_height: natural_height * scale,
        offset_x: -source.x * scale,
        offset_y: -source.y * scale,
        source,
    };
    if !(rect.draw_width.is_finite() && rect.draw_height.is_finite()) {
        return RenderInstruction::Hidden;
    }
    RenderInstruction::Visible(rect)
}

/// Render instruction for `item` inside a card of the given pixel size.
pub fn resolve_render_rect(
    item: &Item,
    container_width: f64,
    container_height: f64,
) -> RenderInstruction {
    let Some((natural_width, natural_height)) = item.natural_size() else {
        return RenderInstruction::Hidden;
    };
    resolve_for_size(
        &item.crop_descriptor(),
        f64::from(natural_width),
        f64::from(natural_height),
        container_width,
        container_height,
    )
}
