// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/geometry.rs
//
// Pure crop geometry: resolution normalization, ratio adaptation, cover rects.

use serde::{Deserialize, Serialize};

use super::descriptor::PresetAnchor;
use crate::constant::RATIO_EPSILON;

/// Crop rectangle in natural image pixels.
///
/// Pure domain model, fractional so that rescaling between resolutions does
/// not accumulate rounding. Raster consumers convert through [`PixelRect`].
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl CropRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Center point (cx, cy).
    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Width over height, `None` for a zero or non-finite height.
    pub fn ratio(&self) -> Option<f64> {
        let ratio = self.width / self.height;
        (ratio.is_finite() && ratio > 0.0).then_some(ratio)
    }

    /// Check if region has usable dimensions.
    pub fn is_valid(&self) -> bool {
        positive(self.width) && positive(self.height) && self.x.is_finite() && self.y.is_finite()
    }

    /// Grow each axis to at least the given size around the center.
    pub fn grown_to(&self, min_width: f64, min_height: f64) -> Self {
        let (cx, cy) = self.center();
        let width = self.width.max(min_width);
        let height = self.height.max(min_height);
        Self::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    /// Scale every field by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self::new(
            self.x * factor,
            self.y * factor,
            self.width * factor,
            self.height * factor,
        )
    }

    /// Clamp into `[0, natural_width] x [0, natural_height]`, shrinking the
    /// size first when it does not fit.
    pub fn clamp_to(&self, natural_width: f64, natural_height: f64) -> Self {
        let width = self.width.max(0.0).min(natural_width);
        let height = self.height.max(0.0).min(natural_height);
        Self::new(
            self.x.min(natural_width - width).max(0.0),
            self.y.min(natural_height - height).max(0.0),
            width,
            height,
        )
    }
}

/// Integer crop region for raster drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelRect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelRect {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Round a fractional rect to whole pixels inside the image.
    ///
    /// Edges are rounded rather than origin and size separately, so two
    /// adjacent rects never overlap or leave a seam. The result is at least
    /// 1x1 as long as the image itself is non-empty.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_crop(rect: &CropRect, natural_width: u32, natural_height: u32) -> Self {
        let max_x = f64::from(natural_width);
        let max_y = f64::from(natural_height);

        let left = rect.x.round().clamp(0.0, max_x) as u32;
        let top = rect.y.round().clamp(0.0, max_y) as u32;
        let right = (rect.x + rect.width).round().clamp(0.0, max_x) as u32;
        let bottom = (rect.y + rect.height).round().clamp(0.0, max_y) as u32;

        let left = left.min(natural_width.saturating_sub(1));
        let top = top.min(natural_height.saturating_sub(1));
        let width = right.saturating_sub(left).max(1).min(natural_width - left);
        let height = bottom.saturating_sub(top).max(1).min(natural_height - top);

        Self::new(left, top, width, height)
    }

    pub fn as_tuple(&self) -> (u32, u32, u32, u32) {
        (self.x, self.y, self.width, self.height)
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

/// Rescale a rectangle recorded against `reference_width` so it addresses the
/// same region of the image served at `current_natural_width`.
///
/// A zero, negative or non-finite width on either side leaves the rectangle
/// untouched.
pub fn normalize_crop_resolution(
    rect: CropRect,
    current_natural_width: f64,
    reference_width: f64,
) -> CropRect {
    if !positive(reference_width) || !positive(current_natural_width) {
        return rect;
    }
    if current_natural_width == reference_width {
        return rect;
    }
    rect.scaled(current_natural_width / reference_width)
}

/// Reshape `rect` to `target_ratio` (width / height) around its center,
/// never reaching outside the natural image bounds.
///
/// The axis the ratio demands is grown; when growth would leave the image,
/// that axis is pinned to the image edge and the other axis shrinks instead.
/// Degenerate inputs come back unchanged, a zero-area rect becomes the
/// centered cover rect.
pub fn adapt_crop_to_ratio(
    rect: CropRect,
    target_ratio: f64,
    natural_width: f64,
    natural_height: f64,
) -> CropRect {
    if !positive(target_ratio) || !positive(natural_width) || !positive(natural_height) {
        return rect;
    }

    let mut width = rect.width.min(natural_width);
    let mut height = rect.height.min(natural_height);
    if !positive(width) || !positive(height) {
        return cover_rect(target_ratio, natural_width, natural_height, PresetAnchor::Center);
    }

    let current = width / height;
    let resized = width != rect.width || height != rect.height;
    let reshape = (current - target_ratio).abs() > RATIO_EPSILON * target_ratio;

    if !resized && !reshape {
        return rect.clamp_to(natural_width, natural_height);
    }

    if reshape {
        if target_ratio > current {
            width = height * target_ratio;
            if width > natural_width {
                width = natural_width;
                height = width / target_ratio;
            }
        } else {
            height = width / target_ratio;
            if height > natural_height {
                height = natural_height;
                width = height * target_ratio;
            }
        }
    }

    let (cx, cy) = rect.center();
    CropRect::new(
        (cx - width / 2.0).min(natural_width - width).max(0.0),
        (cy - height / 2.0).min(natural_height - height).max(0.0),
        width,
        height,
    )
}

/// Largest rectangle of `target_ratio` that fits inside the image, placed at
/// `anchor` (the `object-fit: cover` source region).
pub fn cover_rect(
    target_ratio: f64,
    natural_width: f64,
    natural_height: f64,
    anchor: PresetAnchor,
) -> CropRect {
    if !positive(target_ratio) || !positive(natural_width) || !positive(natural_height) {
        return CropRect::new(0.0, 0.0, natural_width.max(0.0), natural_height.max(0.0));
    }

    let image_ratio = natural_width / natural_height;
    let (width, height) = if image_ratio > target_ratio {
        (natural_height * target_ratio, natural_height)
    } else {
        (natural_width, natural_width / target_ratio)
    };

    let (fx, fy) = anchor.fractions();
    CropRect::new(
        (natural_width - width) * fx,
        (natural_height - height) * fy,
        width,
        height,
    )
}
