// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/mod.rs
//
// Crop geometry engine: descriptors, pure geometry and render strategy.

pub mod descriptor;
pub mod geometry;
pub mod strategy;

pub use descriptor::{CropDescriptor, CustomCrop, PresetAnchor, UnknownAnchor};
pub use geometry::{
    adapt_crop_to_ratio, cover_rect, normalize_crop_resolution, CropRect, PixelRect,
};
pub use strategy::{
    auto_anchor, resolve_for_size, resolve_render_rect, resolve_source_rect, RenderInstruction,
    TargetRenderRect,
};
