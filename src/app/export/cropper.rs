// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/export/cropper.rs
//
// Export-time cropping: rasterize exactly the region the live view shows.

use image::imageops::{self, FilterType};
use image::{DynamicImage, GenericImageView, RgbaImage};

use crate::domain::crop::{resolve_for_size, resolve_source_rect, CropDescriptor, PixelRect};

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("image has not been decoded")]
    NotDecoded,
    #[error("image pixels cannot be read back")]
    Tainted,
    #[error("crop region is empty or outside the image")]
    EmptyRegion,
    #[error("invalid output size {width}x{height}")]
    InvalidOutputSize { width: u32, height: u32 },
    #[error("no raster image encoder for {0}")]
    UnsupportedFormat(String),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

/// Decoded pixels an export can draw from.
pub trait ExportSource {
    /// Natural pixel size, `None` if nothing usable is loaded.
    fn natural_size(&self) -> Option<(u32, u32)>;

    /// Draw `region` of the source scaled to `width x height`.
    fn draw_region(
        &self,
        region: PixelRect,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, ExportError>;

    /// Draw the whole source scaled to `width x height`.
    fn draw_scaled(&self, width: u32, height: u32, filter: FilterType)
    -> Result<RgbaImage, ExportError>;
}

impl ExportSource for DynamicImage {
    fn natural_size(&self) -> Option<(u32, u32)> {
        let (width, height) = self.dimensions();
        (width > 0 && height > 0).then_some((width, height))
    }

    fn draw_region(
        &self,
        region: PixelRect,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, ExportError> {
        check_output_size(width, height)?;
        let (natural_width, natural_height) = self.dimensions();
        let fits = region.width > 0
            && region.height > 0
            && region.x.checked_add(region.width).is_some_and(|r| r <= natural_width)
            && region.y.checked_add(region.height).is_some_and(|b| b <= natural_height);
        if !fits {
            return Err(ExportError::EmptyRegion);
        }

        let (x, y, w, h) = region.as_tuple();
        Ok(self
            .crop_imm(x, y, w, h)
            .resize_exact(width, height, filter)
            .to_rgba8())
    }

    fn draw_scaled(
        &self,
        width: u32,
        height: u32,
        filter: FilterType,
    ) -> Result<RgbaImage, ExportError> {
        check_output_size(width, height)?;
        Ok(self.resize_exact(width, height, filter).to_rgba8())
    }
}

fn check_output_size(width: u32, height: u32) -> Result<(), ExportError> {
    if width == 0 || height == 0 {
        return Err(ExportError::InvalidOutputSize { width, height });
    }
    Ok(())
}

/// Crop `source` to the region `descriptor` selects at the output aspect
/// ratio and scale it to `width x height`.
pub fn crop_for_export(
    source: &dyn ExportSource,
    descriptor: &CropDescriptor,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ExportError> {
    check_output_size(width, height)?;
    let (natural_width, natural_height) = source.natural_size().ok_or(ExportError::NotDecoded)?;

    let target_ratio = f64::from(width) / f64::from(height);
    let rect = resolve_source_rect(
        descriptor,
        f64::from(natural_width),
        f64::from(natural_height),
        target_ratio,
    )
    .filter(|rect| rect.is_valid())
    .ok_or(ExportError::EmptyRegion)?;

    let region = PixelRect::from_crop(&rect, natural_width, natural_height);
    source.draw_region(region, width, height, filter)
}

/// Paint the whole image overscaled and offset on a fixed-size canvas, the
/// way the live view places it. Same visible region, lower fidelity.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn render_fallback(
    source: &dyn ExportSource,
    descriptor: &CropDescriptor,
    width: u32,
    height: u32,
    filter: FilterType,
) -> Result<RgbaImage, ExportError> {
    check_output_size(width, height)?;
    let (natural_width, natural_height) = source.natural_size().ok_or(ExportError::NotDecoded)?;

    let instruction = resolve_for_size(
        descriptor,
        f64::from(natural_width),
        f64::from(natural_height),
        f64::from(width),
        f64::from(height),
    );
    let placement = instruction.rect().ok_or(ExportError::EmptyRegion)?;

    let draw_width = placement.draw_width.round().max(1.0) as u32;
    let draw_height = placement.draw_height.round().max(1.0) as u32;
    let scaled = source.draw_scaled(draw_width, draw_height, filter)?;

    let mut canvas = RgbaImage::new(width, height);
    imageops::overlay(
        &mut canvas,
        &scaled,
        placement.offset_x.round() as i64,
        placement.offset_y.round() as i64,
    );
    Ok(canvas)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileMethod {
    /// True sub-rectangle crop.
    SubRect,
    /// Overscale-and-offset placement after the crop failed.
    Fallback,
    /// Nothing could be drawn; transparent tile.
    Blank,
}

#[derive(Debug, Clone)]
pub struct ExportTile {
    pub image: RgbaImage,
    pub method: TileMethod,
}

impl ExportTile {
    pub fn blank(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            method: TileMethod::Blank,
        }
    }
}

/// Render one card for export, degrading to the fallback and then to a
/// blank tile. Never fails.
pub fn export_tile(
    source: Option<&dyn ExportSource>,
    descriptor: &CropDescriptor,
    width: u32,
    height: u32,
    filter: FilterType,
) -> ExportTile {
    let Some(source) = source else {
        return ExportTile::blank(width, height);
    };

    match crop_for_export(source, descriptor, width, height, filter) {
        Ok(image) => {
            return ExportTile {
                image,
                method: TileMethod::SubRect,
            };
        }
        Err(err) => log::warn!("Crop failed, using overscale fallback: {err}"),
    }

    match render_fallback(source, descriptor, width, height, filter) {
        Ok(image) => ExportTile {
            image,
            method: TileMethod::Fallback,
        },
        Err(err) => {
            log::warn!("Fallback render failed, exporting blank tile: {err}");
            ExportTile::blank(width, height)
        }
    }
}
