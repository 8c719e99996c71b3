// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/export/mod.rs
//
// Board export: per-card crops composited into a single tier list sheet.

mod batch;
mod cropper;
mod sheet;

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use image::{DynamicImage, ImageFormat, RgbaImage};

pub use batch::{export_tiles, ExportJob, SharedSource, TileSpec};
pub use cropper::{
    crop_for_export, export_tile, render_fallback, ExportError, ExportSource, ExportTile,
    TileMethod,
};
pub use sheet::{compose_sheet, parse_hex_color, SheetLayout};

use crate::domain::board::{ItemId, TierBoard};

/// Crop every ranked item and composite the sheet.
///
/// `images` holds the decoded images by item; missing entries export as
/// blank cards.
pub async fn export_board(
    board: &TierBoard,
    images: &HashMap<ItemId, Arc<DynamicImage>>,
    layout: &SheetLayout,
    spec: TileSpec,
) -> RgbaImage {
    let jobs: Vec<ExportJob> = board
        .tiers
        .iter()
        .flat_map(|tier| tier.items.iter())
        .map(|item| ExportJob {
            item: item.id,
            source: images
                .get(&item.id)
                .map(|image| Arc::clone(image) as SharedSource),
            descriptor: item.crop_descriptor(),
        })
        .collect();

    let total = jobs.len();
    let tiles = export_tiles(jobs, spec).await;
    let degraded = tiles
        .iter()
        .filter(|(_, tile)| tile.method != TileMethod::SubRect)
        .count();
    if degraded > 0 {
        log::warn!("{degraded} of {total} cards exported without a true crop");
    }

    let tiles: HashMap<ItemId, RgbaImage> = tiles
        .into_iter()
        .map(|(item, tile)| (item, tile.image))
        .collect();
    compose_sheet(board, &tiles, layout)
}

/// Write the sheet as a raster image; the format follows the file extension.
///
/// Document formats such as PDF are rejected.
pub fn save_sheet(sheet: &RgbaImage, path: &Path) -> anyhow::Result<()> {
    let format = ImageFormat::from_path(path)
        .ok()
        .filter(ImageFormat::writing_enabled)
        .ok_or_else(|| ExportError::UnsupportedFormat(path.display().to_string()))?;

    // JPEG has no alpha channel.
    let written = match format {
        ImageFormat::Jpeg => DynamicImage::ImageRgba8(sheet.clone())
            .to_rgb8()
            .save_with_format(path, format),
        _ => sheet.save_with_format(path, format),
    };
    written
        .map_err(ExportError::from)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    log::info!(
        "Wrote {}x{} sheet to {}",
        sheet.width(),
        sheet.height(),
        path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    fn sheet() -> RgbaImage {
        RgbaImage::from_pixel(8, 6, Rgba([200, 40, 40, 255]))
    }

    #[test]
    fn sheet_is_written_as_png() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiers.png");
        save_sheet(&sheet(), &path).unwrap();

        let back = image::open(&path).unwrap().to_rgba8();
        assert_eq!(back.dimensions(), (8, 6));
        assert_eq!(back.get_pixel(3, 3), &Rgba([200, 40, 40, 255]));
    }

    #[test]
    fn jpeg_output_drops_alpha() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiers.jpg");
        save_sheet(&sheet(), &path).unwrap();
        assert_eq!(image::open(&path).unwrap().to_rgb8().dimensions(), (8, 6));
    }

    #[test]
    fn pdf_output_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tiers.pdf");
        let err = save_sheet(&sheet(), &path).unwrap_err();

        let cause = err.downcast_ref::<ExportError>();
        assert!(matches!(cause, Some(ExportError::UnsupportedFormat(_))), "{err:#}");
        assert!(!path.exists());
    }
}
