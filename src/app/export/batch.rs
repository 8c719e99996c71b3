// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/export/batch.rs
//
// Concurrent per-card export; the batch completes only when every card has.

use std::sync::Arc;

use futures_util::future::join_all;
use image::imageops::FilterType;

use super::cropper::{export_tile, ExportSource, ExportTile};
use crate::domain::board::ItemId;
use crate::domain::crop::CropDescriptor;

/// Thread-safe export source.
pub type SharedSource = Arc<dyn ExportSource + Send + Sync>;

/// One card to render.
#[derive(Clone)]
pub struct ExportJob {
    pub item: ItemId,
    /// `None` when the image failed to load.
    pub source: Option<SharedSource>,
    pub descriptor: CropDescriptor,
}

/// Output size and resampling shared by every job in a batch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TileSpec {
    pub width: u32,
    pub height: u32,
    pub filter: FilterType,
}

/// Render every job on the blocking pool and wait for all of them.
///
/// Results keep the job order. A job whose task panics yields a blank tile.
pub async fn export_tiles(jobs: Vec<ExportJob>, spec: TileSpec) -> Vec<(ItemId, ExportTile)> {
    let handles = jobs.into_iter().map(|job| {
        let item = job.item;
        let task = tokio::task::spawn_blocking(move || {
            export_tile(
                job.source.as_deref().map(|s| s as &dyn ExportSource),
                &job.descriptor,
                spec.width,
                spec.height,
                spec.filter,
            )
        });
        async move { (item, task.await) }
    });

    join_all(handles)
        .await
        .into_iter()
        .map(|(item, result)| match result {
            Ok(tile) => (item, tile),
            Err(err) => {
                log::error!("Export task for {item} failed: {err}");
                (item, ExportTile::blank(spec.width, spec.height))
            }
        })
        .collect()
}
