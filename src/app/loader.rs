// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/loader.rs
//
// Asynchronous image decoding; reports natural sizes back to board items.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use futures_util::future::join_all;
use image::{DynamicImage, GenericImageView, ImageReader};

use crate::domain::board::{ItemId, TierBoard};

/// Resolve an item's image location against the board file's directory.
pub fn resolve_image_path(base_dir: &Path, image: &str) -> PathBuf {
    let path = Path::new(image);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base_dir.join(path)
    }
}

/// Decode an image on the blocking pool.
pub async fn load_image(path: PathBuf) -> anyhow::Result<DynamicImage> {
    let display = path.display().to_string();
    tokio::task::spawn_blocking(move || -> anyhow::Result<DynamicImage> {
        let image = ImageReader::open(&path)?.with_guessed_format()?.decode()?;
        Ok(image)
    })
    .await
    .with_context(|| format!("Decode task for {display} failed"))?
    .with_context(|| format!("Failed to load image {display}"))
}

/// Decode every item image on the board concurrently.
///
/// Items whose image decodes get their natural size set; failures are logged
/// and those items stay hidden. Returns the decoded images by item.
pub async fn load_all(board: &mut TierBoard, base_dir: &Path) -> HashMap<ItemId, Arc<DynamicImage>> {
    let jobs: Vec<(ItemId, PathBuf)> = board
        .items()
        .map(|item| (item.id, resolve_image_path(base_dir, &item.image)))
        .collect();

    let results = join_all(
        jobs.into_iter()
            .map(|(id, path)| async move { (id, load_image(path).await) }),
    )
    .await;

    let mut images = HashMap::with_capacity(results.len());
    for (id, result) in results {
        match result {
            Ok(image) => {
                let (width, height) = image.dimensions();
                if let Some(item) = board.items_mut().find(|item| item.id == id) {
                    item.set_natural_size(width, height);
                }
                images.insert(id, Arc::new(image));
            }
            Err(err) => log::error!("Item {id}: {err:#}"),
        }
    }
    log::info!("Loaded {} of {} images", images.len(), board.items().count());
    images
}

#[cfg(test)]
mod tests {
    use image::{Rgba, RgbaImage};

    use super::*;
    use crate::domain::board::{ContainerId, Item, Tier};

    #[test]
    fn relative_paths_resolve_against_board_dir() {
        let base = Path::new("/boards/anime");
        assert_eq!(
            resolve_image_path(base, "covers/a.png"),
            PathBuf::from("/boards/anime/covers/a.png")
        );
        assert_eq!(
            resolve_image_path(base, "/tmp/b.png"),
            PathBuf::from("/tmp/b.png")
        );
    }

    #[tokio::test]
    async fn load_all_sets_natural_sizes() {
        let dir = tempfile::tempdir().unwrap();
        RgbaImage::from_pixel(30, 40, Rgba([1, 2, 3, 255]))
            .save(dir.path().join("ok.png"))
            .unwrap();

        let mut tier = Tier::new("s", "S", "#ffffff");
        tier.items = vec![
            Item::new(ItemId(1), "ok", "ok.png"),
            Item::new(ItemId(2), "missing", "missing.png"),
        ];
        let mut board = TierBoard::new(vec![tier]);

        let images = load_all(&mut board, dir.path()).await;
        assert_eq!(images.len(), 1);
        assert!(images.contains_key(&ItemId(1)));

        let items = board.list(&ContainerId::from("s")).unwrap();
        assert_eq!(items[0].natural_size(), Some((30, 40)));
        assert_eq!(items[1].natural_size(), None);
    }
}
