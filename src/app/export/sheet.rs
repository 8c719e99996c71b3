// SPDX-License-Identifier: GPL-3.0-or-later
// src/app/export/sheet.rs
//
// Composite exported cards into one tier list image.

use std::collections::HashMap;

use image::{imageops, Rgba, RgbaImage};

use crate::constant::SHEET_GAP;
use crate::domain::board::{ItemId, TierBoard};

const DEFAULT_BACKGROUND: Rgba<u8> = Rgba([26, 26, 23, 255]);
const FALLBACK_LABEL: Rgba<u8> = Rgba([128, 128, 128, 255]);

/// Parse `#rrggbb` or `#rrggbbaa`.
pub fn parse_hex_color(value: &str) -> Option<Rgba<u8>> {
    let hex = value.trim().strip_prefix('#')?;
    if !matches!(hex.len(), 6 | 8) || !hex.is_ascii() {
        return None;
    }
    let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
    let alpha = if hex.len() == 8 { channel(6)? } else { 255 };
    Some(Rgba([channel(0)?, channel(2)?, channel(4)?, alpha]))
}

/// Geometry of the exported sheet.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SheetLayout {
    pub card_width: u32,
    pub card_height: u32,
    pub columns_per_row: u32,
    pub gap: u32,
    pub background: Rgba<u8>,
}

impl Default for SheetLayout {
    fn default() -> Self {
        Self {
            card_width: crate::constant::CARD_WIDTH,
            card_height: crate::constant::CARD_HEIGHT,
            columns_per_row: crate::constant::COLUMNS_PER_ROW,
            gap: SHEET_GAP,
            background: DEFAULT_BACKGROUND,
        }
    }
}

impl SheetLayout {
    fn columns(&self) -> u32 {
        self.columns_per_row.max(1)
    }

    /// Card rows a tier with `count` items occupies (at least one).
    pub fn rows_for(&self, count: usize) -> u32 {
        let count = u32::try_from(count).unwrap_or(u32::MAX);
        count.div_ceil(self.columns()).max(1)
    }

    /// Width of the whole sheet: label column plus the card grid.
    pub fn sheet_width(&self) -> u32 {
        self.gap + self.card_height + self.gap + self.columns() * (self.card_width + self.gap)
    }

    /// Height of a tier band holding `count` items.
    pub fn band_height(&self, count: usize) -> u32 {
        self.rows_for(count) * (self.card_height + self.gap)
    }
}

/// Lay out every tier of `board` as a labelled band of cards.
///
/// The unranked pool is not exported. Items without a tile leave their slot
/// empty.
pub fn compose_sheet(
    board: &TierBoard,
    tiles: &HashMap<ItemId, RgbaImage>,
    layout: &SheetLayout,
) -> RgbaImage {
    let height = layout.gap
        + board
            .tiers
            .iter()
            .map(|tier| layout.band_height(tier.items.len()))
            .sum::<u32>();
    let mut sheet = RgbaImage::from_pixel(layout.sheet_width(), height, layout.background);

    let mut top = layout.gap;
    for tier in &board.tiers {
        let band = layout.band_height(tier.items.len());
        let color = parse_hex_color(&tier.color).unwrap_or_else(|| {
            log::warn!("Tier {} has invalid color {:?}", tier.id, tier.color);
            FALLBACK_LABEL
        });
        let label = RgbaImage::from_pixel(layout.card_height, band - layout.gap, color);
        imageops::replace(&mut sheet, &label, i64::from(layout.gap), i64::from(top));

        let grid_left = layout.gap + layout.card_height + layout.gap;
        for (slot, item) in (0u32..).zip(&tier.items) {
            let Some(tile) = tiles.get(&item.id) else {
                continue;
            };
            let column = slot % layout.columns();
            let row = slot / layout.columns();
            let x = grid_left + column * (layout.card_width + layout.gap);
            let y = top + row * (layout.card_height + layout.gap);
            imageops::overlay(&mut sheet, tile, i64::from(x), i64::from(y));
        }
        top += band;
    }
    sheet
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::board::{Item, Tier};

    fn layout() -> SheetLayout {
        SheetLayout {
            card_width: 10,
            card_height: 12,
            columns_per_row: 2,
            gap: 1,
            background: Rgba([0, 0, 0, 255]),
        }
    }

    #[test]
    fn parses_hex_colors() {
        assert_eq!(parse_hex_color("#ff7f00"), Some(Rgba([255, 127, 0, 255])));
        assert_eq!(parse_hex_color("#00000080"), Some(Rgba([0, 0, 0, 128])));
        assert_eq!(parse_hex_color("ff7f00"), None);
        assert_eq!(parse_hex_color("#fff"), None);
        assert_eq!(parse_hex_color("#gg0000"), None);
    }

    #[test]
    fn tiers_wrap_into_rows() {
        let layout = layout();
        assert_eq!(layout.rows_for(0), 1);
        assert_eq!(layout.rows_for(2), 1);
        assert_eq!(layout.rows_for(3), 2);
        assert_eq!(layout.sheet_width(), 1 + 12 + 1 + 2 * 11);
    }

    #[test]
    fn places_cards_after_the_label() {
        let mut s = Tier::new("s", "S", "#ff0000");
        s.items = (0..3).map(|i| Item::new(ItemId(i), "x", "x.png")).collect();
        let a = Tier::new("a", "A", "#00ff00");
        let board = TierBoard::new(vec![s, a]);

        let white = Rgba([255, 255, 255, 255]);
        let tiles: HashMap<ItemId, RgbaImage> = [0, 2]
            .into_iter()
            .map(|i| (ItemId(i), RgbaImage::from_pixel(10, 12, white)))
            .collect();

        let layout = layout();
        let sheet = compose_sheet(&board, &tiles, &layout);
        // S band: 2 rows of 13, A band: 1 row of 13, plus top gap.
        assert_eq!(sheet.dimensions(), (36, 1 + 26 + 13));

        assert_eq!(*sheet.get_pixel(1, 1), Rgba([255, 0, 0, 255]));
        assert_eq!(*sheet.get_pixel(1, 28), Rgba([0, 255, 0, 255]));
        // Item 0 at row 0 col 0; item 1 has no tile; item 2 wraps to row 1.
        assert_eq!(*sheet.get_pixel(14, 1), white);
        assert_eq!(*sheet.get_pixel(25, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*sheet.get_pixel(14, 14), white);
    }
}
