// SPDX-License-Identifier: GPL-3.0-or-later
// src/constant.rs
//
// Application constants that should not be changed by the user.

/// Relative tolerance when comparing a rectangle's ratio to a target ratio.
pub const RATIO_EPSILON: f64 = 1e-9;

/// An image only counts as "taller" than the card when its ratio falls below
/// the card ratio by more than this fraction (rounded card sizes such as
/// 100x133 must not flip a 3:4 image to a top anchor).
pub const AUTO_TALL_TOLERANCE: f64 = 0.05;

/// Smallest custom crop edge, in natural pixels.
pub const MIN_CROP_SIZE: f64 = 1.0;

/// Default long-press delay in milliseconds.
pub const LONG_PRESS_MS: u64 = 500;

/// Default pointer travel (logical pixels) before a press becomes a drag.
pub const DRAG_THRESHOLD: f32 = 5.0;

/// Default card width in pixels (also the export tile width).
pub const CARD_WIDTH: u32 = 100;

/// Default card height in pixels (also the export tile height).
pub const CARD_HEIGHT: u32 = 133;

/// Default number of cards per row in the exported sheet.
pub const COLUMNS_PER_ROW: u32 = 10;

/// Gap between cards and rows in the exported sheet.
pub const SHEET_GAP: u32 = 4;

/// Config directory name.
pub const CONFIG_DIR: &str = "tierboard";

/// Config file name inside [`CONFIG_DIR`].
pub const CONFIG_FILE: &str = "config.json";
