// SPDX-License-Identifier: GPL-3.0-or-later
// src/config.rs
//
// User configuration, stored as JSON in the platform config directory.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::Context;
use image::imageops::FilterType;
use image::Rgba;
use serde::{Deserialize, Serialize};

use crate::app::drag::DragConfig;
use crate::app::export::{parse_hex_color, SheetLayout, TileSpec};
use crate::constant::{
    CARD_HEIGHT, CARD_WIDTH, COLUMNS_PER_ROW, CONFIG_DIR, CONFIG_FILE, DRAG_THRESHOLD,
    LONG_PRESS_MS, SHEET_GAP,
};

/// Resampling filter used when scaling exported cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExportFilter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    #[default]
    Lanczos3,
}

impl From<ExportFilter> for FilterType {
    fn from(filter: ExportFilter) -> Self {
        match filter {
            ExportFilter::Nearest => FilterType::Nearest,
            ExportFilter::Triangle => FilterType::Triangle,
            ExportFilter::CatmullRom => FilterType::CatmullRom,
            ExportFilter::Gaussian => FilterType::Gaussian,
            ExportFilter::Lanczos3 => FilterType::Lanczos3,
        }
    }
}

/// Global configuration for the application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Card width in pixels; with `card_height` it fixes the crop ratio.
    pub card_width: u32,
    pub card_height: u32,
    /// Hold time before a press opens the editor.
    pub long_press_ms: u64,
    /// Pointer travel in pixels before a press becomes a drag.
    pub drag_threshold: f32,
    pub export_filter: ExportFilter,
    /// Cards per row in the exported sheet.
    pub columns_per_row: u32,
    /// Sheet background as `#rrggbb`.
    pub background: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            card_width: CARD_WIDTH,
            card_height: CARD_HEIGHT,
            long_press_ms: LONG_PRESS_MS,
            drag_threshold: DRAG_THRESHOLD,
            export_filter: ExportFilter::default(),
            columns_per_row: COLUMNS_PER_ROW,
            background: "#1a1a17".to_string(),
        }
    }
}

impl AppConfig {
    /// Default config file location.
    pub fn path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load the user config. A missing file gives defaults; a broken one is
    /// reported and replaced by defaults.
    pub fn load() -> Self {
        let Some(path) = Self::path() else {
            log::warn!("No config directory available, using defaults");
            return Self::default();
        };
        if !path.exists() {
            return Self::default();
        }
        Self::load_from(&path).unwrap_or_else(|err| {
            log::warn!("{err:#}; using defaults");
            Self::default()
        })
    }

    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&raw)
            .with_context(|| format!("Invalid config {}", path.display()))?;
        Ok(config.sanitized())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::path().context("No config directory available")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = serde_json::to_string_pretty(self)?;
        std::fs::write(path, raw)
            .with_context(|| format!("Failed to write config {}", path.display()))
    }

    /// Replace zero sizes and non-finite thresholds with defaults.
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if self.card_width == 0 || self.card_height == 0 {
            self.card_width = defaults.card_width;
            self.card_height = defaults.card_height;
        }
        if !self.drag_threshold.is_finite() || self.drag_threshold < 0.0 {
            self.drag_threshold = defaults.drag_threshold;
        }
        if self.columns_per_row == 0 {
            self.columns_per_row = defaults.columns_per_row;
        }
        self
    }

    /// Width over height of every card.
    pub fn target_ratio(&self) -> f64 {
        f64::from(self.card_width) / f64::from(self.card_height)
    }

    pub fn drag_config(&self) -> DragConfig {
        DragConfig {
            long_press: Duration::from_millis(self.long_press_ms),
            drag_threshold: self.drag_threshold,
        }
    }

    pub fn tile_spec(&self) -> TileSpec {
        TileSpec {
            width: self.card_width,
            height: self.card_height,
            filter: self.export_filter.into(),
        }
    }

    pub fn background_color(&self) -> Rgba<u8> {
        parse_hex_color(&self.background).unwrap_or(Rgba([26, 26, 23, 255]))
    }

    pub fn sheet_layout(&self) -> SheetLayout {
        SheetLayout {
            card_width: self.card_width,
            card_height: self.card_height,
            columns_per_row: self.columns_per_row,
            gap: SHEET_GAP,
            background: self.background_color(),
        }
    }
}
