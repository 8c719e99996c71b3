// SPDX-License-Identifier: GPL-3.0-or-later
// src/domain/crop/descriptor.rs
//
// Stored crop descriptors: auto, preset anchor, or custom rectangle.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::geometry::CropRect;

/// Anchor used to place a cover crop inside an image.
///
/// CSS-style nine-position grids collapse onto these five: corners keep
/// their vertical side.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum PresetAnchor {
    TopCenter,
    #[default]
    Center,
    BottomCenter,
    LeftCenter,
    RightCenter,
}

impl PresetAnchor {
    pub const ALL: &[Self] = &[
        Self::TopCenter,
        Self::Center,
        Self::BottomCenter,
        Self::LeftCenter,
        Self::RightCenter,
    ];

    /// Horizontal and vertical placement of the crop within the free space
    /// (0.0 = left/top, 1.0 = right/bottom).
    pub fn fractions(self) -> (f64, f64) {
        match self {
            Self::TopCenter => (0.5, 0.0),
            Self::Center => (0.5, 0.5),
            Self::BottomCenter => (0.5, 1.0),
            Self::LeftCenter => (0.0, 0.5),
            Self::RightCenter => (1.0, 0.5),
        }
    }
}

impl fmt::Display for PresetAnchor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TopCenter => write!(f, "top-center"),
            Self::Center => write!(f, "center"),
            Self::BottomCenter => write!(f, "bottom-center"),
            Self::LeftCenter => write!(f, "left-center"),
            Self::RightCenter => write!(f, "right-center"),
        }
    }
}

/// Error returned when a position keyword is not recognized.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown crop anchor: {0}")]
pub struct UnknownAnchor(pub String);

impl FromStr for PresetAnchor {
    type Err = UnknownAnchor;

    /// Accepts `top-center` style names as well as CSS `object-position`
    /// keyword pairs (`top left`, `center right`, `bottom`, ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        let words: Vec<&str> = normalized.split_whitespace().collect();

        let has = |word: &str| words.contains(&word);
        let anchor = if words.is_empty() || words.iter().any(|w| !is_keyword(w)) {
            None
        } else if has("top") {
            Some(Self::TopCenter)
        } else if has("bottom") {
            Some(Self::BottomCenter)
        } else if has("left") {
            Some(Self::LeftCenter)
        } else if has("right") {
            Some(Self::RightCenter)
        } else {
            Some(Self::Center)
        };

        anchor.ok_or_else(|| UnknownAnchor(s.to_string()))
    }
}

fn is_keyword(word: &str) -> bool {
    matches!(word, "top" | "bottom" | "left" | "right" | "center")
}

/// Custom crop rectangle recorded by the item editor.
///
/// Coordinates are pixels of the image as it was decoded when the crop was
/// drawn; `reference_width` is that decode's natural width.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomCrop {
    pub source_x: f64,
    pub source_y: f64,
    pub source_width: f64,
    pub source_height: f64,
    pub reference_width: f64,
}

impl CustomCrop {
    /// Record `rect` against the natural width it was drawn on.
    ///
    /// Negative coordinates are clamped to zero.
    pub fn new(rect: CropRect, reference_width: f64) -> Self {
        Self {
            source_x: rect.x.max(0.0),
            source_y: rect.y.max(0.0),
            source_width: rect.width.max(0.0),
            source_height: rect.height.max(0.0),
            reference_width,
        }
    }

    pub fn rect(&self) -> CropRect {
        CropRect::new(
            self.source_x,
            self.source_y,
            self.source_width,
            self.source_height,
        )
    }
}

/// How an item's image is cropped into its card.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum CropDescriptor {
    /// Resolved at render time from the image and card ratios.
    #[default]
    Auto,
    /// Cover crop placed at a fixed anchor.
    Preset { anchor: PresetAnchor },
    /// Explicit rectangle drawn by the user.
    Custom(CustomCrop),
}

impl CropDescriptor {
    pub fn preset(anchor: PresetAnchor) -> Self {
        Self::Preset { anchor }
    }

    pub fn custom(rect: CropRect, reference_width: f64) -> Self {
        Self::Custom(CustomCrop::new(rect, reference_width))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_css_keywords_into_five_anchors() {
        assert_eq!("top left".parse(), Ok(PresetAnchor::TopCenter));
        assert_eq!("top-right".parse(), Ok(PresetAnchor::TopCenter));
        assert_eq!("top-center".parse(), Ok(PresetAnchor::TopCenter));
        assert_eq!("bottom left".parse(), Ok(PresetAnchor::BottomCenter));
        assert_eq!("center left".parse(), Ok(PresetAnchor::LeftCenter));
        assert_eq!("right".parse(), Ok(PresetAnchor::RightCenter));
        assert_eq!("center center".parse(), Ok(PresetAnchor::Center));
        assert_eq!(" Center ".parse(), Ok(PresetAnchor::Center));
    }

    #[test]
    fn rejects_unknown_keywords() {
        assert!("".parse::<PresetAnchor>().is_err());
        assert!("middle".parse::<PresetAnchor>().is_err());
        assert!("top 10px".parse::<PresetAnchor>().is_err());
    }

    #[test]
    fn display_round_trips_through_from_str() {
        for anchor in PresetAnchor::ALL {
            assert_eq!(anchor.to_string().parse(), Ok(*anchor));
        }
    }

    #[test]
    fn custom_crop_clamps_negative_coordinates() {
        let crop = CustomCrop::new(CropRect::new(-5.0, 3.0, 10.0, -1.0), 800.0);
        assert_eq!(crop.rect(), CropRect::new(0.0, 3.0, 10.0, 0.0));
        assert_eq!(crop.reference_width, 800.0);
    }

    #[test]
    fn descriptor_serializes_with_mode_tag() {
        let json =
            serde_json::to_string(&CropDescriptor::preset(PresetAnchor::TopCenter)).unwrap();
        assert_eq!(json, r#"{"mode":"preset","anchor":"top-center"}"#);

        let parsed: CropDescriptor = serde_json::from_str(
            r#"{"mode":"custom","sourceX":1,"sourceY":2,"sourceWidth":3,"sourceHeight":4,"referenceWidth":640}"#,
        )
        .unwrap();
        assert_eq!(
            parsed,
            CropDescriptor::custom(CropRect::new(1.0, 2.0, 3.0, 4.0), 640.0)
        );
    }
}
