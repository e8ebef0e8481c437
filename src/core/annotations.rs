use serde::{Deserialize, Serialize};

use crate::core::{Color, RegionBand};

/// How metric values are printed in annotations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ValueFormat {
    /// Plain number, e.g. `1.07`.
    Decimal { places: u8 },
    /// Ratio rendered as a percentage, e.g. `0.123` -> `12%`.
    Percent { places: u8 },
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self::Decimal { places: 2 }
    }
}

impl ValueFormat {
    #[must_use]
    pub fn format(self, value: f64) -> String {
        match self {
            Self::Decimal { places } => format!("{value:.prec$}", prec = usize::from(places)),
            Self::Percent { places } => {
                format!("{:.prec$}%", value * 100.0, prec = usize::from(places))
            }
        }
    }
}

/// Axis-aligned rectangle in plot-area pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoxGeometry {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Where a label's text sits relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LabelAnchor {
    /// Text centered on the anchor.
    Middle,
    /// Text ends at the anchor.
    End,
}

/// Text label with a padded background box.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxedAnnotation {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub anchor: LabelAnchor,
    pub frame: BoxGeometry,
}

impl BoxedAnnotation {
    /// Lays out `text` at `(x, y)`, vertically centered, with `padding` on every side.
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        anchor: LabelAnchor,
        font_size_px: f64,
        padding: f64,
    ) -> Self {
        let text = text.into();
        let text_width = estimate_label_text_width_px(&text, font_size_px);
        let left = match anchor {
            LabelAnchor::Middle => x - text_width / 2.0,
            LabelAnchor::End => x - text_width,
        };
        let frame = BoxGeometry {
            x: left - padding,
            y: y - font_size_px / 2.0 - padding,
            width: text_width + 2.0 * padding,
            height: font_size_px + 2.0 * padding,
        };
        Self {
            text,
            x,
            y,
            anchor,
            frame,
        }
    }
}

/// Zone name drawn against the right edge of its band.
///
/// The active label marks the zone holding the latest value and is drawn
/// filled with the zone color.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ZoneLabel {
    pub color: Color,
    pub is_active: bool,
    pub annotation: BoxedAnnotation,
}

/// One label per band, right-aligned at `right_x` and centered in the band.
#[must_use]
pub fn zone_labels(
    bands: &[RegionBand],
    active_zone: Option<&str>,
    right_x: f64,
    font_size_px: f64,
    padding: f64,
) -> Vec<ZoneLabel> {
    bands
        .iter()
        .filter(|band| band.height() > 0.0)
        .map(|band| ZoneLabel {
            color: band.region.color,
            is_active: active_zone == Some(band.region.name.as_str()),
            annotation: BoxedAnnotation::new(
                band.region.name.clone(),
                right_x - padding,
                (band.y_top + band.y_bottom) / 2.0,
                LabelAnchor::End,
                font_size_px,
                padding,
            ),
        })
        .collect()
}

/// Backend-independent width estimate for a single-line label.
#[must_use]
pub fn estimate_label_text_width_px(text: &str, font_size_px: f64) -> f64 {
    let units = text.chars().fold(0.0, |acc, ch| {
        acc + match ch {
            '0'..='9' => 0.62,
            '.' | ',' => 0.34,
            '-' | '+' | '%' => 0.42,
            ' ' => 0.33,
            _ => 0.58,
        }
    });
    (units * font_size_px).max(font_size_px)
}
