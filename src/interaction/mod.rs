use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{ScaledPoint, ValidPoint};

/// Data point the pointer currently resolves to, for the tooltip collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HoverSnap {
    /// Plot-area pixel position of the snapped point.
    pub x: f64,
    pub y: f64,
    pub timestamp: DateTime<Utc>,
    pub value: f64,
    pub low: f64,
    pub high: f64,
}

impl From<&ScaledPoint<ValidPoint>> for HoverSnap {
    fn from(point: &ScaledPoint<ValidPoint>) -> Self {
        Self {
            x: point.x,
            y: point.y,
            timestamp: point.data.timestamp,
            value: point.data.value,
            low: point.data.low,
            high: point.data.high,
        }
    }
}

/// Pointer state exposed to host applications.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HoverState {
    visible: bool,
    cursor_x: f64,
    cursor_y: f64,
    snap: Option<HoverSnap>,
}

impl HoverState {
    #[must_use]
    pub fn is_visible(self) -> bool {
        self.visible
    }

    #[must_use]
    pub fn cursor(self) -> (f64, f64) {
        (self.cursor_x, self.cursor_y)
    }

    #[must_use]
    pub fn snap(self) -> Option<HoverSnap> {
        self.snap
    }

    pub fn on_pointer_move(&mut self, x: f64, y: f64) {
        self.visible = true;
        self.cursor_x = x;
        self.cursor_y = y;
    }

    pub fn on_pointer_leave(&mut self) {
        self.visible = false;
        self.snap = None;
    }

    pub fn set_snap(&mut self, snap: Option<HoverSnap>) {
        self.snap = snap;
    }

    /// Drops the snap when the geometry it pointed into is discarded.
    pub fn clear_snap(&mut self) {
        self.snap = None;
    }
}
