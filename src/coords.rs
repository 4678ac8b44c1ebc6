//! Letterboxed virtual coordinate system
//!
//! The game is designed in a portrait 9x16 virtual-unit space. The host hands
//! us its viewport in pixels; we fit the largest 9:16 rectangle the viewport
//! contains (letterboxing the remainder) and express everything else in two
//! currencies:
//! - proportional coordinates in [0, 1] across the game area, per axis
//! - virtual units, where 100 units always equal the game-area width
//!
//! Proportional axes are anisotropic: [0, 1] spans a different pixel length
//! per axis, so unit-to-proportional-Y conversions carry an aspect correction
//! to keep unit distances visually square.

use serde::{Deserialize, Serialize};

use crate::consts::{TARGET_HEIGHT_UNITS, TARGET_WIDTH_UNITS, UNITS_PER_WIDTH};

/// Letterboxed game area derived from the host viewport
///
/// All-zero until the first `resize` with a usable viewport; conversions
/// return 0 in that state and dependent systems are expected to hold their
/// updates until the area is ready.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct GameArea {
    /// Host viewport width in pixels
    pub viewport_width: f32,
    /// Host viewport height in pixels
    pub viewport_height: f32,
    /// Fitted game-area width in pixels
    pub width: f32,
    /// Fitted game-area height in pixels
    pub height: f32,
    /// Horizontal letterbox offset of the game area inside the viewport
    pub offset_x: f32,
    /// Vertical letterbox offset of the game area inside the viewport
    pub offset_y: f32,
}

impl GameArea {
    /// Area already fitted to a viewport
    pub fn sized(viewport_width: f32, viewport_height: f32) -> Self {
        let mut area = Self::default();
        area.resize(viewport_width, viewport_height);
        area
    }

    /// Recompute the fitted game area for a new viewport size
    pub fn resize(&mut self, viewport_width: f32, viewport_height: f32) {
        self.viewport_width = viewport_width;
        self.viewport_height = viewport_height;

        if viewport_width <= 0.0 || viewport_height <= 0.0 {
            self.width = 0.0;
            self.height = 0.0;
            self.offset_x = 0.0;
            self.offset_y = 0.0;
            return;
        }

        // Largest scale at which the full target rectangle still fits
        let scale = (viewport_width / TARGET_WIDTH_UNITS)
            .min(viewport_height / TARGET_HEIGHT_UNITS);

        self.width = TARGET_WIDTH_UNITS * scale;
        self.height = TARGET_HEIGHT_UNITS * scale;
        self.offset_x = (viewport_width - self.width) / 2.0;
        self.offset_y = (viewport_height - self.height) / 2.0;
    }

    /// Whether a usable game area exists yet
    #[inline]
    pub fn is_ready(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }

    /// Height/width ratio of the fitted area, 0 while not ready
    #[inline]
    pub fn aspect(&self) -> f32 {
        if self.is_ready() {
            self.height / self.width
        } else {
            0.0
        }
    }

    /// Virtual units to pixels
    #[inline]
    pub fn px_from_units(&self, units: f32) -> f32 {
        self.width * units / UNITS_PER_WIDTH
    }

    /// Virtual units to a proportional X distance
    #[inline]
    pub fn prop_x_from_units(&self, units: f32) -> f32 {
        if self.is_ready() {
            units / UNITS_PER_WIDTH
        } else {
            0.0
        }
    }

    /// Virtual units to a proportional Y distance, aspect-corrected
    #[inline]
    pub fn prop_y_from_units(&self, units: f32) -> f32 {
        if self.is_ready() {
            (units / UNITS_PER_WIDTH) / self.aspect()
        } else {
            0.0
        }
    }
}
