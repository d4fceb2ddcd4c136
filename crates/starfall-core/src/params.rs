//! Tuning parameters for each background layer.
//!
//! None of these values are validated. Out-of-range numbers only change how
//! dense or fast the effect looks; they never make a tick fail.

use serde::{Deserialize, Serialize};

/// Starfield with shooting stars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StarfieldParams {
    /// Ambient points per square surface pixel.
    pub density: f32,
    /// Vertical drift of ambient points, in surface pixels per tick.
    pub drift_speed: f32,
    /// Probability per tick of spawning a meteor.
    pub shoot_rate: f32,
    /// Meteor speed along its heading, in surface pixels per second.
    pub meteor_speed: f32,
    /// Number of positions kept in a meteor trail.
    pub trail_length: usize,
    /// Stroke width of the trail head.
    pub meteor_width: f32,
    /// Maximum number of live meteors.
    pub max_meteors: usize,
}

impl Default for StarfieldParams {
    fn default() -> Self {
        Self {
            density: 0.00016,
            drift_speed: 0.08,
            shoot_rate: 0.0012,
            meteor_speed: 420.0,
            trail_length: 14,
            meteor_width: 1.5,
            max_meteors: 24,
        }
    }
}

impl StarfieldParams {
    /// Tuning used on the portfolio page.
    pub fn portfolio() -> Self {
        Self {
            density: 0.00016,
            drift_speed: 0.06,
            shoot_rate: 0.003,
            meteor_speed: 360.0,
            trail_length: 16,
            meteor_width: 1.6,
            ..Self::default()
        }
    }
}

/// Slowly drifting colour blobs.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NebulaParams {
    pub blobs: usize,
    /// Largest blob radius in surface pixels.
    pub max_radius: f32,
    /// Upper bound of the per-axis drift, in surface pixels per tick.
    pub speed: f32,
    /// Base hue in degrees.
    pub hue_base: f32,
    /// Peak opacity of a blob centre.
    pub alpha: f32,
}

impl Default for NebulaParams {
    fn default() -> Self {
        Self {
            blobs: 6,
            max_radius: 420.0,
            speed: 0.05,
            hue_base: 195.0,
            alpha: 0.1,
        }
    }
}

impl NebulaParams {
    /// Tuning used on the portfolio page.
    pub fn portfolio() -> Self {
        Self {
            blobs: 7,
            max_radius: 460.0,
            alpha: 0.05,
            ..Self::default()
        }
    }
}

/// Technical grid plus diagonal glow lines with pointer parallax.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TechLinesParams {
    /// Distance between grid lines in surface pixels.
    pub grid_spacing: f32,
    pub grid_opacity: f32,
    /// Number of diagonal glow lines.
    pub line_count: usize,
    pub line_opacity: f32,
    /// Line opacity used when motion is reduced.
    pub reduced_line_opacity: f32,
    /// Grid offset in surface pixels at full pointer deflection.
    pub grid_parallax: f32,
    /// Line offset in surface pixels at full pointer deflection.
    pub line_parallax: f32,
}

impl Default for TechLinesParams {
    fn default() -> Self {
        Self {
            grid_spacing: 120.0,
            grid_opacity: 0.07,
            line_count: 12,
            line_opacity: 0.1,
            reduced_line_opacity: 0.15,
            grid_parallax: 6.0,
            line_parallax: -4.0,
        }
    }
}
