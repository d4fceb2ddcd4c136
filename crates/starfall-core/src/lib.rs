//! Core types shared by the starfall crates.
//!
//! Everything in here is plain data: surface geometry, colours, the user
//! facing toggles (motion preference, visible layers, preset) and the
//! per-layer tuning parameters that the config file persists.

mod params;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub use params::{NebulaParams, StarfieldParams, TechLinesParams};

/// Dimensions of a drawing surface in surface pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Size {
    pub width: f32,
    pub height: f32,
}

impl Size {
    pub const ZERO: Size = Size {
        width: 0.0,
        height: 0.0,
    };

    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Area in square surface pixels.
    pub fn area(self) -> f32 {
        self.width * self.height
    }

    /// True when nothing can be drawn on a surface of this size.
    pub fn is_empty(self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }
}

/// Straight (non-premultiplied) RGBA colour with components in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0.0, 0.0, 0.0, 0.0);
    pub const WHITE: Rgba = Rgba::new(1.0, 1.0, 1.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Build a colour from 8-bit channels and an alpha.
    pub fn from_rgb8(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self::new(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, a)
    }

    /// Same colour with a different alpha.
    pub fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation between two colours, `t` clamped to `0..=1`.
    pub fn lerp(self, other: Rgba, t: f32) -> Rgba {
        let t = t.clamp(0.0, 1.0);
        Rgba {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
            a: self.a + (other.a - self.a) * t,
        }
    }

    /// Channels converted to 8-bit, clamped.
    pub fn to_rgb8(self) -> (u8, u8, u8) {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        (q(self.r), q(self.g), q(self.b))
    }
}

/// User motion preference.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Motion {
    #[default]
    Full,
    /// Render a static frame: nothing moves and no meteors are spawned.
    Reduced,
}

impl Motion {
    /// Toggle between full and reduced motion.
    pub fn toggle(self) -> Self {
        match self {
            Motion::Full => Motion::Reduced,
            Motion::Reduced => Motion::Full,
        }
    }

    pub fn is_reduced(self) -> bool {
        self == Motion::Reduced
    }
}

/// Which background layers are animated and drawn.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerSet {
    #[default]
    All,
    Starfield,
    Nebula,
    TechLines,
}

impl LayerSet {
    /// Cycle to the next layer selection.
    pub fn next(self) -> Self {
        match self {
            LayerSet::All => LayerSet::Starfield,
            LayerSet::Starfield => LayerSet::Nebula,
            LayerSet::Nebula => LayerSet::TechLines,
            LayerSet::TechLines => LayerSet::All,
        }
    }

    pub fn starfield(self) -> bool {
        matches!(self, LayerSet::All | LayerSet::Starfield)
    }

    pub fn nebula(self) -> bool {
        matches!(self, LayerSet::All | LayerSet::Nebula)
    }

    pub fn tech_lines(self) -> bool {
        matches!(self, LayerSet::All | LayerSet::TechLines)
    }

    pub fn label(self) -> &'static str {
        match self {
            LayerSet::All => "all",
            LayerSet::Starfield => "starfield",
            LayerSet::Nebula => "nebula",
            LayerSet::TechLines => "tech-lines",
        }
    }
}

impl fmt::Display for LayerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for LayerSet {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Ok(LayerSet::All),
            "starfield" | "stars" => Ok(LayerSet::Starfield),
            "nebula" => Ok(LayerSet::Nebula),
            "tech-lines" | "lines" | "grid" => Ok(LayerSet::TechLines),
            other => Err(format!(
                "unknown layer set '{other}' (expected all, starfield, nebula or tech-lines)"
            )),
        }
    }
}

/// Named bundle of layer parameters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Preset {
    /// The tuning used on the portfolio page.
    #[default]
    Portfolio,
    /// Each effect's own defaults.
    Component,
}

impl Preset {
    /// Cycle to the next preset.
    pub fn next(self) -> Self {
        match self {
            Preset::Portfolio => Preset::Component,
            Preset::Component => Preset::Portfolio,
        }
    }

    pub fn starfield(self) -> StarfieldParams {
        match self {
            Preset::Portfolio => StarfieldParams::portfolio(),
            Preset::Component => StarfieldParams::default(),
        }
    }

    pub fn nebula(self) -> NebulaParams {
        match self {
            Preset::Portfolio => NebulaParams::portfolio(),
            Preset::Component => NebulaParams::default(),
        }
    }

    pub fn tech_lines(self) -> TechLinesParams {
        TechLinesParams::default()
    }

    pub fn label(self) -> &'static str {
        match self {
            Preset::Portfolio => "portfolio",
            Preset::Component => "component",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "portfolio" => Ok(Preset::Portfolio),
            "component" | "defaults" => Ok(Preset::Component),
            other => Err(format!(
                "unknown preset '{other}' (expected portfolio or component)"
            )),
        }
    }
}
