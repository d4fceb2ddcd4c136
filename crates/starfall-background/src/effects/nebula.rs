//! Nebula animation (stateful): large translucent colour blobs drifting
//! across the surface and breathing slightly.

use rand::{Rng, rngs::StdRng};
use starfall_core::{NebulaParams, Rgba, Size};

use crate::animator::{Effect, Step};
use crate::color::hsla;
use crate::surface::{Blend, Point, Surface};

/// A single colour blob.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Blob {
    pub x: f32,
    pub y: f32,
    /// Resting radius.
    pub radius: f32,
    pub vx: f32,
    pub vy: f32,
    /// Hue in degrees.
    pub hue: f32,
    /// Opacity at the centre.
    pub alpha: f32,
}

impl Blob {
    /// Radius at time `t` (seconds), pulsing by ±2% around 97%.
    pub fn breathing_radius(&self, t: f32) -> f32 {
        self.radius * (0.97 + (t + self.hue).sin() * 0.02)
    }

    /// Gradient stops for the blob fill.
    pub fn stops(&self) -> [(f32, Rgba); 3] {
        [
            (0.0, hsla(self.hue, 0.95, 0.60, self.alpha)),
            (0.45, hsla(self.hue + 8.0, 0.90, 0.55, self.alpha * 0.5)),
            (1.0, Rgba::TRANSPARENT),
        ]
    }
}

/// Wrap `v` across `[-r, extent + r]`.
fn wrap(v: f32, r: f32, extent: f32) -> f32 {
    if v < -r {
        extent + r
    } else if v > extent + r {
        -r
    } else {
        v
    }
}

/// Nebula layer state.
#[derive(Debug, Clone)]
pub struct Nebula {
    params: NebulaParams,
    blobs: Vec<Blob>,
    /// Accumulated tick time in seconds.
    time: f32,
}

impl Nebula {
    pub fn new(params: NebulaParams) -> Self {
        Self {
            params,
            blobs: Vec::new(),
            time: 0.0,
        }
    }

    pub fn set_params(&mut self, params: NebulaParams) {
        self.params = params;
    }

    pub fn blobs(&self) -> &[Blob] {
        &self.blobs
    }
}

impl Effect for Nebula {
    fn name(&self) -> &'static str {
        "nebula"
    }

    fn reset(&mut self, size: Size, rng: &mut StdRng) {
        let p = self.params;
        self.blobs = (0..p.blobs)
            .map(|_| Blob {
                radius: (0.55 + rng.gen_range(0.0f32..1.0) * 0.45) * p.max_radius,
                x: rng.gen_range(0.0f32..1.0) * size.width,
                y: rng.gen_range(0.0f32..1.0) * size.height,
                vx: (rng.gen_range(0.0f32..1.0) * 2.0 - 1.0) * p.speed,
                vy: (rng.gen_range(0.0f32..1.0) * 2.0 - 1.0) * p.speed,
                hue: p.hue_base + (rng.gen_range(0.0f32..1.0) * 30.0 - 15.0),
                alpha: p.alpha * (0.7 + rng.gen_range(0.0f32..1.0) * 0.6),
            })
            .collect();
    }

    fn step(&mut self, step: &mut Step<'_>, surface: &mut dyn Surface) {
        let moving = !step.motion.is_reduced();
        if moving {
            self.time += step.dt;
        }
        let size = step.size;

        for blob in &mut self.blobs {
            if moving {
                blob.x += blob.vx;
                blob.y += blob.vy;
            }
            blob.x = wrap(blob.x, blob.radius, size.width);
            blob.y = wrap(blob.y, blob.radius, size.height);

            surface.fill_radial(
                Point::new(blob.x, blob.y),
                blob.breathing_radius(self.time),
                &blob.stops(),
                Blend::Lighter,
            );
        }
    }
}
