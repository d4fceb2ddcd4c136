//! Starfield with shooting stars (stateful).
//!
//! Ambient points fall slowly and wrap from the bottom edge back to the top.
//! Meteors spawn at random in the upper band, fly down and to the left
//! leaving a fading trail, and are culled once they burn out or leave the
//! surface.

use std::collections::VecDeque;
use std::f32::consts::PI;

use log::trace;
use rand::{Rng, rngs::StdRng};
use starfall_core::{Rgba, Size, StarfieldParams};

use crate::animator::{Effect, Step};
use crate::surface::{Blend, Point, Surface};

/// Distance past the top or bottom edge at which ambient points wrap.
pub const WRAP_MARGIN: f32 = 5.0;

/// Distance past the left, right or bottom edge at which meteors are culled.
pub const CULL_MARGIN: f32 = 50.0;

/// Heading band of new meteors, as fractions of π.
const HEADING_MIN: f32 = 0.70;
const HEADING_SPREAD: f32 = 0.06;

/// Meteor lifetime band in seconds.
const LIFE_MIN: f32 = 0.8;
const LIFE_SPREAD: f32 = 0.9;

/// A slowly drifting background dot.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientPoint {
    pub x: f32,
    pub y: f32,
    pub radius: f32,
    pub alpha: f32,
}

/// A shooting star with its trail, most recent position first.
#[derive(Debug, Clone, PartialEq)]
pub struct Meteor {
    /// Spawn order, unique per starfield.
    pub id: u64,
    pub x: f32,
    pub y: f32,
    pub vx: f32,
    pub vy: f32,
    /// Seconds since spawn.
    pub age: f32,
    /// Seconds until the meteor burns out.
    pub life: f32,
    pub trail: VecDeque<Point>,
}

impl Meteor {
    /// Whether the meteor has burned out or left `size` by more than the
    /// cull margin.
    pub fn is_spent(&self, size: Size) -> bool {
        self.x < -CULL_MARGIN
            || self.x > size.width + CULL_MARGIN
            || self.y > size.height + CULL_MARGIN
            || self.age > self.life
    }

    /// Opacity of the trail head: fades from 1.0 to 0.1 over the lifetime.
    pub fn head_alpha(&self) -> f32 {
        let t = if self.life > 0.0 {
            (self.age / self.life).min(1.0)
        } else {
            1.0
        };
        (1.0 - t) * 0.9 + 0.1
    }
}

/// Number of ambient points for a surface: `floor(area * density)`.
pub fn point_count(size: Size, density: f32) -> usize {
    let n = (size.area() * density).floor();
    if n.is_finite() && n > 0.0 { n as usize } else { 0 }
}

/// Starfield layer state.
#[derive(Debug, Clone)]
pub struct Starfield {
    params: StarfieldParams,
    points: Vec<AmbientPoint>,
    meteors: VecDeque<Meteor>,
    next_id: u64,
}

impl Starfield {
    pub fn new(params: StarfieldParams) -> Self {
        Self {
            params,
            points: Vec::new(),
            meteors: VecDeque::new(),
            next_id: 0,
        }
    }

    pub fn params(&self) -> &StarfieldParams {
        &self.params
    }

    /// Swap in new parameters. Takes full effect on the next reset.
    pub fn set_params(&mut self, params: StarfieldParams) {
        self.params = params;
    }

    pub fn points(&self) -> &[AmbientPoint] {
        &self.points
    }

    /// Live meteors, oldest first.
    pub fn meteors(&self) -> &VecDeque<Meteor> {
        &self.meteors
    }

    /// Create a meteor in the upper band of `size`, evicting the oldest ones
    /// when the live count exceeds the cap.
    pub fn spawn_meteor(&mut self, size: Size, rng: &mut StdRng) {
        let x = rng.gen_range(0.0f32..1.0) * size.width * 0.8 + size.width * 0.1;
        let y = rng.gen_range(0.0f32..1.0) * size.height * 0.3;
        let heading = PI * (HEADING_MIN + rng.gen_range(0.0f32..1.0) * HEADING_SPREAD);
        let life = LIFE_MIN + rng.gen_range(0.0f32..1.0) * LIFE_SPREAD;

        let meteor = Meteor {
            id: self.next_id,
            x,
            y,
            vx: heading.cos() * self.params.meteor_speed,
            vy: heading.sin() * self.params.meteor_speed,
            age: 0.0,
            life,
            trail: VecDeque::with_capacity(self.params.trail_length),
        };
        self.next_id += 1;
        trace!("meteor {} spawned at ({x:.0}, {y:.0})", meteor.id);
        self.meteors.push_back(meteor);

        while self.meteors.len() > self.params.max_meteors {
            if let Some(evicted) = self.meteors.pop_front() {
                trace!("meteor {} evicted", evicted.id);
            }
        }
    }

    fn drift_points(&mut self, height: f32) {
        let speed = self.params.drift_speed;
        for p in &mut self.points {
            p.y += speed;
            if p.y > height + WRAP_MARGIN {
                p.y = -WRAP_MARGIN;
            } else if p.y < -WRAP_MARGIN {
                // Negative drift rises through the top edge instead.
                p.y = height + WRAP_MARGIN;
            }
        }
    }

    fn draw_points(&self, surface: &mut dyn Surface) {
        for p in &self.points {
            surface.fill_circle(
                Point::new(p.x, p.y),
                p.radius,
                Rgba::WHITE.with_alpha(p.alpha),
                Blend::Over,
            );
        }
    }

    fn advance_meteors(&mut self, dt: f32) {
        let trail_length = self.params.trail_length;
        for m in &mut self.meteors {
            m.age += dt;
            m.x += m.vx * dt;
            m.y += m.vy * dt;
            m.trail.push_front(Point::new(m.x, m.y));
            m.trail.truncate(trail_length);
        }
    }

    fn draw_meteors(&self, surface: &mut dyn Surface) {
        let width = self.params.meteor_width;
        for m in &self.meteors {
            let head = m.head_alpha();
            let len = m.trail.len() as f32;
            for (p, (p0, p1)) in m.trail.iter().zip(m.trail.iter().skip(1)).enumerate() {
                let p = p as f32;
                let a = head * (1.0 - p / len);
                let stroke = width * (1.0 - p / (len * 1.15));
                surface.stroke_segment(
                    *p0,
                    *p1,
                    stroke,
                    Rgba::WHITE.with_alpha(a),
                    Rgba::WHITE.with_alpha((a - 0.25).max(0.0)),
                    Blend::Over,
                );
            }
        }
    }
}

impl Effect for Starfield {
    fn name(&self) -> &'static str {
        "starfield"
    }

    fn reset(&mut self, size: Size, rng: &mut StdRng) {
        let count = point_count(size, self.params.density);
        self.points = (0..count)
            .map(|_| AmbientPoint {
                x: rng.gen_range(0.0f32..1.0) * size.width,
                y: rng.gen_range(0.0f32..1.0) * size.height,
                radius: rng.gen_range(0.0f32..1.0) * 1.1 + 0.3,
                alpha: rng.gen_range(0.0f32..1.0) * 0.6 + 0.2,
            })
            .collect();
    }

    fn step(&mut self, step: &mut Step<'_>, surface: &mut dyn Surface) {
        let moving = !step.motion.is_reduced();

        if moving {
            self.drift_points(step.size.height);
        }
        self.draw_points(surface);

        if moving && step.rng.gen_range(0.0f32..1.0) < self.params.shoot_rate {
            self.spawn_meteor(step.size, step.rng);
        }

        if moving {
            self.advance_meteors(step.dt);
        } else {
            // Frozen in place, but still aging out.
            for m in &mut self.meteors {
                m.age += step.dt;
            }
        }
        self.draw_meteors(surface);

        let size = step.size;
        self.meteors.retain(|m| !m.is_spent(size));
    }
}
