//! Technical grid and diagonal glow lines with a slight pointer parallax.

use rand::rngs::StdRng;
use starfall_core::{Rgba, Size, TechLinesParams};

use crate::animator::{Effect, Step};
use crate::surface::{Blend, Point, Surface};

/// Grid colour (#6ee7e7).
const GRID_RGB: (u8, u8, u8) = (110, 231, 231);

/// Glow line colour.
const LINE_RGB: (u8, u8, u8) = (34, 211, 238);

/// Peak opacity in the middle of a glow line, before the layer opacity.
const LINE_PEAK: f32 = 0.8;

/// Tech lines layer state.
#[derive(Debug, Clone)]
pub struct TechLines {
    params: TechLinesParams,
    /// Diagonal lines for the current size, before parallax.
    diagonals: Vec<(Point, Point)>,
}

impl TechLines {
    pub fn new(params: TechLinesParams) -> Self {
        Self {
            params,
            diagonals: Vec::new(),
        }
    }

    pub fn set_params(&mut self, params: TechLinesParams) {
        self.params = params;
    }

    pub fn diagonals(&self) -> &[(Point, Point)] {
        &self.diagonals
    }

    /// Positions of grid lines along one axis, shifted by `offset`.
    pub fn grid_positions(spacing: f32, offset: f32, extent: f32) -> Vec<f32> {
        if !(spacing > 0.0) || !(extent > 0.0) || !offset.is_finite() {
            return Vec::new();
        }
        let mut at = offset.rem_euclid(spacing);
        let mut out = Vec::new();
        while at < extent {
            out.push(at);
            at += spacing;
        }
        out
    }

    fn draw_grid(&self, size: Size, shift: (f32, f32), surface: &mut dyn Surface) {
        let (r, g, b) = GRID_RGB;
        let color = Rgba::from_rgb8(r, g, b, self.params.grid_opacity);
        let spacing = self.params.grid_spacing;

        for x in Self::grid_positions(spacing, shift.0, size.width) {
            surface.stroke_segment(
                Point::new(x, 0.0),
                Point::new(x, size.height),
                1.0,
                color,
                color,
                Blend::Lighter,
            );
        }
        for y in Self::grid_positions(spacing, shift.1, size.height) {
            surface.stroke_segment(
                Point::new(0.0, y),
                Point::new(size.width, y),
                1.0,
                color,
                color,
                Blend::Lighter,
            );
        }
    }

    fn draw_diagonals(
        &self,
        size: Size,
        shift: (f32, f32),
        opacity: f32,
        surface: &mut dyn Surface,
    ) {
        let (r, g, b) = LINE_RGB;
        let clear = Rgba::from_rgb8(r, g, b, 0.0);
        let peak = clear.with_alpha(LINE_PEAK * opacity);
        let width = 0.5 * (size.width / 100.0).min(size.height / 100.0);

        for (from, to) in &self.diagonals {
            let a = Point::new(from.x + shift.0, from.y + shift.1);
            let b = Point::new(to.x + shift.0, to.y + shift.1);
            let mid = Point::new((a.x + b.x) * 0.5, (a.y + b.y) * 0.5);
            surface.stroke_segment(a, mid, width, clear, peak, Blend::Lighter);
            surface.stroke_segment(mid, b, width, peak, clear, Blend::Lighter);
        }
    }
}

impl Effect for TechLines {
    fn name(&self) -> &'static str {
        "tech-lines"
    }

    fn reset(&mut self, size: Size, _rng: &mut StdRng) {
        // Lines live in a 100x100 box stretched over the surface.
        let sx = size.width / 100.0;
        let sy = size.height / 100.0;
        self.diagonals = (0..self.params.line_count)
            .map(|i| {
                let y = i as f32 * 10.0;
                (
                    Point::new(-10.0 * sx, y * sy),
                    Point::new(110.0 * sx, (y - 30.0) * sy),
                )
            })
            .collect();
    }

    fn step(&mut self, step: &mut Step<'_>, surface: &mut dyn Surface) {
        let reduced = step.motion.is_reduced();
        let (px, py) = if reduced { (0.0, 0.0) } else { step.pointer };
        let p = self.params;

        let opacity = if reduced {
            p.reduced_line_opacity
        } else {
            p.line_opacity
        };

        self.draw_grid(
            step.size,
            (px * p.grid_parallax, py * p.grid_parallax),
            surface,
        );
        self.draw_diagonals(
            step.size,
            (px * p.line_parallax, py * p.line_parallax),
            opacity,
            surface,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn grid_positions_cover_the_extent() {
        assert_eq!(
            TechLines::grid_positions(120.0, 0.0, 400.0),
            vec![0.0, 120.0, 240.0, 360.0]
        );
        assert_eq!(
            TechLines::grid_positions(120.0, -6.0, 250.0),
            vec![114.0, 234.0]
        );
        assert!(TechLines::grid_positions(0.0, 0.0, 400.0).is_empty());
        assert!(TechLines::grid_positions(120.0, f32::NAN, 400.0).is_empty());
    }

    #[test]
    fn diagonals_follow_the_unit_box() {
        let mut lines = TechLines::new(TechLinesParams::default());
        lines.reset(Size::new(200.0, 100.0), &mut StdRng::seed_from_u64(0));
        assert_eq!(lines.diagonals().len(), 12);
        let (from, to) = lines.diagonals()[3];
        assert_eq!(from, Point::new(-20.0, 30.0));
        assert_eq!(to, Point::new(220.0, 0.0));
    }
}
