//! The drawing surface an animator paints on.

use starfall_core::{Rgba, Size};

/// A position in surface pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// How a draw combines with what is already on the surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Blend {
    /// Paint over existing content.
    #[default]
    Over,
    /// Add light to existing content.
    Lighter,
}

/// Pixel-addressable drawing area exclusively owned by one animator.
pub trait Surface {
    /// Current size in surface pixels.
    fn size(&self) -> Size;

    /// Bind the surface to a new size. Clears its content.
    fn resize(&mut self, size: Size);

    /// Erase everything drawn so far.
    fn clear(&mut self);

    /// Filled circle.
    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba, blend: Blend);

    /// Straight line whose colour runs from `from_color` to `to_color`.
    fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        from_color: Rgba,
        to_color: Rgba,
        blend: Blend,
    );

    /// Disc filled with a radial gradient. `stops` are `(offset, colour)`
    /// pairs sorted by offset in `0..=1`.
    fn fill_radial(&mut self, center: Point, radius: f32, stops: &[(f32, Rgba)], blend: Blend);
}

/// Colour of a gradient at `offset`, interpolating between the nearest stops.
pub fn gradient_at(stops: &[(f32, Rgba)], offset: f32) -> Rgba {
    let Some(&(first_at, first)) = stops.first() else {
        return Rgba::TRANSPARENT;
    };
    if offset <= first_at {
        return first;
    }
    for pair in stops.windows(2) {
        let (a_at, a) = pair[0];
        let (b_at, b) = pair[1];
        if offset <= b_at {
            let span = b_at - a_at;
            let t = if span > 0.0 { (offset - a_at) / span } else { 1.0 };
            return a.lerp(b, t);
        }
    }
    stops.last().map(|&(_, c)| c).unwrap_or(Rgba::TRANSPARENT)
}
