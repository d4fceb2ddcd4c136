//! Terminal raster surface and layer compositing.
//!
//! A [`CellSurface`] maps surface pixels onto terminal cells. Each cell keeps
//! two channels: *ink* (painted with [`Blend::Over`], shown as a glyph in the
//! foreground) and *glow* (added with [`Blend::Lighter`], shown as a background
//! tint).

use ratatui::{
    style::Style,
    text::{Line, Span},
};
use starfall_core::{Rgba, Size};

use crate::chars::ink_glyph;
use crate::color::to_color;
use crate::surface::{Blend, Point, Surface, gradient_at};

/// Circles at least this large cover their whole cell.
const FULL_COVER_RADIUS: f32 = 1.4;

/// Glow below this on every channel leaves the terminal background alone.
const GLOW_FLOOR: f32 = 0.02;

#[derive(Debug, Clone, Copy, Default)]
struct Texel {
    /// Premultiplied ink colour.
    ink: [f32; 3],
    /// Ink coverage.
    ink_a: f32,
    /// Additive light.
    glow: [f32; 3],
}

impl Texel {
    fn paint(&mut self, color: Rgba, coverage: f32, blend: Blend) {
        let a = (color.a * coverage).clamp(0.0, 1.0);
        if !(a > 0.0) {
            return;
        }
        match blend {
            Blend::Over => {
                let keep = 1.0 - a;
                self.ink[0] = color.r * a + self.ink[0] * keep;
                self.ink[1] = color.g * a + self.ink[1] * keep;
                self.ink[2] = color.b * a + self.ink[2] * keep;
                self.ink_a = a + self.ink_a * keep;
            }
            Blend::Lighter => {
                self.glow[0] += color.r * a;
                self.glow[1] += color.g * a;
                self.glow[2] += color.b * a;
            }
        }
    }

    fn merge(&mut self, other: &Texel) {
        let keep = 1.0 - other.ink_a;
        for i in 0..3 {
            self.ink[i] = other.ink[i] + self.ink[i] * keep;
            self.glow[i] += other.glow[i];
        }
        self.ink_a = other.ink_a + self.ink_a * keep;
    }

    fn ink_color(&self) -> Rgba {
        if self.ink_a > 0.0 {
            Rgba::new(
                self.ink[0] / self.ink_a,
                self.ink[1] / self.ink_a,
                self.ink[2] / self.ink_a,
                self.ink_a,
            )
        } else {
            Rgba::TRANSPARENT
        }
    }

    fn span(&self) -> Span<'static> {
        let glow = Rgba::new(self.glow[0], self.glow[1], self.glow[2], 1.0);
        let lit = self.glow.iter().any(|&c| c > GLOW_FLOOR);

        let mut style = Style::new();
        if lit {
            style = style.bg(to_color(glow));
        }

        match ink_glyph(self.ink_a) {
            Some(ch) => {
                let ink = self.ink_color();
                let base = if lit { glow } else { Rgba::TRANSPARENT };
                let fg = base.lerp(ink, 0.4 + 0.6 * self.ink_a.min(1.0));
                Span::styled(ch.to_string(), style.fg(to_color(fg)))
            }
            None if lit => Span::styled(" ", style),
            None => Span::raw(" "),
        }
    }
}

/// A surface whose pixels are grouped into terminal cells.
#[derive(Debug, Clone)]
pub struct CellSurface {
    cell_width: f32,
    cell_height: f32,
    size: Size,
    cols: usize,
    rows: usize,
    texels: Vec<Texel>,
}

impl CellSurface {
    /// Create an empty surface where one terminal cell spans
    /// `cell_width × cell_height` surface pixels.
    pub fn new(cell_width: f32, cell_height: f32) -> Self {
        Self {
            cell_width: cell_width.max(1.0),
            cell_height: cell_height.max(1.0),
            size: Size::ZERO,
            cols: 0,
            rows: 0,
            texels: Vec::new(),
        }
    }

    /// Surface size covering a `cols × rows` terminal area.
    pub fn size_for(&self, cols: u16, rows: u16) -> Size {
        Size::new(cols as f32 * self.cell_width, rows as f32 * self.cell_height)
    }

    /// Grid dimensions in cells.
    pub fn dims(&self) -> (usize, usize) {
        (self.cols, self.rows)
    }

    /// Ink of a cell as a straight colour whose alpha is the coverage.
    pub fn ink_at(&self, col: usize, row: usize) -> Rgba {
        self.texel(col, row)
            .map(Texel::ink_color)
            .unwrap_or(Rgba::TRANSPARENT)
    }

    /// Accumulated glow of a cell.
    pub fn glow_at(&self, col: usize, row: usize) -> [f32; 3] {
        self.texel(col, row).map(|t| t.glow).unwrap_or([0.0; 3])
    }

    fn texel(&self, col: usize, row: usize) -> Option<&Texel> {
        if col < self.cols && row < self.rows {
            self.texels.get(row * self.cols + col)
        } else {
            None
        }
    }

    fn cell_of(&self, p: Point) -> Option<usize> {
        if !(p.x.is_finite() && p.y.is_finite()) || p.x < 0.0 || p.y < 0.0 {
            return None;
        }
        let col = (p.x / self.cell_width) as usize;
        let row = (p.y / self.cell_height) as usize;
        (col < self.cols && row < self.rows).then(|| row * self.cols + col)
    }

    fn cell_center(&self, col: usize, row: usize) -> Point {
        Point::new(
            (col as f32 + 0.5) * self.cell_width,
            (row as f32 + 0.5) * self.cell_height,
        )
    }

    /// Cells whose centres may fall inside the given disc.
    fn cells_around(&self, center: Point, radius: f32) -> impl Iterator<Item = (usize, usize)> {
        let span = |lo: f32, hi: f32, cell: f32, n: usize| {
            if n == 0 || !(lo.is_finite() && hi.is_finite()) {
                return 0..0;
            }
            let first = (lo / cell).floor().max(0.0) as usize;
            let last = ((hi / cell).ceil().max(0.0) as usize).min(n);
            first.min(last)..last
        };
        let cols = span(center.x - radius, center.x + radius, self.cell_width, self.cols);
        let rows = span(center.y - radius, center.y + radius, self.cell_height, self.rows);
        rows.flat_map(move |row| cols.clone().map(move |col| (col, row)))
    }
}

impl Surface for CellSurface {
    fn size(&self) -> Size {
        self.size
    }

    fn resize(&mut self, size: Size) {
        self.size = size;
        if size.is_empty() {
            self.cols = 0;
            self.rows = 0;
        } else {
            self.cols = (size.width / self.cell_width).ceil() as usize;
            self.rows = (size.height / self.cell_height).ceil() as usize;
        }
        self.texels = vec![Texel::default(); self.cols * self.rows];
    }

    fn clear(&mut self) {
        self.texels.fill(Texel::default());
    }

    fn fill_circle(&mut self, center: Point, radius: f32, color: Rgba, blend: Blend) {
        let coverage = (radius / FULL_COVER_RADIUS).clamp(0.35, 1.0);
        let home = self.cell_of(center);
        if let Some(idx) = home {
            self.texels[idx].paint(color, coverage, blend);
        }
        // Large circles also spill onto neighbouring cells.
        if radius > self.cell_width.min(self.cell_height) * 0.5 {
            let cells: Vec<_> = self.cells_around(center, radius).collect();
            for (col, row) in cells {
                let idx = row * self.cols + col;
                let c = self.cell_center(col, row);
                let inside = (c.x - center.x).hypot(c.y - center.y) <= radius;
                if inside && Some(idx) != home {
                    self.texels[idx].paint(color, 1.0, blend);
                }
            }
        }
    }

    fn stroke_segment(
        &mut self,
        from: Point,
        to: Point,
        width: f32,
        from_color: Rgba,
        to_color: Rgba,
        blend: Blend,
    ) {
        if self.texels.is_empty() || !(width > 0.0) {
            return;
        }
        let coverage = (width / FULL_COVER_RADIUS).clamp(0.3, 1.0);
        let Some((t0, t1)) = clip_segment(from, to, self.size) else {
            return;
        };
        // Only the visible part is sampled, so the cost is bounded by the grid.
        let length = (to.x - from.x).hypot(to.y - from.y) * (t1 - t0);
        if !length.is_finite() {
            return;
        }
        let step = self.cell_width.min(self.cell_height) * 0.5;
        let samples = ((length / step).ceil() as usize).clamp(1, 2 * (self.cols + self.rows));

        let mut last = None;
        for i in 0..=samples {
            let t = t0 + (t1 - t0) * (i as f32 / samples as f32);
            let p = Point::new(from.x + (to.x - from.x) * t, from.y + (to.y - from.y) * t);
            let Some(idx) = self.cell_of(p) else {
                continue;
            };
            if last == Some(idx) {
                continue;
            }
            last = Some(idx);
            self.texels[idx].paint(from_color.lerp(to_color, t), coverage, blend);
        }
    }

    fn fill_radial(&mut self, center: Point, radius: f32, stops: &[(f32, Rgba)], blend: Blend) {
        if !(radius > 0.0) {
            return;
        }
        let cells: Vec<_> = self.cells_around(center, radius).collect();
        for (col, row) in cells {
            let c = self.cell_center(col, row);
            let offset = (c.x - center.x).hypot(c.y - center.y) / radius;
            if offset <= 1.0 {
                let idx = row * self.cols + col;
                self.texels[idx].paint(gradient_at(stops, offset), 1.0, blend);
            }
        }
    }
}

/// Parameter range `t0..=t1` of the part of `from -> to` inside the surface
/// rectangle, or `None` when the segment misses it.
fn clip_segment(from: Point, to: Point, size: Size) -> Option<(f32, f32)> {
    let dx = to.x - from.x;
    let dy = to.y - from.y;
    if !(dx.is_finite() && dy.is_finite() && from.x.is_finite() && from.y.is_finite()) {
        return None;
    }
    let (mut t0, mut t1) = (0.0f32, 1.0f32);
    let edges = [
        (-dx, from.x),
        (dx, size.width - from.x),
        (-dy, from.y),
        (dy, size.height - from.y),
    ];
    for (p, q) in edges {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Merge layer rasters back to front into terminal lines.
///
/// Layers whose grid differs from the first one are skipped.
pub fn compose(layers: &[&CellSurface]) -> Vec<Line<'static>> {
    let Some(base) = layers.first() else {
        return Vec::new();
    };
    let (cols, rows) = base.dims();

    let mut merged = vec![Texel::default(); cols * rows];
    for layer in layers.iter().filter(|l| l.dims() == (cols, rows)) {
        for (dst, src) in merged.iter_mut().zip(&layer.texels) {
            dst.merge(src);
        }
    }

    merged
        .chunks(cols.max(1))
        .take(rows)
        .map(|row| Line::from(row.iter().map(Texel::span).collect::<Vec<_>>()))
        .collect()
}
