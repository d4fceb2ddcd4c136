//! Character constants for rendering ink intensity.

/// Glyphs from faintest to brightest.
pub const INK_RAMP: &[char] = &['·', '.', '+', '*', '✦'];

/// Ink coverage below this shows no glyph.
pub const INK_THRESHOLD: f32 = 0.06;

/// Pick the glyph for an ink coverage value.
pub fn ink_glyph(coverage: f32) -> Option<char> {
    if !(coverage >= INK_THRESHOLD) {
        return None;
    }
    let t = ((coverage - INK_THRESHOLD) / (1.0 - INK_THRESHOLD)).clamp(0.0, 1.0);
    let idx = ((t * INK_RAMP.len() as f32) as usize).min(INK_RAMP.len() - 1);
    Some(INK_RAMP[idx])
}
