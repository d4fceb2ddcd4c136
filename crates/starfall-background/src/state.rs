//! Background animation state management.

use std::time::Duration;

use log::debug;
use ratatui::{Frame, widgets::Paragraph};
use starfall_core::{LayerSet, Motion, NebulaParams, Preset, StarfieldParams, TechLinesParams};

use crate::animator::{Animator, Effect, Lifecycle};
use crate::effects::{nebula::Nebula, starfield::Starfield, tech_lines::TechLines};
use crate::raster::{CellSurface, compose};
use crate::surface::Surface;

/// Construction-time settings for [`BackgroundState`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BackgroundOptions {
    /// Surface pixels per terminal column.
    pub cell_width: f32,
    /// Surface pixels per terminal row.
    pub cell_height: f32,
    /// Fixed seed for reproducible output. `None` seeds from entropy.
    pub seed: Option<u64>,
    pub starfield: StarfieldParams,
    pub nebula: NebulaParams,
    pub tech_lines: TechLinesParams,
}

impl Default for BackgroundOptions {
    fn default() -> Self {
        Self {
            cell_width: 8.0,
            cell_height: 16.0,
            seed: None,
            starfield: Preset::default().starfield(),
            nebula: Preset::default().nebula(),
            tech_lines: Preset::default().tech_lines(),
        }
    }
}

fn animator<E: Effect>(
    effect: E,
    options: &BackgroundOptions,
    salt: u64,
) -> Animator<E, CellSurface> {
    let surface = CellSurface::new(options.cell_width, options.cell_height);
    match options.seed {
        Some(seed) => Animator::seeded(effect, surface, seed.wrapping_add(salt)),
        None => Animator::new(effect, surface),
    }
}

/// Background animation state: one animator per layer, back to front.
#[derive(Debug)]
pub struct BackgroundState {
    nebula: Animator<Nebula, CellSurface>,
    tech_lines: Animator<TechLines, CellSurface>,
    starfield: Animator<Starfield, CellSurface>,
    /// Layers that are ticked and drawn.
    layers: LayerSet,
    /// Last known terminal width.
    last_width: u16,
    /// Last known terminal height.
    last_height: u16,
    paused: bool,
}

impl Default for BackgroundState {
    fn default() -> Self {
        Self::new(BackgroundOptions::default())
    }
}

impl BackgroundState {
    /// Create a new background state. Nothing is mounted until the first
    /// render.
    pub fn new(options: BackgroundOptions) -> Self {
        Self {
            nebula: animator(Nebula::new(options.nebula), &options, 0),
            tech_lines: animator(TechLines::new(options.tech_lines), &options, 1),
            starfield: animator(Starfield::new(options.starfield), &options, 2),
            layers: LayerSet::default(),
            last_width: 0,
            last_height: 0,
            paused: false,
        }
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.starfield.state()
    }

    pub fn starfield(&self) -> &Starfield {
        self.starfield.effect()
    }

    pub fn nebula(&self) -> &Nebula {
        self.nebula.effect()
    }

    pub fn tech_lines(&self) -> &TechLines {
        self.tech_lines.effect()
    }

    pub fn layers(&self) -> LayerSet {
        self.layers
    }

    pub fn set_layers(&mut self, layers: LayerSet) {
        self.layers = layers;
    }

    pub fn motion(&self) -> Motion {
        self.starfield.motion()
    }

    pub fn set_motion(&mut self, motion: Motion) {
        self.nebula.set_motion(motion);
        self.tech_lines.set_motion(motion);
        self.starfield.set_motion(motion);
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Freeze on the current frame.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Continue animating without a jump for the paused time.
    pub fn resume(&mut self) {
        if !self.paused {
            return;
        }
        self.paused = false;
        self.nebula.resume();
        self.tech_lines.resume();
        self.starfield.resume();
    }

    /// Record a pointer position in terminal cells.
    pub fn set_pointer(&mut self, col: u16, row: u16) {
        if self.last_width == 0 || self.last_height == 0 {
            return;
        }
        let x = (col as f32 / self.last_width as f32 - 0.5) * 2.0;
        let y = (row as f32 / self.last_height as f32 - 0.5) * 2.0;
        self.nebula.set_pointer(x, y);
        self.tech_lines.set_pointer(x, y);
        self.starfield.set_pointer(x, y);
    }

    /// Replace every layer's parameters and rebuild the layers in place.
    pub fn set_params(
        &mut self,
        starfield: StarfieldParams,
        nebula: NebulaParams,
        tech_lines: TechLinesParams,
    ) {
        self.starfield.effect_mut().set_params(starfield);
        self.nebula.effect_mut().set_params(nebula);
        self.tech_lines.effect_mut().set_params(tech_lines);

        let size = self.starfield.surface().size();
        self.starfield.resize(size);
        self.nebula.resize(self.nebula.surface().size());
        self.tech_lines.resize(self.tech_lines.surface().size());
    }

    /// Switch every layer to a preset's parameters.
    pub fn apply_preset(&mut self, preset: Preset) {
        debug!("applying preset {preset}");
        self.set_params(preset.starfield(), preset.nebula(), preset.tech_lines());
    }

    /// Stop all layers. Later renders draw nothing.
    pub fn unmount(&mut self) {
        self.nebula.unmount();
        self.tech_lines.unmount();
        self.starfield.unmount();
    }

    /// Bind the layers to a terminal area of `width × height` cells,
    /// mounting on first use.
    pub fn sync_size(&mut self, width: u16, height: u16) {
        let dimensions_changed = width != self.last_width || height != self.last_height;
        let unmounted = self.lifecycle() == Lifecycle::Uninitialized;
        if !dimensions_changed && !unmounted {
            return;
        }

        let size = self.starfield.surface().size_for(width, height);
        if unmounted {
            self.nebula.mount(size);
            self.tech_lines.mount(size);
            self.starfield.mount(size);
        } else {
            self.nebula.resize(size);
            self.tech_lines.resize(size);
            self.starfield.resize(size);
        }
        self.last_width = width;
        self.last_height = height;
    }

    /// Advance every visible layer for a host frame timestamp.
    ///
    /// Returns how many layers ran a step.
    pub fn advance(&mut self, timestamp: Duration) -> usize {
        if self.paused {
            return 0;
        }
        let mut stepped = 0;
        if self.layers.nebula() && self.nebula.frame(timestamp) {
            stepped += 1;
        }
        if self.layers.tech_lines() && self.tech_lines.frame(timestamp) {
            stepped += 1;
        }
        if self.layers.starfield() && self.starfield.frame(timestamp) {
            stepped += 1;
        }
        stepped
    }

    /// Surfaces of the visible layers, back to front.
    pub fn visible_surfaces(&self) -> Vec<&CellSurface> {
        let mut out = Vec::with_capacity(3);
        if self.layers.nebula() {
            out.push(self.nebula.surface());
        }
        if self.layers.tech_lines() {
            out.push(self.tech_lines.surface());
        }
        if self.layers.starfield() {
            out.push(self.starfield.surface());
        }
        out
    }

    /// Render the background to the frame.
    pub fn render(&mut self, frame: &mut Frame, timestamp: Duration) {
        if self.lifecycle() == Lifecycle::Stopped {
            return;
        }

        let area = frame.area();
        self.sync_size(area.width, area.height);
        self.advance(timestamp);

        let lines = compose(&self.visible_surfaces());
        frame.render_widget(Paragraph::new(lines), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> BackgroundState {
        BackgroundState::new(BackgroundOptions {
            seed: Some(11),
            ..BackgroundOptions::default()
        })
    }

    #[test]
    fn mounts_on_first_sync() {
        let mut bg = seeded();
        assert_eq!(bg.lifecycle(), Lifecycle::Uninitialized);
        bg.sync_size(80, 24);
        assert_eq!(bg.lifecycle(), Lifecycle::Running);
        // 640 x 384 surface pixels at the page density.
        assert_eq!(bg.starfield().points().len(), 39);
        assert_eq!(bg.nebula().blobs().len(), 7);
    }

    #[test]
    fn resize_regenerates_points() {
        let mut bg = seeded();
        bg.sync_size(80, 24);
        bg.sync_size(160, 48);
        assert_eq!(bg.starfield().points().len(), 157);
        assert_eq!(bg.lifecycle(), Lifecycle::Running);
    }

    #[test]
    fn layer_selection_limits_stepping() {
        let mut bg = seeded();
        bg.sync_size(40, 12);
        assert_eq!(bg.advance(Duration::ZERO), 3);
        bg.set_layers(LayerSet::Nebula);
        assert_eq!(bg.advance(Duration::from_millis(16)), 1);
        assert_eq!(bg.visible_surfaces().len(), 1);
    }

    #[test]
    fn paused_state_does_not_step() {
        let mut bg = seeded();
        bg.sync_size(40, 12);
        bg.pause();
        assert_eq!(bg.advance(Duration::from_millis(16)), 0);
        bg.resume();
        assert_eq!(bg.advance(Duration::from_millis(32)), 3);
    }

    #[test]
    fn unmount_stops_every_layer() {
        let mut bg = seeded();
        bg.sync_size(40, 12);
        bg.unmount();
        assert_eq!(bg.lifecycle(), Lifecycle::Stopped);
        assert_eq!(bg.advance(Duration::from_millis(16)), 0);
    }

    #[test]
    fn preset_switch_rebuilds_layers() {
        let mut bg = seeded();
        bg.sync_size(80, 24);
        bg.apply_preset(Preset::Component);
        assert_eq!(bg.nebula().blobs().len(), 6);
        assert_eq!(bg.starfield().params().trail_length, 14);
    }

    #[test]
    fn reduced_motion_reaches_every_layer() {
        let mut bg = seeded();
        bg.set_motion(Motion::Reduced);
        assert_eq!(bg.motion(), Motion::Reduced);
    }
}
