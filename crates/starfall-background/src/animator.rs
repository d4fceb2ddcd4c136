//! Animator lifecycle: mount, resize, tick, unmount.
//!
//! An [`Animator`] owns one effect, the surface it paints on and the random
//! source that drives it. It is driven synchronously through [`Animator::tick`]
//! (explicit elapsed time) or [`Animator::frame`] (host timestamp run through a
//! [`FrameClock`]), so tests can step it deterministically while the binary
//! calls it once per display refresh.

use std::time::Duration;

use log::{debug, info};
use rand::{SeedableRng, rngs::StdRng};
use starfall_core::{Motion, Size};

use crate::clock::{FrameClock, MAX_FRAME_DT};
use crate::surface::Surface;

/// Where an animator is in its life.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    /// Created but not yet bound to a surface size.
    Uninitialized,
    /// Mounted; every tick advances and repaints.
    Running,
    /// Unmounted. Terminal: ticks and resizes are ignored.
    Stopped,
}

/// Per-tick inputs handed to an effect.
pub struct Step<'a> {
    /// Elapsed seconds since the previous tick.
    pub dt: f32,
    /// Surface size for this tick.
    pub size: Size,
    pub motion: Motion,
    /// Pointer position normalized to `-1..=1` on both axes.
    pub pointer: (f32, f32),
    pub rng: &'a mut StdRng,
}

/// A time-driven layer that paints onto a [`Surface`].
pub trait Effect {
    /// Short name used in log lines.
    fn name(&self) -> &'static str;

    /// Rebuild size-dependent state. Called at mount and on every resize.
    fn reset(&mut self, size: Size, rng: &mut StdRng);

    /// Advance one tick and paint onto an already cleared surface.
    fn step(&mut self, step: &mut Step<'_>, surface: &mut dyn Surface);
}

/// Owns an effect, its surface and its random source.
#[derive(Debug)]
pub struct Animator<E, S> {
    effect: E,
    surface: S,
    rng: StdRng,
    clock: FrameClock,
    state: Lifecycle,
    motion: Motion,
    pointer: (f32, f32),
}

impl<E: Effect, S: Surface> Animator<E, S> {
    /// Animator with a non-deterministic random source.
    pub fn new(effect: E, surface: S) -> Self {
        Self::with_rng(effect, surface, StdRng::from_entropy())
    }

    /// Animator whose output is fully determined by `seed`.
    pub fn seeded(effect: E, surface: S, seed: u64) -> Self {
        Self::with_rng(effect, surface, StdRng::seed_from_u64(seed))
    }

    pub fn with_rng(effect: E, surface: S, rng: StdRng) -> Self {
        Self {
            effect,
            surface,
            rng,
            clock: FrameClock::new(),
            state: Lifecycle::Uninitialized,
            motion: Motion::Full,
            pointer: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> Lifecycle {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == Lifecycle::Running
    }

    pub fn effect(&self) -> &E {
        &self.effect
    }

    pub fn effect_mut(&mut self) -> &mut E {
        &mut self.effect
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn motion(&self) -> Motion {
        self.motion
    }

    pub fn set_motion(&mut self, motion: Motion) {
        self.motion = motion;
    }

    /// Record the pointer position, normalized to `-1..=1`.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        self.pointer = (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
    }

    /// Bind to the initial viewport size and start running.
    ///
    /// Only an uninitialized animator can be mounted.
    pub fn mount(&mut self, size: Size) {
        if self.state != Lifecycle::Uninitialized {
            return;
        }
        self.surface.resize(size);
        self.effect.reset(size, &mut self.rng);
        self.clock.reset();
        self.state = Lifecycle::Running;
        info!(
            "{} mounted at {}x{}",
            self.effect.name(),
            size.width,
            size.height
        );
    }

    /// Rebind to a new viewport size. Stays running.
    pub fn resize(&mut self, size: Size) {
        if self.state != Lifecycle::Running {
            return;
        }
        self.surface.resize(size);
        self.effect.reset(size, &mut self.rng);
        debug!(
            "{} resized to {}x{}",
            self.effect.name(),
            size.width,
            size.height
        );
    }

    /// Run one simulation step with an explicit elapsed time in seconds,
    /// clamped to [`MAX_FRAME_DT`].
    ///
    /// Returns whether the step ran. Nothing is drawn unless the animator is
    /// running on a non-empty surface.
    pub fn tick(&mut self, dt: f32) -> bool {
        if self.state != Lifecycle::Running {
            return false;
        }
        let size = self.surface.size();
        if size.is_empty() {
            return false;
        }

        self.surface.clear();
        let mut step = Step {
            dt: if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 },
            size,
            motion: self.motion,
            pointer: self.pointer,
            rng: &mut self.rng,
        };
        self.effect.step(&mut step, &mut self.surface);
        true
    }

    /// Run one step for a host frame timestamp.
    pub fn frame(&mut self, timestamp: Duration) -> bool {
        let dt = self.clock.advance(timestamp);
        self.tick(dt)
    }

    /// Forget the last frame timestamp so the next frame starts from zero
    /// elapsed time.
    pub fn resume(&mut self) {
        self.clock.reset();
    }

    /// Stop for good. Later ticks are no-ops.
    pub fn unmount(&mut self) {
        if self.state == Lifecycle::Stopped {
            return;
        }
        self.state = Lifecycle::Stopped;
        info!("{} unmounted", self.effect.name());
    }
}
