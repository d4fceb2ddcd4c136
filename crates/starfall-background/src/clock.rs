//! Conversion of frame timestamps into clamped elapsed time.

use std::time::Duration;

/// Largest elapsed time fed to a tick, in seconds (about two frames at 60 Hz).
pub const MAX_FRAME_DT: f32 = 0.033;

/// Tracks the previous frame timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct FrameClock {
    last: Option<Duration>,
}

impl FrameClock {
    pub fn new() -> Self {
        Self::default()
    }

    /// Elapsed seconds since the previous call, clamped to `0..=MAX_FRAME_DT`.
    ///
    /// The first frame after construction or [`reset`](Self::reset) yields 0.
    pub fn advance(&mut self, timestamp: Duration) -> f32 {
        let dt = match self.last {
            Some(last) => timestamp.saturating_sub(last).as_secs_f32().min(MAX_FRAME_DT),
            None => 0.0,
        };
        self.last = Some(timestamp);
        dt
    }

    /// Forget the previous timestamp.
    pub fn reset(&mut self) {
        self.last = None;
    }
}
