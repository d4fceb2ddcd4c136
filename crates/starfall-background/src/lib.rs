//! Background animation rendering for starfall.
//!
//! The layers of the portfolio backdrop (a drifting colour nebula, a
//! technical grid with glow lines and a starfield with shooting stars) are
//! [`Effect`]s driven by an [`Animator`]. An animator owns the [`Surface`] it
//! paints on and is stepped explicitly with an elapsed time, so it runs the
//! same way under a terminal event loop and in tests.
//! [`BackgroundState`] stacks the three layers on terminal [`CellSurface`]s
//! and renders them into a ratatui frame.

mod animator;
mod chars;
mod clock;
mod color;
pub mod effects;
mod raster;
mod state;
mod surface;

pub use animator::{Animator, Effect, Lifecycle, Step};
pub use clock::{FrameClock, MAX_FRAME_DT};
pub use color::{hsla, to_color};
pub use raster::{CellSurface, compose};
pub use state::{BackgroundOptions, BackgroundState};
pub use surface::{Blend, Point, Surface, gradient_at};
