//! The background layers.

pub mod nebula;
pub mod starfield;
pub mod tech_lines;
