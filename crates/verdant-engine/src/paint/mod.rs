//! Color values used by the host (clear colors, comparisons).

mod color;

pub use color::Color;
