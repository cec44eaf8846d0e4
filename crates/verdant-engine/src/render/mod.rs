//! GPU rendering subsystem.
//!
//! Renderers record commands into a caller-owned encoder and keep their own
//! GPU resources (pipelines, buffers).
//!
//! Convention:
//! - geometry is already in clip space; nothing here transforms it
//! - passes load the existing target, so clear first with [`clear`]

mod ctx;
mod offscreen;
mod pass;
mod solid;

pub use ctx::{RenderCtx, RenderTarget};
pub use offscreen::{Image, OffscreenTarget};
pub use pass::clear;
pub use solid::SolidRenderer;
