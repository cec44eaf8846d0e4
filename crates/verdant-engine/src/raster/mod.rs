//! CPU reference pipeline.
//!
//! Runs the shader pair the way a GPU's fixed-function stages would for a
//! non-indexed triangle list: vertex shading, primitive assembly, perspective
//! divide, viewport transform, rasterization at pixel centers with the
//! top-left fill rule, fragment shading, replace-write.
//!
//! It exists so pipeline-level behavior (coverage, degenerate and NaN
//! primitives) can be checked deterministically without a GPU adapter.

mod framebuffer;
mod pipeline;

pub use framebuffer::Framebuffer;
pub use pipeline::{DrawStats, Fragment, FragmentShader, Rasterizer, SolidShader, VertexShader};
