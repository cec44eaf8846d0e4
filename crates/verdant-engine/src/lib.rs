//! Verdant engine crate.
//!
//! The solid-fill shader pair, a CPU reference rasterizer for it, and the
//! platform + GPU runtime that puts it on screen.

pub mod shader;
pub mod raster;

pub mod device;
pub mod render;
pub mod paint;

pub mod window;
pub mod time;
pub mod core;

pub mod logging;
