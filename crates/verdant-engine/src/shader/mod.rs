//! The solid-fill shader pair.
//!
//! Two stateless entry points:
//! - `vs_main` embeds a 2D position into clip space as `(x, y, 0, 1)`
//! - `fs_main` writes opaque green to color target 0
//!
//! `stage` holds CPU functions with the same contract; the software
//! rasterizer runs those, and tests compare both forms.

mod stage;

use anyhow::{Context, Result};

pub use stage::{fragment_stage, vertex_stage, ClipPosition, FragmentOutput, VertexInput};

/// WGSL source for both stages.
pub const SOURCE: &str = include_str!("solid.wgsl");

/// Vertex entry point name in [`SOURCE`].
pub const VERTEX_ENTRY: &str = "vs_main";

/// Fragment entry point name in [`SOURCE`].
pub const FRAGMENT_ENTRY: &str = "fs_main";

/// `@location` of the `position` vertex attribute.
pub const POSITION_LOCATION: u32 = 0;

/// Color target slot written by the fragment stage.
pub const COLOR_TARGET: u32 = 0;

/// Compiles [`SOURCE`] on `device`.
///
/// Creation runs inside a validation error scope so a compile failure comes
/// back as an error instead of reaching the device's uncaptured-error handler.
pub fn create_module(device: &wgpu::Device) -> Result<wgpu::ShaderModule> {
    let scope = device.push_error_scope(wgpu::ErrorFilter::Validation);

    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some("verdant solid shader"),
        source: wgpu::ShaderSource::Wgsl(SOURCE.into()),
    });

    if let Some(err) = pollster::block_on(scope.pop()) {
        return Err(err).context("solid shader failed validation");
    }

    log::debug!("solid shader module compiled");
    Ok(module)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_declares_both_entry_points() {
        assert!(SOURCE.contains(&format!("fn {VERTEX_ENTRY}(")));
        assert!(SOURCE.contains(&format!("fn {FRAGMENT_ENTRY}(")));
    }

    #[test]
    fn source_binds_position_and_color_slots() {
        assert!(SOURCE.contains(&format!("@location({POSITION_LOCATION}) position: vec2<f32>")));
        assert!(SOURCE.contains(&format!("-> @location({COLOR_TARGET}) vec4<f32>")));
        assert!(SOURCE.contains("@builtin(position) vec4<f32>"));
    }

    #[test]
    fn source_literal_matches_cpu_fragment_stage() {
        let c = fragment_stage();
        let literal = format!("vec4<f32>({:.1}, {:.1}, {:.1}, {:.1})", c.r, c.g, c.b, c.a);
        assert!(SOURCE.contains(&literal), "missing {literal}");
    }
}
