use anyhow::{Context, Result};

use crate::render::{RenderCtx, RenderTarget};
use crate::shader::{self, VertexInput};

/// Smallest vertex buffer allocation, in vertices.
const MIN_VERTEX_CAPACITY: usize = 64;

/// Draws triangle lists with the solid shader pair.
///
/// Geometry is clip-space already; the vertex stage does not transform it.
/// Every covered pixel comes out opaque green.
#[derive(Default)]
pub struct SolidRenderer {
    pipeline_format: Option<wgpu::TextureFormat>,
    pipeline: Option<wgpu::RenderPipeline>,

    vbo: Option<wgpu::Buffer>,
    vbo_capacity: usize,
}

impl SolidRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Vertex capacity of the current buffer (0 before the first draw).
    pub fn vertex_capacity(&self) -> usize {
        self.vbo_capacity
    }

    /// Renders `vertices` as a triangle list into `target`.
    ///
    /// Loads the existing target contents; clear first with
    /// [`clear`](super::clear) if needed. An empty slice records nothing.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        vertices: &[VertexInput],
    ) -> Result<()> {
        if vertices.is_empty() {
            return Ok(());
        }

        let count = u32::try_from(vertices.len()).context("too many vertices for one draw")?;

        self.ensure_pipeline(ctx)?;
        self.ensure_vertex_capacity(ctx, vertices.len());

        let Some(vbo) = self.vbo.as_ref() else { return Ok(()) };
        ctx.queue.write_buffer(vbo, 0, bytemuck::cast_slice(vertices));

        let Some(pipeline) = self.pipeline.as_ref() else { return Ok(()) };

        let mut rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("verdant solid pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: target.color_view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
                depth_slice: None,
            })],
            depth_stencil_attachment: None,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        });

        rpass.set_pipeline(pipeline);
        rpass.set_vertex_buffer(0, vbo.slice(..));
        rpass.draw(0..count, 0..1);

        Ok(())
    }

    fn ensure_pipeline(&mut self, ctx: &RenderCtx<'_>) -> Result<()> {
        if self.pipeline_format == Some(ctx.target_format) && self.pipeline.is_some() {
            return Ok(());
        }

        let module = shader::create_module(ctx.device)?;

        let pipeline_layout = ctx
            .device
            .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                label: Some("verdant solid pipeline layout"),
                bind_group_layouts: &[],
                immediate_size: 0,
            });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("verdant solid pipeline"),
            layout: Some(&pipeline_layout),

            vertex: wgpu::VertexState {
                module: &module,
                entry_point: Some(shader::VERTEX_ENTRY),
                compilation_options: Default::default(),
                buffers: &[VertexInput::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &module,
                entry_point: Some(shader::FRAGMENT_ENTRY),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.target_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        log::debug!("solid pipeline built for {:?}", ctx.target_format);

        self.pipeline_format = Some(ctx.target_format);
        self.pipeline = Some(pipeline);
        Ok(())
    }

    fn ensure_vertex_capacity(&mut self, ctx: &RenderCtx<'_>, required: usize) {
        if required <= self.vbo_capacity && self.vbo.is_some() {
            return;
        }

        let new_cap = grown_capacity(required);
        let new_size = (new_cap * std::mem::size_of::<VertexInput>()) as u64;

        self.vbo = Some(ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("verdant solid vbo"),
            size: new_size,
            usage: wgpu::BufferUsages::VERTEX | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
        self.vbo_capacity = new_cap;
    }
}

fn grown_capacity(required: usize) -> usize {
    required.next_power_of_two().max(MIN_VERTEX_CAPACITY)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn capacity_has_a_floor() {
        assert_eq!(grown_capacity(1), 64);
        assert_eq!(grown_capacity(64), 64);
    }

    #[test]
    fn capacity_rounds_to_power_of_two() {
        assert_eq!(grown_capacity(65), 128);
        assert_eq!(grown_capacity(64 * 18 + 6), 2048);
    }
}
