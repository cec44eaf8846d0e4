use std::sync::mpsc;

use anyhow::{Context, Result};

/// Color texture that can be rendered into and read back to the CPU.
///
/// The format is plain `Rgba8Unorm`: written values are stored without any
/// sRGB encoding, so readback shows the literal fragment output.
pub struct OffscreenTarget {
    texture: wgpu::Texture,
    view: wgpu::TextureView,
    width: u32,
    height: u32,
}

impl OffscreenTarget {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8Unorm;

    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let width = width.max(1);
        let height = height.max(1);

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("verdant offscreen target"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT | wgpu::TextureUsages::COPY_SRC,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width,
            height,
        }
    }

    pub fn view(&self) -> &wgpu::TextureView {
        &self.view
    }

    pub fn format(&self) -> wgpu::TextureFormat {
        Self::FORMAT
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Copies the texture to the CPU, blocking until the GPU is done.
    ///
    /// Work already submitted to `queue` completes first.
    pub fn read_pixels(&self, device: &wgpu::Device, queue: &wgpu::Queue) -> Result<Image> {
        let row_bytes = self.width * 4;
        let padded = padded_row_bytes(self.width);

        let staging = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("verdant readback staging"),
            size: padded as u64 * self.height as u64,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("verdant readback encoder"),
        });
        encoder.copy_texture_to_buffer(
            wgpu::TexelCopyTextureInfo {
                texture: &self.texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            wgpu::TexelCopyBufferInfo {
                buffer: &staging,
                layout: wgpu::TexelCopyBufferLayout {
                    offset: 0,
                    bytes_per_row: Some(padded),
                    rows_per_image: Some(self.height),
                },
            },
            wgpu::Extent3d {
                width: self.width,
                height: self.height,
                depth_or_array_layers: 1,
            },
        );
        queue.submit(Some(encoder.finish()));

        let slice = staging.slice(..);
        let (tx, rx) = mpsc::channel();
        slice.map_async(wgpu::MapMode::Read, move |res| {
            let _ = tx.send(res);
        });

        device
            .poll(wgpu::PollType::wait_indefinitely())
            .context("device poll failed during readback")?;
        rx.recv()
            .context("readback map callback never ran")?
            .context("failed to map readback buffer")?;

        let mut data = Vec::with_capacity((row_bytes * self.height) as usize);
        {
            let mapped = slice.get_mapped_range();
            for row in mapped.chunks_exact(padded as usize) {
                data.extend_from_slice(&row[..row_bytes as usize]);
            }
        }
        staging.unmap();

        Ok(Image {
            width: self.width,
            height: self.height,
            data,
        })
    }
}

/// Bytes per row rounded up to the copy alignment.
fn padded_row_bytes(width: u32) -> u32 {
    let align = wgpu::COPY_BYTES_PER_ROW_ALIGNMENT;
    (width * 4).div_ceil(align) * align
}

/// Tightly packed RGBA8 pixels, row 0 at the top.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Image {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Image {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        let p = self.data.get(i..i + 4)?;
        Some([p[0], p[1], p[2], p[3]])
    }

    /// Number of pixels matching `pred`.
    pub fn count(&self, pred: impl Fn([u8; 4]) -> bool) -> usize {
        self.data
            .chunks_exact(4)
            .filter(|p| pred([p[0], p[1], p[2], p[3]]))
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::device::{GpuInit, HeadlessGpu};
    use crate::paint::Color;
    use crate::raster::{Framebuffer, Rasterizer, SolidShader};
    use crate::render::{clear, RenderCtx, RenderTarget, SolidRenderer};
    use crate::shader::{self, FragmentOutput, VertexInput};

    const GREEN: [u8; 4] = [0, 255, 0, 255];
    const BLACK: [u8; 4] = [0, 0, 0, 255];

    fn gpu() -> Option<HeadlessGpu> {
        match pollster::block_on(HeadlessGpu::try_new(&GpuInit::default())) {
            Ok(Some(gpu)) => Some(gpu),
            Ok(None) => {
                eprintln!("skipping: no GPU adapter");
                None
            }
            Err(err) => {
                eprintln!("skipping: {err:#}");
                None
            }
        }
    }

    fn draw(gpu: &HeadlessGpu, size: u32, vertices: &[VertexInput]) -> Result<Image> {
        let target = OffscreenTarget::new(gpu.device(), size, size);
        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), target.format());
        let mut renderer = SolidRenderer::new();

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            clear(&mut rt, Color::BLACK);
            renderer.render(&ctx, &mut rt, vertices)?;
        }
        gpu.queue().submit(Some(encoder.finish()));

        target.read_pixels(gpu.device(), gpu.queue())
    }

    fn tri(a: (f32, f32), b: (f32, f32), c: (f32, f32)) -> [VertexInput; 3] {
        [
            VertexInput::new(a.0, a.1),
            VertexInput::new(b.0, b.1),
            VertexInput::new(c.0, c.1),
        ]
    }

    // ── layout ────────────────────────────────────────────────────────────

    #[test]
    fn rows_pad_to_copy_alignment() {
        assert_eq!(padded_row_bytes(1), 256);
        assert_eq!(padded_row_bytes(64), 256);
        assert_eq!(padded_row_bytes(65), 512);
    }

    #[test]
    fn image_pixel_is_bounds_checked() {
        let img = Image {
            width: 2,
            height: 1,
            data: vec![1, 2, 3, 4, 5, 6, 7, 8],
        };
        assert_eq!(img.pixel(1, 0), Some([5, 6, 7, 8]));
        assert_eq!(img.pixel(2, 0), None);
        assert_eq!(img.pixel(0, 1), None);
        assert_eq!(img.count(|p| p[0] == 1), 1);
    }

    #[test]
    fn image_pixel_index_does_not_wrap_in_u32() {
        // The byte offset of the last pixel exceeds u32::MAX. No data is
        // backed, so every in-bounds lookup must miss rather than wrap.
        let img = Image {
            width: 65_536,
            height: 16_384,
            data: Vec::new(),
        };
        assert_eq!(img.pixel(65_535, 16_383), None);
        assert_eq!(img.pixel(0, 16_384), None);
    }

    #[test]
    fn green_output_packs_to_pure_green_bytes() {
        assert_eq!(FragmentOutput::SOLID_GREEN.to_rgba8(), GREEN);
    }

    // ── gpu ───────────────────────────────────────────────────────────────

    #[test]
    fn shader_compiles_on_device() {
        let Some(gpu) = gpu() else { return };
        assert!(shader::create_module(gpu.device()).is_ok());
    }

    #[test]
    fn unit_triangle_fills_with_green_only() -> Result<()> {
        let Some(gpu) = gpu() else { return Ok(()) };
        let img = draw(&gpu, 64, &tri((-1.0, -1.0), (1.0, -1.0), (0.0, 1.0)))?;

        assert_eq!(img.count(|p| p == GREEN || p == BLACK), 64 * 64);
        // apex is at the top row, base along the bottom
        assert_eq!(img.pixel(32, 48), Some(GREEN));
        assert_eq!(img.pixel(0, 0), Some(BLACK));
        assert_eq!(img.pixel(63, 0), Some(BLACK));
        assert_eq!(img.pixel(2, 4), Some(BLACK));

        // Edge pixels may differ by rounding between rasterizers.
        let mut fb = Framebuffer::new(64, 64, [0.0, 0.0, 0.0, 1.0]);
        let vertices = tri((-1.0, -1.0), (1.0, -1.0), (0.0, 1.0));
        Rasterizer::new().draw(&mut fb, &vertices, &SolidShader);
        let cpu = fb.count(|p| *p == FragmentOutput::SOLID_GREEN.to_array());
        let gpu_green = img.count(|p| p == GREEN);
        assert!(cpu.abs_diff(gpu_green) <= 64, "cpu {cpu} vs gpu {gpu_green}");
        Ok(())
    }

    #[test]
    fn degenerate_triangle_leaves_clear_color() -> Result<()> {
        let Some(gpu) = gpu() else { return Ok(()) };
        let img = draw(&gpu, 32, &tri((0.0, 0.0), (0.0, 0.0), (0.0, 0.0)))?;
        assert_eq!(img.count(|p| p == BLACK), 32 * 32);
        Ok(())
    }

    #[test]
    fn nan_position_does_not_crash() -> Result<()> {
        let Some(gpu) = gpu() else { return Ok(()) };
        let img = draw(&gpu, 32, &tri((f32::NAN, 0.0), (1.0, -1.0), (0.0, 1.0)))?;
        // Coverage is platform-defined; only the two legal colors may appear.
        assert_eq!(img.count(|p| p == GREEN || p == BLACK), 32 * 32);
        Ok(())
    }

    #[test]
    fn vertex_buffer_grows_and_is_reused() -> Result<()> {
        let Some(gpu) = gpu() else { return Ok(()) };
        let target = OffscreenTarget::new(gpu.device(), 16, 16);
        let ctx = RenderCtx::new(gpu.device(), gpu.queue(), target.format());
        let mut renderer = SolidRenderer::new();
        assert_eq!(renderer.vertex_capacity(), 0);

        let small = tri((-1.0, -1.0), (1.0, -1.0), (0.0, 1.0));
        let large: Vec<VertexInput> = small.iter().copied().cycle().take(66).collect();

        let mut encoder = gpu
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: None });
        {
            let mut rt = RenderTarget::new(&mut encoder, target.view());
            clear(&mut rt, Color::BLACK);

            renderer.render(&ctx, &mut rt, &small)?;
            assert_eq!(renderer.vertex_capacity(), 64);

            renderer.render(&ctx, &mut rt, &large)?;
            assert_eq!(renderer.vertex_capacity(), 128);

            renderer.render(&ctx, &mut rt, &small)?;
            assert_eq!(renderer.vertex_capacity(), 128);
        }
        gpu.queue().submit(Some(encoder.finish()));

        let img = target.read_pixels(gpu.device(), gpu.queue())?;
        assert_eq!(img.count(|p| p == GREEN || p == BLACK), 16 * 16);
        assert_eq!(img.pixel(8, 12), Some(GREEN));
        Ok(())
    }

    #[test]
    fn empty_draw_keeps_clear_color() -> Result<()> {
        let Some(gpu) = gpu() else { return Ok(()) };
        let img = draw(&gpu, 8, &[])?;
        assert_eq!(img.count(|p| p == BLACK), 64);
        Ok(())
    }
}
