/// One acquired swapchain image plus the encoder recording into it.
///
/// Finalize promptly with [`Gpu::submit`](super::Gpu::submit): while this is
/// alive the next surface texture cannot be acquired. Dropping it without
/// submitting discards the image.
pub struct GpuFrame {
    pub surface_texture: wgpu::SurfaceTexture,
    pub view: wgpu::TextureView,
    pub encoder: wgpu::CommandEncoder,
}
