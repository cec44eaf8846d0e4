use anyhow::{Context, Result};

use super::GpuInit;

/// Device and queue with no surface, for offscreen rendering and readback.
///
/// Surface-related fields of [`GpuInit`] (`prefer_srgb`, `present_mode`,
/// `alpha_mode`, frame latency) are ignored.
pub struct HeadlessGpu {
    _instance: wgpu::Instance,
    device: wgpu::Device,
    queue: wgpu::Queue,
}

impl HeadlessGpu {
    /// Creates a headless context; fails if no adapter is available.
    pub async fn new(init: &GpuInit) -> Result<Self> {
        Self::try_new(init)
            .await?
            .context("failed to find a suitable GPU adapter")
    }

    /// Like [`new`](Self::new) but returns `Ok(None)` when the machine has no adapter.
    ///
    /// Device creation failures on an existing adapter are still errors.
    pub async fn try_new(init: &GpuInit) -> Result<Option<Self>> {
        let instance = GpuInit::create_instance();

        let adapter = match instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: init.power_preference,
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
        {
            Ok(adapter) => adapter,
            Err(err) => {
                log::warn!("no GPU adapter available: {err}");
                return Ok(None);
            }
        };

        let (device, queue) = init.open_device(&adapter, "verdant headless device").await?;

        Ok(Some(Self {
            _instance: instance,
            device,
            queue,
        }))
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }
}
