use crate::paint::Color;

use super::RenderTarget;

/// Records a pass that only clears `target` to `color`.
pub fn clear(target: &mut RenderTarget<'_>, color: Color) {
    // Pass is dropped at the end of this scope, releasing the encoder borrow.
    let _rpass = target.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
        label: Some("verdant clear"),
        color_attachments: &[Some(wgpu::RenderPassColorAttachment {
            view: target.color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(color.to_wgpu()),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        })],
        depth_stencil_attachment: None,
        timestamp_writes: None,
        occlusion_query_set: None,
        multiview_mask: None,
    });
}
