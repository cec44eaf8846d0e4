use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowId;

use verdant_dsp::SharedSpectrum;
use verdant_engine::core::{App, AppControl, FrameCtx};
use verdant_engine::paint::Color;
use verdant_engine::render::SolidRenderer;
use verdant_engine::shader::VertexInput;

use crate::bars::{self, BarSmoother};

/// Draws the shared spectrum as mirrored green bars on black.
pub struct SpectrumApp {
    spectrum: SharedSpectrum,
    smoother: BarSmoother,
    renderer: SolidRenderer,
    bar_count: usize,

    raw: Vec<f32>,
    vertices: Vec<VertexInput>,
}

impl SpectrumApp {
    pub fn new(spectrum: SharedSpectrum, bar_count: usize) -> Self {
        Self {
            smoother: BarSmoother::new(spectrum.bands()),
            spectrum,
            renderer: SolidRenderer::new(),
            bar_count,
            raw: Vec::new(),
            vertices: Vec::with_capacity(bars::vertex_count(bar_count)),
        }
    }
}

impl App for SpectrumApp {
    fn on_window_event(&mut self, _window_id: WindowId, event: &WindowEvent) -> AppControl {
        match event {
            WindowEvent::KeyboardInput { event, .. }
                if event.state == ElementState::Pressed
                    && event.logical_key == Key::Named(NamedKey::Escape) =>
            {
                AppControl::Exit
            }
            _ => AppControl::Continue,
        }
    }

    fn on_frame(&mut self, ctx: &mut FrameCtx<'_, '_>) -> AppControl {
        self.spectrum.read_into(&mut self.raw);
        let levels = self.smoother.update(&self.raw);
        bars::build_bar_vertices(levels, self.bar_count, &mut self.vertices);

        let renderer = &mut self.renderer;
        let vertices = &self.vertices;
        ctx.render(Color::BLACK, |rctx, target| renderer.render(rctx, target, vertices))
    }

    fn on_exit(&mut self) {
        log::info!("visualizer closed");
    }
}
