use verdant_engine::shader::VertexInput;

/// Smoothing factor for the per-band moving average.
pub const SMOOTHING: f32 = 0.03;

/// Fraction of each bar slot covered by the bar; the rest is the gap.
const BAR_FILL: f32 = 0.8;

/// Half thickness of the horizontal centre line, in clip units.
const LINE_HALF_THICKNESS: f32 = 0.01;

/// Per-band exponential moving average: `y = y·(1 − α) + x·α`.
#[derive(Debug, Clone)]
pub struct BarSmoother {
    alpha: f32,
    levels: Vec<f32>,
}

impl BarSmoother {
    pub fn new(bands: usize) -> Self {
        Self::with_alpha(bands, SMOOTHING)
    }

    pub fn with_alpha(bands: usize, alpha: f32) -> Self {
        Self {
            alpha: alpha.clamp(0.0, 1.0),
            levels: vec![0.0; bands],
        }
    }

    /// Folds `raw` into the running levels.
    ///
    /// Bands beyond either length are left alone; non-finite input counts as 0.
    pub fn update(&mut self, raw: &[f32]) -> &[f32] {
        for (y, &x) in self.levels.iter_mut().zip(raw) {
            let x = if x.is_finite() { x } else { 0.0 };
            *y = *y * (1.0 - self.alpha) + x * self.alpha;
        }
        &self.levels
    }

    pub fn levels(&self) -> &[f32] {
        &self.levels
    }
}

/// Vertices produced for `bars` bars: two quads each plus the centre line.
pub fn vertex_count(bars: usize) -> usize {
    bars * 12 + 6
}

/// Mirrored bar geometry as a clip-space triangle list.
///
/// Bar `i` occupies the left 80% of slot `[−1 + 2i/n, −1 + 2(i+1)/n]` and
/// extends `tanh(3v)/2` above and below `y = 0`. A full-width line of
/// thickness 0.02 follows the bars.
///
/// `out` is cleared first, so one buffer can be refilled every frame.
pub fn build_bar_vertices(levels: &[f32], bar_count: usize, out: &mut Vec<VertexInput>) {
    let shown = levels.len().min(bar_count);
    out.clear();
    out.reserve(vertex_count(shown));

    let slot = 2.0 / bar_count as f32;
    for (i, &v) in levels.iter().take(shown).enumerate() {
        let x0 = -1.0 + slot * i as f32;
        let x1 = x0 + slot * BAR_FILL;

        let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
        let half = (v * 3.0).tanh() * 0.5;

        push_quad(out, x0, 0.0, x1, half);
        push_quad(out, x0, 0.0, x1, -half);
    }

    push_quad(out, -1.0, -LINE_HALF_THICKNESS, 1.0, LINE_HALF_THICKNESS);
}

/// Two triangles spanning the rectangle with corners `(x0, y0)` and `(x1, y1)`.
fn push_quad(out: &mut Vec<VertexInput>, x0: f32, y0: f32, x1: f32, y1: f32) {
    out.extend_from_slice(&[
        VertexInput::new(x0, y0),
        VertexInput::new(x1, y0),
        VertexInput::new(x1, y1),
        VertexInput::new(x0, y0),
        VertexInput::new(x1, y1),
        VertexInput::new(x0, y1),
    ]);
}

#[cfg(test)]
mod tests {
    use super::*;
    use verdant_engine::raster::{Framebuffer, Rasterizer, SolidShader};
    use verdant_engine::shader::FragmentOutput;

    const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    fn build(levels: &[f32], bar_count: usize) -> Vec<VertexInput> {
        let mut out = Vec::new();
        build_bar_vertices(levels, bar_count, &mut out);
        out
    }

    fn is_green(p: Option<[f32; 4]>) -> bool {
        p == Some(FragmentOutput::SOLID_GREEN.to_array())
    }

    // ── smoothing ─────────────────────────────────────────────────────────

    #[test]
    fn smoother_moves_three_percent_per_update() {
        let mut s = BarSmoother::new(2);
        let out = s.update(&[1.0, 0.5]);
        assert!(close(out[0], 0.03));
        assert!(close(out[1], 0.015));

        let out = s.update(&[1.0, 0.5]);
        assert!(close(out[0], 0.03 * 0.97 + 0.03));
    }

    #[test]
    fn smoother_ignores_extra_and_bad_input() {
        let mut s = BarSmoother::with_alpha(2, 1.0);
        s.update(&[0.4, f32::NAN, 0.9]);
        assert_eq!(s.levels().to_vec(), vec![0.4, 0.0]);

        s.update(&[0.2]);
        assert_eq!(s.levels().to_vec(), vec![0.2, 0.0]);
    }

    // ── geometry ──────────────────────────────────────────────────────────

    #[test]
    fn vertex_count_covers_bars_and_line() {
        let v = build(&[0.5; 64], 64);
        assert_eq!(v.len(), vertex_count(64));
        assert_eq!(build(&[0.5; 10], 4).len(), vertex_count(4));
        assert_eq!(build(&[0.5; 3], 8).len(), vertex_count(3));
    }

    #[test]
    fn first_bar_layout() {
        let v = build(&[1.0], 64);
        let half = 3.0f32.tanh() * 0.5;

        assert_eq!(v[0].position, [-1.0, 0.0]);
        assert!(close(v[1].position[0], -1.0 + 2.0 / 64.0 * 0.8));
        assert!(close(v[2].position[1], half));
        // mirrored quad
        assert!(close(v[8].position[1], -half));
    }

    #[test]
    fn levels_are_clamped_before_shaping() {
        let over = build(&[7.0], 1);
        let full = build(&[1.0], 1);
        assert_eq!(over[2].position, full[2].position);

        let nan = build(&[f32::NAN], 1);
        assert!(nan.iter().all(|v| v.position.iter().all(|c| c.is_finite())));
    }

    #[test]
    fn centre_line_spans_the_width_once() {
        let v = build(&[], 64);
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [-1.0, -0.01]);
        assert_eq!(v[2].position, [1.0, 0.01]);
    }

    #[test]
    fn refill_replaces_previous_frame_in_place() {
        let mut out = Vec::new();
        build_bar_vertices(&[1.0; 8], 8, &mut out);
        let capacity = out.capacity();
        let ptr = out.as_ptr();

        build_bar_vertices(&[0.0; 2], 8, &mut out);
        assert_eq!(out.len(), vertex_count(2));
        assert_eq!(out.capacity(), capacity);
        assert_eq!(out.as_ptr(), ptr);
        assert_eq!(out, build(&[0.0; 2], 8));
    }

    #[test]
    fn zero_bar_count_draws_only_the_line() {
        assert_eq!(build(&[1.0, 1.0], 0).len(), 6);
    }

    #[test]
    fn bars_rasterize_mirrored_around_the_centre() {
        // Tall enough that the 0.02-thick line covers pixel centres.
        let mut fb = Framebuffer::new(64, 200, BLACK);
        let levels = [1.0, 0.0];
        Rasterizer::new().draw(&mut fb, &build(&levels, 2), &SolidShader);

        // Full bar: columns 0..25, rows 51..149.
        assert!(is_green(fb.pixel(10, 60)));
        assert!(is_green(fb.pixel(10, 140)));
        assert_eq!(fb.pixel(10, 20), Some(BLACK));
        // Gap between bars.
        assert_eq!(fb.pixel(28, 60), Some(BLACK));
        // Silent bar: only the centre line.
        assert_eq!(fb.pixel(45, 60), Some(BLACK));
        assert_eq!(fb.pixel(45, 140), Some(BLACK));
        assert!(is_green(fb.pixel(45, 99)));
        assert!(is_green(fb.pixel(45, 100)));
    }
}
