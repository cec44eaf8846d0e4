use crate::shader::{fragment_stage, vertex_stage, ClipPosition, FragmentOutput, VertexInput};

use super::Framebuffer;

/// Programmable vertex stage.
pub trait VertexShader {
    fn shade_vertex(&self, input: &VertexInput) -> ClipPosition;
}

/// Programmable fragment stage.
pub trait FragmentShader {
    fn shade_fragment(&self, fragment: &Fragment) -> FragmentOutput;
}

/// One covered pixel handed to the fragment stage.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Fragment {
    pub x: u32,
    pub y: u32,
    /// Window-space `(x, y, z, 1/w)`; `x`/`y` are the pixel center.
    pub frag_coord: [f32; 4],
}

/// The CPU form of the solid shader pair.
#[derive(Debug, Copy, Clone, Default)]
pub struct SolidShader;

impl VertexShader for SolidShader {
    #[inline]
    fn shade_vertex(&self, input: &VertexInput) -> ClipPosition {
        vertex_stage(*input)
    }
}

impl FragmentShader for SolidShader {
    #[inline]
    fn shade_fragment(&self, _fragment: &Fragment) -> FragmentOutput {
        fragment_stage()
    }
}

/// Counters for a single [`Rasterizer::draw`] call.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct DrawStats {
    pub vertices_shaded: usize,
    /// Triangles dropped before coverage: non-finite or `w <= 0` vertices, zero area.
    pub primitives_discarded: usize,
    pub primitives_rasterized: usize,
    pub fragments_shaded: usize,
}

/// Non-indexed triangle-list rasterizer.
///
/// State: no culling, depth clip on, no depth test, no blending.
#[derive(Debug, Default)]
pub struct Rasterizer {
    clip: Vec<ClipPosition>,
}

/// Window-space vertex. Kept in `f64` so finite clip positions far outside
/// the viewport stay finite through the viewport and edge products.
#[derive(Debug, Copy, Clone)]
struct ScreenVertex {
    x: f64,
    y: f64,
    z: f64,
    inv_w: f64,
}

impl Rasterizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Draws `vertices` as a triangle list into `fb`.
    ///
    /// Every vertex is shaded. Trailing vertices that do not complete a
    /// triangle are shaded and then dropped by primitive assembly.
    pub fn draw<S>(
        &mut self,
        fb: &mut Framebuffer,
        vertices: &[VertexInput],
        shader: &S,
    ) -> DrawStats
    where
        S: VertexShader + FragmentShader + ?Sized,
    {
        let mut stats = DrawStats::default();

        self.clip.clear();
        self.clip.extend(vertices.iter().map(|v| shader.shade_vertex(v)));
        stats.vertices_shaded = self.clip.len();

        if self.clip.len() % 3 != 0 {
            log::trace!(
                "Rasterizer: {} trailing vertices ignored by triangle-list assembly",
                self.clip.len() % 3
            );
        }

        let (w, h) = (f64::from(fb.width()), f64::from(fb.height()));

        for tri in self.clip.chunks_exact(3) {
            let screen = [
                to_screen(tri[0], w, h),
                to_screen(tri[1], w, h),
                to_screen(tri[2], w, h),
            ];
            let [Some(a), Some(b), Some(c)] = screen else {
                stats.primitives_discarded += 1;
                continue;
            };

            match rasterize_triangle(fb, shader, a, b, c) {
                Some(n) => {
                    stats.primitives_rasterized += 1;
                    stats.fragments_shaded += n;
                }
                None => stats.primitives_discarded += 1,
            }
        }

        stats
    }
}

/// Perspective divide + viewport transform. NDC +Y is up, pixel +Y is down.
fn to_screen(p: ClipPosition, width: f64, height: f64) -> Option<ScreenVertex> {
    if !p.is_finite() || p.w <= 0.0 {
        return None;
    }

    let inv_w = 1.0 / f64::from(p.w);
    let nx = f64::from(p.x) * inv_w;
    let ny = f64::from(p.y) * inv_w;
    let nz = f64::from(p.z) * inv_w;

    Some(ScreenVertex {
        x: (nx * 0.5 + 0.5) * width,
        y: (0.5 - ny * 0.5) * height,
        z: nz,
        inv_w,
    })
}

/// Signed edge function; `edge(a, b, c)` is twice the signed triangle area.
#[inline]
fn edge(a: ScreenVertex, b: ScreenVertex, px: f64, py: f64) -> f64 {
    (px - a.x) * (b.y - a.y) - (py - a.y) * (b.x - a.x)
}

/// Top-left rule for an edge `from → to` of a positively oriented triangle.
#[inline]
fn is_top_left(from: ScreenVertex, to: ScreenVertex) -> bool {
    let (dx, dy) = (to.x - from.x, to.y - from.y);
    (dy == 0.0 && dx < 0.0) || dy > 0.0
}

/// Clamps `[min, max]` to whole pixels inside `[0, limit)`; half-open result.
fn pixel_span(min: f64, max: f64, limit: u32) -> (u32, u32) {
    let limit = f64::from(limit);
    let lo = min.floor().clamp(0.0, limit) as u32;
    let hi = max.ceil().clamp(0.0, limit) as u32;
    (lo, hi)
}

/// Returns the number of fragments shaded, or `None` for a zero-area triangle.
fn rasterize_triangle<S>(
    fb: &mut Framebuffer,
    shader: &S,
    a: ScreenVertex,
    mut b: ScreenVertex,
    mut c: ScreenVertex,
) -> Option<usize>
where
    S: FragmentShader + ?Sized,
{
    let mut area = edge(a, b, c.x, c.y);
    if area == 0.0 {
        return None;
    }
    // No culling: flip clockwise input so one inside test serves both windings.
    if area < 0.0 {
        std::mem::swap(&mut b, &mut c);
        area = -area;
    }

    let (x0, x1) = pixel_span(a.x.min(b.x).min(c.x), a.x.max(b.x).max(c.x), fb.width());
    let (y0, y1) = pixel_span(a.y.min(b.y).min(c.y), a.y.max(b.y).max(c.y), fb.height());

    let top_left = [is_top_left(b, c), is_top_left(c, a), is_top_left(a, b)];
    let mut shaded = 0;

    for y in y0..y1 {
        for x in x0..x1 {
            let px = f64::from(x) + 0.5;
            let py = f64::from(y) + 0.5;

            let w = [edge(b, c, px, py), edge(c, a, px, py), edge(a, b, px, py)];
            let covered = w
                .iter()
                .zip(top_left)
                .all(|(&wi, tl)| wi > 0.0 || (wi == 0.0 && tl));
            if !covered {
                continue;
            }

            let [b0, b1, b2] = w.map(|wi| wi / area);

            let z = a.z * b0 + b.z * b1 + c.z * b2;
            if !(0.0..=1.0).contains(&z) {
                continue;
            }
            let inv_w = a.inv_w * b0 + b.inv_w * b1 + c.inv_w * b2;

            let fragment = Fragment {
                x,
                y,
                frag_coord: [px as f32, py as f32, z as f32, inv_w as f32],
            };
            let color = shader.shade_fragment(&fragment);
            fb.put(x, y, color.to_array());
            shaded += 1;
        }
    }

    Some(shaded)
}
