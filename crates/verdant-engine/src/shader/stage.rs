use bytemuck::{Pod, Zeroable};

/// Per-vertex input record, bound to `@location(0)`.
///
/// Layout matches the vertex buffer byte for byte (`Float32x2`, stride 8).
#[repr(C)]
#[derive(Debug, Copy, Clone, Default, PartialEq, Pod, Zeroable)]
pub struct VertexInput {
    pub position: [f32; 2],
}

impl VertexInput {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { position: [x, y] }
    }

    pub fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<VertexInput>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

impl From<[f32; 2]> for VertexInput {
    #[inline]
    fn from(position: [f32; 2]) -> Self {
        Self { position }
    }
}

/// Homogeneous clip-space position written to `@builtin(position)`.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct ClipPosition {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl ClipPosition {
    #[inline]
    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Raw bit patterns, for comparisons where `NaN != NaN` would get in the way.
    #[inline]
    pub fn to_bits(self) -> [u32; 4] {
        self.to_array().map(f32::to_bits)
    }

    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }
}

/// RGBA color written to color target 0.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FragmentOutput {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl FragmentOutput {
    /// Opaque green, the only value the fragment stage produces.
    pub const SOLID_GREEN: Self = Self { r: 0.0, g: 1.0, b: 0.0, a: 1.0 };

    #[inline]
    pub fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }

    /// Quantizes to an 8-bit UNORM texel the way a `Rgba8Unorm` target stores it.
    pub fn to_rgba8(self) -> [u8; 4] {
        self.to_array().map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8)
    }
}

/// Vertex stage: `(x, y)` → `(x, y, 0, 1)`.
///
/// No validation; NaN and infinities pass straight through.
#[inline]
pub fn vertex_stage(input: VertexInput) -> ClipPosition {
    let [x, y] = input.position;
    ClipPosition::new(x, y, 0.0, 1.0)
}

/// Fragment stage: always [`FragmentOutput::SOLID_GREEN`].
#[inline]
pub fn fragment_stage() -> FragmentOutput {
    FragmentOutput::SOLID_GREEN
}
