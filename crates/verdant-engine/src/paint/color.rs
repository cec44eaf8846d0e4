/// Linear straight-alpha RGBA color.
///
/// Used for clear colors; the shader pair itself never reads one.
#[derive(Debug, Copy, Clone, Default, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    pub const GREEN: Self = Self::rgba(0.0, 1.0, 0.0, 1.0);

    #[inline]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    #[inline]
    pub fn to_wgpu(self) -> wgpu::Color {
        wgpu::Color {
            r: self.r as f64,
            g: self.g as f64,
            b: self.b as f64,
            a: self.a as f64,
        }
    }
}

impl From<crate::shader::FragmentOutput> for Color {
    #[inline]
    fn from(c: crate::shader::FragmentOutput) -> Self {
        Self::rgba(c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn green_matches_fragment_output() {
        assert_eq!(Color::from(crate::shader::fragment_stage()), Color::GREEN);
    }

    #[test]
    fn to_wgpu_widens_channels() {
        let w = Color::BLACK.to_wgpu();
        assert_eq!((w.r, w.g, w.b, w.a), (0.0, 0.0, 0.0, 1.0));
    }
}
