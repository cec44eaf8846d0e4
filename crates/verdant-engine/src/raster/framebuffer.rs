/// CPU color target, row-major, top-left origin.
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<[f32; 4]>,
}

impl Framebuffer {
    /// Creates a `width × height` target filled with `clear`.
    pub fn new(width: u32, height: u32, clear: [f32; 4]) -> Self {
        Self {
            width,
            height,
            pixels: vec![clear; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Overwrites every pixel with `color`.
    pub fn clear(&mut self, color: [f32; 4]) {
        self.pixels.fill(color);
    }

    /// Returns the pixel at `(x, y)`, or `None` outside the target.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[f32; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.pixels.get(self.index(x, y)).copied()
    }

    pub fn pixels(&self) -> &[[f32; 4]] {
        &self.pixels
    }

    /// Number of pixels for which `pred` holds.
    pub fn count(&self, pred: impl Fn(&[f32; 4]) -> bool) -> usize {
        self.pixels.iter().filter(|p| pred(p)).count()
    }

    pub(super) fn put(&mut self, x: u32, y: u32, color: [f32; 4]) {
        let i = self.index(x, y);
        if let Some(p) = self.pixels.get_mut(i) {
            *p = color;
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }
}
