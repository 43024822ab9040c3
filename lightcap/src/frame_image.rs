/// Decoded single-channel pixel data of one frame.
///
/// Pixel values are kept in detector units (no normalization), row-major,
/// with `(0, 0)` at the first stored pixel.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameImage {
    width: usize,
    height: usize,
    pixels: Vec<f32>,
}

impl FrameImage {
    pub fn new(width: usize, height: usize, pixels: Vec<f32>) -> Self {
        assert!(width > 0, "Width must be positive");
        assert!(height > 0, "Height must be positive");
        assert_eq!(
            pixels.len(),
            width * height,
            "Pixel count mismatch for {}x{} image",
            width,
            height
        );
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Image filled with a single value.
    pub fn filled(width: usize, height: usize, value: f32) -> Self {
        Self::new(width, height, vec![value; width * height])
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[f32] {
        &self.pixels
    }

    /// Pixel value at (x, y). Panics if out of bounds.
    #[inline]
    pub fn pixel(&self, x: usize, y: usize) -> f32 {
        debug_assert!(x < self.width, "x coordinate out of bounds");
        debug_assert!(y < self.height, "y coordinate out of bounds");
        self.pixels[y * self.width + x]
    }

    /// Mutable pixel value at (x, y). Panics if out of bounds.
    #[inline]
    pub fn pixel_mut(&mut self, x: usize, y: usize) -> &mut f32 {
        debug_assert!(x < self.width, "x coordinate out of bounds");
        debug_assert!(y < self.height, "y coordinate out of bounds");
        &mut self.pixels[y * self.width + x]
    }
}
