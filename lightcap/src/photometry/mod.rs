//! Aperture photometry collaborator.
//!
//! The extraction engine only depends on the [`Photometer`] contract: one summed
//! flux per aperture, in the order the apertures were given. [`ApertureSum`]
//! is the built-in implementation.

#[cfg(test)]
mod tests;

use thiserror::Error;

use crate::aperture::ApertureSpec;
use crate::frame_image::FrameImage;

/// Default sub-pixel sampling factor per axis.
pub const DEFAULT_SUBPIXELS: usize = 5;

#[derive(Debug, Error)]
pub enum PhotometryError {
    #[error(
        "Aperture at ({x:.2}, {y:.2}) with radius {radius} extends outside the {width}x{height} image"
    )]
    OutOfBounds {
        x: f64,
        y: f64,
        radius: f64,
        width: usize,
        height: usize,
    },

    #[error("Photometer returned {actual} flux values for {expected} apertures")]
    CountMismatch { expected: usize, actual: usize },
}

/// Sums pixel flux inside circular apertures.
pub trait Photometer {
    /// One flux value per aperture, in the same order as `apertures`.
    fn measure(
        &self,
        image: &FrameImage,
        apertures: &[ApertureSpec],
    ) -> Result<Vec<f64>, PhotometryError>;
}

/// Circular aperture sum with sub-pixel sampling.
///
/// Pixel `(x, y)` covers `[x - 0.5, x + 0.5) x [y - 0.5, y + 0.5)`. Each pixel is
/// split into `subpixels x subpixels` samples; a pixel's weight is the fraction
/// of samples whose centers fall inside the aperture. `subpixels = 1` is the
/// plain "center" method. No background is subtracted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApertureSum {
    subpixels: usize,
}

impl Default for ApertureSum {
    fn default() -> Self {
        Self::new(DEFAULT_SUBPIXELS)
    }
}

impl ApertureSum {
    pub fn new(subpixels: usize) -> Self {
        assert!(subpixels > 0, "subpixels must be positive, got {}", subpixels);
        Self { subpixels }
    }

    pub fn subpixels(&self) -> usize {
        self.subpixels
    }

    /// Summed flux of one aperture. The aperture must lie fully inside the image.
    pub fn sum(&self, image: &FrameImage, aperture: &ApertureSpec) -> Result<f64, PhotometryError> {
        let (cx, cy, r) = (aperture.center.x, aperture.center.y, aperture.radius);
        let (width, height) = (image.width(), image.height());

        let inside = cx - r >= -0.5
            && cy - r >= -0.5
            && cx + r <= width as f64 - 0.5
            && cy + r <= height as f64 - 0.5;
        if !inside {
            return Err(PhotometryError::OutOfBounds {
                x: cx,
                y: cy,
                radius: r,
                width,
                height,
            });
        }

        // Bounds check above keeps these within the image.
        let x_min = (cx - r + 0.5).floor().max(0.0) as usize;
        let x_max = ((cx + r + 0.5).floor() as usize).min(width - 1);
        let y_min = (cy - r + 0.5).floor().max(0.0) as usize;
        let y_max = ((cy + r + 0.5).floor() as usize).min(height - 1);

        let r_sq = r * r;
        let n = self.subpixels;
        let step = 1.0 / n as f64;
        let sample_area = step * step;

        let mut flux = 0.0f64;
        for y in y_min..=y_max {
            for x in x_min..=x_max {
                let mut covered = 0usize;
                for sy in 0..n {
                    let py = y as f64 - 0.5 + (sy as f64 + 0.5) * step - cy;
                    for sx in 0..n {
                        let px = x as f64 - 0.5 + (sx as f64 + 0.5) * step - cx;
                        if px * px + py * py <= r_sq {
                            covered += 1;
                        }
                    }
                }
                if covered > 0 {
                    flux += image.pixel(x, y) as f64 * covered as f64 * sample_area;
                }
            }
        }

        Ok(flux)
    }
}

impl Photometer for ApertureSum {
    fn measure(
        &self,
        image: &FrameImage,
        apertures: &[ApertureSpec],
    ) -> Result<Vec<f64>, PhotometryError> {
        apertures
            .iter()
            .map(|aperture| self.sum(image, aperture))
            .collect()
    }
}
