//! Shared fixtures for unit tests: in-memory collaborators and FITS writers.

use std::cell::Cell;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use fitsio::FitsFile;
use fitsio::images::{ImageDescription, ImageType};

use crate::aperture::ApertureSpec;
use crate::catalog::{FrameHeader, FrameReadError, FrameReader};
use crate::frame_image::FrameImage;
use crate::photometry::{Photometer, PhotometryError};

pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}

pub fn assert_close(actual: f64, expected: f64, tolerance: f64) {
    assert!(
        (actual - expected).abs() <= tolerance,
        "got {actual}, expected {expected} (tolerance {tolerance})"
    );
}

/// Create empty files with the given names so discovery can find them.
pub fn touch_frames(dir: &Path, names: &[&str]) -> Vec<PathBuf> {
    names
        .iter()
        .map(|name| {
            let path = dir.join(name);
            fs::write(&path, b"").unwrap();
            path
        })
        .collect()
}

/// In-memory [`FrameReader`] keyed by file name.
///
/// Files without an entry in `julian_dates` report a missing time key.
/// Every frame decodes to a copy of `image` unless listed in `unreadable`.
pub struct FakeReader {
    pub julian_dates: HashMap<String, f64>,
    pub image: FrameImage,
    pub unreadable: Vec<String>,
    pub images_read: Cell<usize>,
}

impl FakeReader {
    pub fn new(julian_dates: &[(&str, f64)]) -> Self {
        Self {
            julian_dates: julian_dates
                .iter()
                .map(|(name, jd)| (name.to_string(), *jd))
                .collect(),
            image: FrameImage::filled(64, 64, 1.0),
            unreadable: Vec::new(),
            images_read: Cell::new(0),
        }
    }

    pub fn with_image(mut self, image: FrameImage) -> Self {
        self.image = image;
        self
    }

    pub fn with_unreadable(mut self, name: &str) -> Self {
        self.unreadable.push(name.to_string());
        self
    }

    fn name(path: &Path) -> String {
        path.file_name().unwrap().to_string_lossy().into_owned()
    }
}

impl FrameReader for FakeReader {
    fn time_key(&self) -> &str {
        "JD"
    }

    fn read_header(&self, path: &Path) -> Result<FrameHeader, FrameReadError> {
        Ok(FrameHeader {
            julian_date: self.julian_dates.get(&Self::name(path)).copied(),
            width: self.image.width(),
            height: self.image.height(),
            metadata: Default::default(),
        })
    }

    fn read_image(&self, path: &Path) -> Result<FrameImage, FrameReadError> {
        if self.unreadable.contains(&Self::name(path)) {
            return Err(FrameReadError::NotAnImage);
        }
        self.images_read.set(self.images_read.get() + 1);
        Ok(self.image.clone())
    }
}

/// [`Photometer`] that replays fixed flux tables, one row per frame.
///
/// Calls alternate target, reference set, target, ... as the extraction
/// engine makes them, so the frame index is derived from the call count.
pub struct ScriptedPhotometer {
    pub target: Vec<f64>,
    pub references: Vec<Vec<f64>>,
    pub fail_at_frame: Option<usize>,
    calls: Cell<usize>,
}

impl ScriptedPhotometer {
    /// `references[r][i]` is the flux of reference `r` in frame `i`.
    pub fn new(target: Vec<f64>, references: Vec<Vec<f64>>) -> Self {
        Self {
            target,
            references,
            fail_at_frame: None,
            calls: Cell::new(0),
        }
    }

    pub fn failing_at(mut self, frame: usize) -> Self {
        self.fail_at_frame = Some(frame);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl Photometer for ScriptedPhotometer {
    fn measure(
        &self,
        image: &FrameImage,
        apertures: &[ApertureSpec],
    ) -> Result<Vec<f64>, PhotometryError> {
        let call = self.calls.get();
        self.calls.set(call + 1);
        let frame = call / 2;

        if self.fail_at_frame == Some(frame) {
            let aperture = &apertures[0];
            return Err(PhotometryError::OutOfBounds {
                x: aperture.center.x,
                y: aperture.center.y,
                radius: aperture.radius,
                width: image.width(),
                height: image.height(),
            });
        }

        if call % 2 == 0 {
            Ok(vec![self.target[frame]])
        } else {
            Ok(self.references.iter().map(|r| r[frame]).collect())
        }
    }
}

/// Draw a flat disk of `value` per pixel (center sampling) on top of `image`.
pub fn draw_disk(image: &mut FrameImage, cx: f64, cy: f64, radius: f64, value: f32) {
    for y in 0..image.height() {
        for x in 0..image.width() {
            let dx = x as f64 - cx;
            let dy = y as f64 - cy;
            if dx * dx + dy * dy <= radius * radius {
                *image.pixel_mut(x, y) += value;
            }
        }
    }
}

/// Write a float FITS image with a `JD` key (omitted when `None`).
pub fn write_fits_frame(path: &Path, image: &FrameImage, julian_date: Option<f64>) {
    let description = ImageDescription {
        data_type: ImageType::Float,
        dimensions: &[image.height(), image.width()],
    };

    let mut fptr = FitsFile::create(path)
        .with_custom_primary(&description)
        .open()
        .unwrap();
    let hdu = fptr.primary_hdu().unwrap();

    if let Some(jd) = julian_date {
        hdu.write_key(&mut fptr, "JD", jd).unwrap();
    }
    hdu.write_key(&mut fptr, "OBJECT", "Lx Ser").unwrap();
    hdu.write_key(&mut fptr, "EXPTIME", 30.0f64).unwrap();
    hdu.write_image(&mut fptr, image.pixels()).unwrap();
}
