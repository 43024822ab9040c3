use std::path::Path;

use fitsio::FitsFile;
use fitsio::hdu::{FitsHdu, HduInfo};

use super::{DEFAULT_TIME_KEY, FrameHeader, FrameMetadata, FrameReadError, FrameReader};
use crate::frame_image::FrameImage;

/// [`FrameReader`] backed by cfitsio. Reads the primary HDU only.
#[derive(Debug, Clone)]
pub struct FitsReader {
    time_key: String,
}

impl Default for FitsReader {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_KEY)
    }
}

impl FitsReader {
    /// Reader taking the Julian Date from `time_key`.
    pub fn new(time_key: impl Into<String>) -> Self {
        Self {
            time_key: time_key.into(),
        }
    }
}

impl FrameReader for FitsReader {
    fn time_key(&self) -> &str {
        &self.time_key
    }

    fn read_header(&self, path: &Path) -> Result<FrameHeader, FrameReadError> {
        let mut fptr = FitsFile::open(path)?;
        let hdu = fptr.primary_hdu()?;
        let (width, height) = image_size(&hdu)?;

        let metadata = FrameMetadata {
            object: read_key_optional(&hdu, &mut fptr, "OBJECT"),
            date_obs: read_key_optional(&hdu, &mut fptr, "DATE-OBS"),
            exposure_time: read_key_optional(&hdu, &mut fptr, "EXPTIME"),
            filter: read_key_optional(&hdu, &mut fptr, "FILTER"),
            airmass: read_key_optional(&hdu, &mut fptr, "AIRMASS"),
        };

        Ok(FrameHeader {
            julian_date: read_julian_date(&hdu, &mut fptr, &self.time_key)?,
            width,
            height,
            metadata,
        })
    }

    fn read_image(&self, path: &Path) -> Result<FrameImage, FrameReadError> {
        let mut fptr = FitsFile::open(path)?;
        let hdu = fptr.primary_hdu()?;
        let (width, height) = image_size(&hdu)?;

        let pixels: Vec<f32> = hdu.read_image(&mut fptr)?;
        if pixels.len() != width * height {
            return Err(FrameReadError::PixelCountMismatch {
                expected: width * height,
                actual: pixels.len(),
            });
        }

        Ok(FrameImage::new(width, height, pixels))
    }
}

/// Width and height of a 2-D primary image.
///
/// cfitsio reports shape in reverse NAXIS order: `[NAXIS2, NAXIS1]`. A leading
/// axis of length 1 (`[1, h, w]`) is accepted as a single plane.
fn image_size(hdu: &FitsHdu) -> Result<(usize, usize), FrameReadError> {
    let shape = match &hdu.info {
        HduInfo::ImageInfo { shape, .. } => shape,
        HduInfo::TableInfo { .. } | HduInfo::AnyInfo => return Err(FrameReadError::NotAnImage),
    };

    match shape.as_slice() {
        &[height, width] if width > 0 && height > 0 => Ok((width, height)),
        &[1, height, width] if width > 0 && height > 0 => Ok((width, height)),
        _ => Err(FrameReadError::UnsupportedShape {
            shape: shape.clone(),
        }),
    }
}

/// cfitsio status for a keyword that is not in the header.
const KEY_NO_EXIST: i32 = 202;
/// cfitsio status for a keyword value that cannot be converted to a number.
const BAD_C2D: i32 = 409;

/// Julian Date as a number, falling back to a numeric string value.
///
/// Only a missing keyword is reported as `None`; other cfitsio failures are
/// read errors.
fn read_julian_date(
    hdu: &FitsHdu,
    fptr: &mut FitsFile,
    key: &str,
) -> Result<Option<f64>, FrameReadError> {
    match hdu.read_key::<f64>(fptr, key) {
        Ok(jd) => Ok(Some(jd)),
        Err(err) if fits_status(&err) == Some(BAD_C2D) => {
            let text = optional_key(hdu.read_key::<String>(fptr, key))?;
            Ok(text.and_then(|s| s.trim().parse().ok()))
        }
        Err(err) => optional_key(Err(err)),
    }
}

/// `Ok(None)` for a missing keyword, the value or the error otherwise.
pub(super) fn optional_key<T>(
    result: Result<T, fitsio::errors::Error>,
) -> Result<Option<T>, FrameReadError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if fits_status(&err) == Some(KEY_NO_EXIST) => Ok(None),
        Err(err) => Err(err.into()),
    }
}

fn fits_status(err: &fitsio::errors::Error) -> Option<i32> {
    match err {
        fitsio::errors::Error::Fits(fits_err) => Some(fits_err.status),
        _ => None,
    }
}

/// Informational keyword. Unreadable values are dropped.
fn read_key_optional<T: fitsio::headers::ReadsKey>(
    hdu: &FitsHdu,
    fptr: &mut FitsFile,
    key: &str,
) -> Option<T> {
    match hdu.read_key(fptr, key) {
        Ok(value) => Some(value),
        Err(err) => {
            if fits_status(&err) != Some(KEY_NO_EXIST) {
                tracing::debug!("Ignoring unreadable header key {}: {}", key, err);
            }
            None
        }
    }
}
