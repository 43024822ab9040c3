//! Lightcap - Differential aperture photometry for FITS frame sequences.
//!
//! This library turns a directory (or wildcard pattern) of calibrated,
//! plate-solved exposures into a differential-magnitude light curve:
//! - Frame discovery, ordering, and Julian Date extraction
//! - Validated target and reference aperture configuration
//! - All-or-nothing flux extraction through a pluggable photometer
//! - Differential magnitudes against one reference or the mean of several
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use lightcap::Lightcurve;
//!
//! let mut curve = Lightcurve::open("/data/2020-07-31/lights/a-wcs-reduced-*.fit")?;
//! curve.set_target(&[1108.81, 1015.97], 8.0, Some("Lx Ser"))?;
//! curve.set_reference(&vec![[1341.0, 938.0], [1230.0, 905.0]].into(), 8.0, &["a", "b"])?;
//! curve.extract()?;
//! curve.compute("average")?;
//!
//! for row in curve.rows().unwrap_or_default() {
//!     println!("{} {}", row.julian_date, row.target);
//! }
//! ```

mod aperture;
mod catalog;
pub mod config;
mod error;
pub mod export;
mod extraction;
mod frame_image;
mod lightcurve;
mod magnitude;
mod photometry;
mod series;

#[cfg(test)]
pub(crate) mod testing;

// ============================================================================
// Frames
// ============================================================================

pub use catalog::{
    DEFAULT_TIME_KEY, FitsReader, Frame, FrameCatalog, FrameHeader, FrameMetadata,
    FrameReadError, FrameReader,
};
pub use frame_image::FrameImage;

// ============================================================================
// Apertures and photometry
// ============================================================================

pub use aperture::{ApertureConfig, ApertureSpec, ReferencePositions, ReferenceSet, Role};
pub use photometry::{ApertureSum, DEFAULT_SUBPIXELS, Photometer, PhotometryError};

// ============================================================================
// Light curve
// ============================================================================

pub use error::{ConfigurationError, Error, Result};
pub use extraction::{ExtractionFailure, FluxSeries};
pub use lightcurve::{Lightcurve, LightcurveRow, State};
pub use magnitude::{MagnitudeSeries, Method, compute_magnitudes, differential_magnitude};
pub use series::ReferenceSeries;
