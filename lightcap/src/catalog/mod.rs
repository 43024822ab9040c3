//! Frame discovery, ordering, and per-frame metadata.
//!
//! A [`FrameCatalog`] is built once from a directory or wildcard pattern and is
//! immutable afterwards. Only metadata stays resident; pixel data is decoded on
//! demand through a [`FrameReader`].

mod fits;


pub use fits::FitsReader;

use std::path::{Path, PathBuf};

use common::file_utils::{DEFAULT_FRAME_PATTERN, files_matching, split_pattern};
use thiserror::Error;

use crate::error::{Error, Result};
use crate::frame_image::FrameImage;

/// Header key holding the Julian Date of a frame unless configured otherwise.
pub const DEFAULT_TIME_KEY: &str = "JD";

/// Errors reported by a [`FrameReader`] for a single file.
#[derive(Debug, Error)]
pub enum FrameReadError {
    #[error("FITS error: {0}")]
    Fits(#[from] fitsio::errors::Error),

    #[error("Primary HDU is not an image")]
    NotAnImage,

    #[error("Unsupported image shape {shape:?}, expected a 2-D image")]
    UnsupportedShape { shape: Vec<usize> },

    #[error("Read {actual} pixels, expected {expected}")]
    PixelCountMismatch { expected: usize, actual: usize },
}

/// Informational header fields. Never used in computation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameMetadata {
    /// Object name (OBJECT keyword)
    pub object: Option<String>,
    /// Observation date (DATE-OBS keyword)
    pub date_obs: Option<String>,
    /// Exposure time in seconds (EXPTIME keyword)
    pub exposure_time: Option<f64>,
    /// Filter name (FILTER keyword)
    pub filter: Option<String>,
    /// Airmass at exposure (AIRMASS keyword)
    pub airmass: Option<f64>,
}

/// What a [`FrameReader`] reports about a file without decoding its pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameHeader {
    /// Julian Date, if the time key is present.
    pub julian_date: Option<f64>,
    pub width: usize,
    pub height: usize,
    pub metadata: FrameMetadata,
}

/// Image-format collaborator: header and pixel access for one file.
pub trait FrameReader {
    /// Header key the reader takes the Julian Date from.
    fn time_key(&self) -> &str;

    fn read_header(&self, path: &Path) -> Result<FrameHeader, FrameReadError>;

    fn read_image(&self, path: &Path) -> Result<FrameImage, FrameReadError>;
}

/// One exposure in the catalog.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// Position in catalog order.
    pub index: usize,
    pub path: PathBuf,
    pub julian_date: f64,
    pub width: usize,
    pub height: usize,
    pub metadata: FrameMetadata,
}

/// Ordered, immutable list of frames.
#[derive(Debug, Clone)]
pub struct FrameCatalog {
    dir: PathBuf,
    pattern: String,
    frames: Vec<Frame>,
}

impl FrameCatalog {
    /// Resolve a directory or wildcard pattern to frame paths.
    ///
    /// A path without `*`, `?` or `[...]` in its last component is treated as
    /// a directory and scanned for `*.fit`. Directory components are matched
    /// literally. Paths are returned in plain string
    /// order, so `f1`, `f10`, `f2` stay in that order.
    pub fn discover(input: &Path) -> Result<Vec<PathBuf>> {
        let (dir, pattern) = split_pattern(input, DEFAULT_FRAME_PATTERN);

        let paths = files_matching(&dir, &pattern).map_err(|source| Error::Discovery {
            dir: dir.clone(),
            source,
        })?;

        if paths.is_empty() {
            return Err(Error::NoFrames { dir, pattern });
        }
        Ok(paths)
    }

    /// Discover frames and read each header. Any failure aborts the whole load.
    pub fn load<R: FrameReader + ?Sized>(input: &Path, reader: &R) -> Result<Self> {
        let (dir, pattern) = split_pattern(input, DEFAULT_FRAME_PATTERN);
        let paths = Self::discover(input)?;

        let mut frames: Vec<Frame> = Vec::with_capacity(paths.len());
        for (index, path) in paths.into_iter().enumerate() {
            let header = match reader.read_header(&path) {
                Ok(header) => header,
                Err(source) => return Err(Error::FrameRead { path, source }),
            };

            let Some(julian_date) = header.julian_date else {
                return Err(Error::MissingMetadata {
                    path,
                    key: reader.time_key().to_string(),
                });
            };

            tracing::debug!(
                index,
                path = %path.display(),
                julian_date,
                "Loaded frame header"
            );

            if let Some(first) = frames.first()
                && (first.width, first.height) != (header.width, header.height)
            {
                tracing::warn!(
                    "Frame '{}' is {}x{}, first frame is {}x{}",
                    path.display(),
                    header.width,
                    header.height,
                    first.width,
                    first.height
                );
            }

            frames.push(Frame {
                index,
                path,
                julian_date,
                width: header.width,
                height: header.height,
                metadata: header.metadata,
            });
        }

        tracing::info!(
            "Catalog of {} frames from '{}' ({})",
            frames.len(),
            dir.display(),
            pattern
        );

        Ok(Self {
            dir,
            pattern,
            frames,
        })
    }

    pub fn frame_count(&self) -> usize {
        self.frames.len()
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    /// Julian Dates in catalog order.
    pub fn time_axis(&self) -> Vec<f64> {
        self.frames.iter().map(|f| f.julian_date).collect()
    }

    /// Directory the frames were discovered in.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// File-name pattern the frames were matched with.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}
