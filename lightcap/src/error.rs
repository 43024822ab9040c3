//! Error types for light curve construction and computation.

use std::io;
use std::path::PathBuf;

use common::file_utils::FileListError;
use thiserror::Error;

use crate::aperture::Role;
use crate::catalog::FrameReadError;
use crate::extraction::ExtractionFailure;

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// A required step of the light curve lifecycle has not happened yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    #[error("target aperture is not set, call set_target first")]
    MissingTarget,

    #[error("reference apertures are not set, call set_reference first")]
    MissingReference,

    #[error("flux has not been extracted for the current apertures, call extract first")]
    NotExtracted,

    #[error("magnitudes have not been computed, call compute first")]
    NotComputed,
}

/// Errors that can occur while building or evaluating a light curve.
#[derive(Debug, Error)]
pub enum Error {
    #[error("Invalid aperture position {coordinates:?}: expected exactly two finite coordinates")]
    InvalidPosition { coordinates: Vec<f64> },

    #[error("Invalid aperture radius {radius}: must be finite and positive")]
    InvalidRadius { radius: f64 },

    #[error("Got {actual} reference names for {expected} reference positions")]
    LabelCountMismatch { expected: usize, actual: usize },

    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error(
        "Flux was already extracted for the current apertures; set the target or reference again before re-extracting"
    )]
    ReExtraction,

    #[error("Frame '{path}' has no '{key}' header value")]
    MissingMetadata { path: PathBuf, key: String },

    #[error("Failed to list frames in '{dir}': {source}")]
    Discovery {
        dir: PathBuf,
        #[source]
        source: FileListError,
    },

    #[error("No frames matching '{pattern}' in '{dir}'")]
    NoFrames { dir: PathBuf, pattern: String },

    #[error("Failed to read frame '{path}': {source}")]
    FrameRead {
        path: PathBuf,
        #[source]
        source: FrameReadError,
    },

    #[error("Extraction failed at frame {index} ('{path}'): {source}")]
    Extraction {
        index: usize,
        path: PathBuf,
        #[source]
        source: ExtractionFailure,
    },

    #[error("Multi-reference series needs at least 2 references, got {count}")]
    ReferenceShape { count: usize },

    #[error("Reference series has {actual} values, target has {expected}")]
    SeriesLength { expected: usize, actual: usize },

    #[error("Non-positive flux {value} for {role} at frame {frame}")]
    Domain { frame: usize, role: Role, value: f64 },

    #[error("Unsupported magnitude method '{method}', expected one of: average")]
    UnsupportedMethod { method: String },

    #[error("Sub-pixel sampling factor must be at least 1")]
    InvalidSubpixels,

    #[error("Failed to write light curve: {0}")]
    Output(#[from] csv::Error),

    #[error("Failed to read run configuration '{path}': {source}")]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Failed to parse run configuration '{path}': {source}")]
    ConfigParse {
        path: PathBuf,
        #[source]
        source: serde_yml::Error,
    },
}
