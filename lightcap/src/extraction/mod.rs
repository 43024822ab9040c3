//! Flux extraction over the whole catalog.
//!
//! One pass decodes each frame in catalog order, measures the target and the
//! reference set, and drops the pixels before moving on. Values are collected
//! into local buffers and only returned once every frame succeeded.


use thiserror::Error;

use crate::aperture::{ApertureSpec, ReferenceSet};
use crate::catalog::{FrameCatalog, FrameReadError, FrameReader};
use crate::error::{Error, Result};
use crate::photometry::{Photometer, PhotometryError};
use crate::series::ReferenceSeries;

/// Why a single frame could not be measured.
#[derive(Debug, Error)]
pub enum ExtractionFailure {
    #[error("failed to decode pixels: {0}")]
    Read(#[from] FrameReadError),

    #[error("target photometry failed: {0}")]
    Target(#[source] PhotometryError),

    #[error("reference photometry failed: {0}")]
    References(#[source] PhotometryError),
}

/// Flux of the target and every reference, aligned with catalog order.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxSeries {
    target: Vec<f64>,
    references: ReferenceSeries,
}

impl FluxSeries {
    /// Every reference series must match the target's length, and the
    /// multi-reference shape needs at least two references.
    pub fn new(target: Vec<f64>, references: ReferenceSeries) -> Result<Self> {
        if let ReferenceSeries::Multiple(series) = &references
            && series.len() < 2
        {
            return Err(Error::ReferenceShape {
                count: series.len(),
            });
        }
        if let Some(series) = references.iter().find(|s| s.len() != target.len()) {
            return Err(Error::SeriesLength {
                expected: target.len(),
                actual: series.len(),
            });
        }
        Ok(Self { target, references })
    }

    pub fn target(&self) -> &[f64] {
        &self.target
    }

    pub fn references(&self) -> &ReferenceSeries {
        &self.references
    }

    pub fn frame_count(&self) -> usize {
        self.target.len()
    }
}

/// Measure every frame of `catalog`. The first failing frame aborts the pass.
pub(crate) fn extract_flux<R, P>(
    catalog: &FrameCatalog,
    reader: &R,
    photometer: &P,
    target: &ApertureSpec,
    references: &ReferenceSet,
) -> Result<FluxSeries>
where
    R: FrameReader + ?Sized,
    P: Photometer + ?Sized,
{
    let frame_count = catalog.frame_count();
    let reference_count = references.count();

    tracing::info!(
        "Extracting flux from {} frames ({} reference apertures)",
        frame_count,
        reference_count
    );

    let mut target_flux = Vec::with_capacity(frame_count);
    let mut reference_flux = vec![Vec::with_capacity(frame_count); reference_count];

    for frame in catalog.frames() {
        let fail = |source: ExtractionFailure| Error::Extraction {
            index: frame.index,
            path: frame.path.clone(),
            source,
        };

        let image = reader
            .read_image(&frame.path)
            .map_err(|e| fail(ExtractionFailure::Read(e)))?;

        let target_values = photometer
            .measure(&image, std::slice::from_ref(target))
            .and_then(|values| expect_count(values, 1))
            .map_err(|e| fail(ExtractionFailure::Target(e)))?;

        let reference_values = photometer
            .measure(&image, references.specs())
            .and_then(|values| expect_count(values, reference_count))
            .map_err(|e| fail(ExtractionFailure::References(e)))?;

        drop(image);

        tracing::debug!(
            index = frame.index,
            target = target_values[0],
            references = ?reference_values,
            "Measured frame"
        );

        target_flux.push(target_values[0]);
        for (series, value) in reference_flux.iter_mut().zip(reference_values) {
            series.push(value);
        }
    }

    tracing::info!("Flux extraction complete for {} frames", frame_count);

    FluxSeries::new(
        target_flux,
        ReferenceSeries::from_per_reference(reference_flux),
    )
}

fn expect_count(values: Vec<f64>, expected: usize) -> Result<Vec<f64>, PhotometryError> {
    if values.len() == expected {
        Ok(values)
    } else {
        Err(PhotometryError::CountMismatch {
            expected,
            actual: values.len(),
        })
    }
}
