//! The light curve object: catalog, apertures, and the extraction epoch.
//!
//! ```text
//! Uninitialized --set_target/set_reference--> Configured --extract--> Extracted
//!                                                  ^                     |
//!                                                  |                  compute
//!                                                  |                     v
//!                                                  +--set_*------- Computed
//! ```
//!
//! Any successful `set_target` or `set_reference` discards flux and magnitudes
//! for both roles.


use std::fmt;
use std::path::Path;

use crate::aperture::{ApertureConfig, ReferencePositions};
use crate::catalog::{FitsReader, FrameCatalog, FrameReader};
use crate::error::{ConfigurationError, Error, Result};
use crate::extraction::{FluxSeries, extract_flux};
use crate::magnitude::{MagnitudeSeries, Method, compute_magnitudes};
use crate::photometry::{ApertureSum, Photometer};
use crate::series::ReferenceSeries;

/// Lifecycle stage of a [`Lightcurve`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    /// Catalog loaded, target or reference still missing.
    Uninitialized,
    /// Both apertures set, no flux for them yet.
    Configured,
    /// Flux extracted for the current apertures.
    Extracted,
    /// Magnitudes derived from the current flux.
    Computed,
}

/// Results tied to the current aperture configuration.
#[derive(Debug, Clone)]
enum Epoch {
    Pending,
    Extracted {
        flux: FluxSeries,
        magnitudes: Option<MagnitudeSeries>,
    },
}

/// One exported row: a frame with its time and magnitudes.
#[derive(Debug, Clone, PartialEq)]
pub struct LightcurveRow {
    pub frame: usize,
    pub julian_date: f64,
    pub target: f64,
    /// One magnitude per reference, in reference order.
    pub references: Vec<f64>,
}

/// Differential photometry over one ordered set of frames.
pub struct Lightcurve<R = FitsReader, P = ApertureSum> {
    catalog: FrameCatalog,
    reader: R,
    photometer: P,
    apertures: ApertureConfig,
    epoch: Epoch,
}

impl Lightcurve {
    /// Load every frame matching `input` with the FITS reader and the default
    /// aperture sum.
    pub fn open(input: impl AsRef<Path>) -> Result<Self> {
        Self::with_collaborators(input, FitsReader::default(), ApertureSum::default())
    }
}

impl<R: FrameReader, P: Photometer> Lightcurve<R, P> {
    /// Load the catalog with `reader`; `photometer` measures apertures later.
    pub fn with_collaborators(input: impl AsRef<Path>, reader: R, photometer: P) -> Result<Self> {
        let catalog = FrameCatalog::load(input.as_ref(), &reader)?;
        Ok(Self {
            catalog,
            reader,
            photometer,
            apertures: ApertureConfig::default(),
            epoch: Epoch::Pending,
        })
    }

    /// Measure every frame. Allowed once per aperture configuration.
    pub fn extract(&mut self) -> Result<()> {
        let (target, references) = self.apertures.require()?;
        if !matches!(self.epoch, Epoch::Pending) {
            return Err(Error::ReExtraction);
        }

        let flux = extract_flux(
            &self.catalog,
            &self.reader,
            &self.photometer,
            target,
            references,
        )?;

        self.epoch = Epoch::Extracted {
            flux,
            magnitudes: None,
        };
        Ok(())
    }
}

impl<R, P> Lightcurve<R, P> {
    pub fn set_target(&mut self, position: &[f64], radius: f64, name: Option<&str>) -> Result<()> {
        self.apertures.set_target(position, radius, name)?;
        self.invalidate();
        Ok(())
    }

    /// `positions` is one `[x, y]` or a list of them; `names` is empty or has
    /// one entry per position.
    pub fn set_reference<S: AsRef<str>>(
        &mut self,
        positions: &ReferencePositions,
        radius: f64,
        names: &[S],
    ) -> Result<()> {
        self.apertures.set_reference(positions, radius, names)?;
        self.invalidate();
        Ok(())
    }

    fn invalidate(&mut self) {
        if matches!(self.epoch, Epoch::Extracted { .. }) {
            tracing::info!("Apertures changed, discarding extracted flux");
        }
        self.epoch = Epoch::Pending;
    }

    /// Compute differential magnitudes with the named method.
    pub fn compute(&mut self, method: &str) -> Result<()> {
        let method = Method::from_name(method)?;
        self.compute_with(method)
    }

    /// Compute differential magnitudes. Recomputing replaces earlier results;
    /// a failure keeps them.
    pub fn compute_with(&mut self, method: Method) -> Result<()> {
        let Epoch::Extracted { flux, magnitudes } = &mut self.epoch else {
            return Err(ConfigurationError::NotExtracted.into());
        };
        *magnitudes = Some(compute_magnitudes(flux, method)?);
        Ok(())
    }

    pub fn state(&self) -> State {
        match &self.epoch {
            Epoch::Extracted {
                magnitudes: Some(_),
                ..
            } => State::Computed,
            Epoch::Extracted { .. } => State::Extracted,
            Epoch::Pending if self.apertures.is_complete() => State::Configured,
            Epoch::Pending => State::Uninitialized,
        }
    }

    pub fn catalog(&self) -> &FrameCatalog {
        &self.catalog
    }

    pub fn frame_count(&self) -> usize {
        self.catalog.frame_count()
    }

    /// Julian Dates in frame order.
    pub fn time_axis(&self) -> Vec<f64> {
        self.catalog.time_axis()
    }

    pub fn apertures(&self) -> &ApertureConfig {
        &self.apertures
    }

    pub fn flux(&self) -> Option<&FluxSeries> {
        match &self.epoch {
            Epoch::Extracted { flux, .. } => Some(flux),
            Epoch::Pending => None,
        }
    }

    pub fn target_flux(&self) -> Option<&[f64]> {
        self.flux().map(FluxSeries::target)
    }

    pub fn reference_flux(&self) -> Option<&ReferenceSeries> {
        self.flux().map(FluxSeries::references)
    }

    pub fn magnitudes(&self) -> Option<&MagnitudeSeries> {
        match &self.epoch {
            Epoch::Extracted { magnitudes, .. } => magnitudes.as_ref(),
            Epoch::Pending => None,
        }
    }

    pub fn target_magnitudes(&self) -> Option<&[f64]> {
        self.magnitudes().map(MagnitudeSeries::target)
    }

    pub fn reference_magnitudes(&self) -> Option<&ReferenceSeries> {
        self.magnitudes().map(MagnitudeSeries::references)
    }

    /// Per-frame rows of the computed curve, or `None` before `compute`.
    pub fn rows(&self) -> Option<Vec<LightcurveRow>> {
        let magnitudes = self.magnitudes()?;
        self.catalog
            .frames()
            .iter()
            .map(|frame| {
                Some(LightcurveRow {
                    frame: frame.index,
                    julian_date: frame.julian_date,
                    target: *magnitudes.target().get(frame.index)?,
                    references: magnitudes.references().at_frame(frame.index)?,
                })
            })
            .collect()
    }
}

impl<R, P> fmt::Debug for Lightcurve<R, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lightcurve")
            .field("dir", &self.catalog.dir())
            .field("pattern", &self.catalog.pattern())
            .field("frames", &self.catalog.frame_count())
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
