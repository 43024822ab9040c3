//! Differential magnitudes from a completed flux series.


use std::str::FromStr;

use strum::IntoEnumIterator;
use strum_macros::{Display, EnumIter, EnumString};

use crate::aperture::Role;
use crate::error::{Error, Result};
use crate::extraction::FluxSeries;
use crate::series::ReferenceSeries;

/// How reference fluxes are combined into the comparison flux.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Display, EnumString, EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Method {
    /// One reference is used as is; several references are averaged per frame.
    #[default]
    Average,
}

impl Method {
    /// Parse a method name, rejecting anything that is not a known method.
    pub fn from_name(name: &str) -> Result<Self> {
        Method::from_str(name).map_err(|_| {
            tracing::debug!(
                "Unknown method '{}', known: {:?}",
                name,
                Method::iter().map(|m| m.to_string()).collect::<Vec<_>>()
            );
            Error::UnsupportedMethod {
                method: name.to_string(),
            }
        })
    }
}

/// Magnitudes of the target and every reference, aligned with catalog order.
///
/// The reference part has the same shape as the flux it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct MagnitudeSeries {
    target: Vec<f64>,
    references: ReferenceSeries,
}

impl MagnitudeSeries {
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

/// `-2.5 * log10(flux / reference)`.
///
/// Written as `2.5 * log10(reference / flux)` so equal fluxes give `+0.0`.
#[inline]
pub fn differential_magnitude(flux: f64, reference: f64) -> f64 {
    2.5 * (reference / flux).log10()
}

/// Differential magnitudes for every frame of `flux`.
///
/// Every value consumed must be finite and strictly positive; the first one
/// that is not fails the whole computation with [`Error::Domain`].
pub fn compute_magnitudes(flux: &FluxSeries, method: Method) -> Result<MagnitudeSeries> {
    check_domain(flux)?;

    let Method::Average = method;
    let target = flux.target();

    let magnitudes = match flux.references() {
        ReferenceSeries::Single(reference) => {
            tracing::info!("One reference aperture, using it without averaging");
            MagnitudeSeries {
                target: target
                    .iter()
                    .zip(reference)
                    .map(|(&t, &r)| differential_magnitude(t, r))
                    .collect(),
                references: ReferenceSeries::Single(
                    reference
                        .iter()
                        .map(|&r| differential_magnitude(r, r))
                        .collect(),
                ),
            }
        }
        ReferenceSeries::Multiple(series) => {
            let comparison = mean_per_frame(series, target.len());
            MagnitudeSeries {
                target: target
                    .iter()
                    .zip(&comparison)
                    .map(|(&t, &avg)| differential_magnitude(t, avg))
                    .collect(),
                references: ReferenceSeries::Multiple(
                    series
                        .iter()
                        .map(|values| {
                            values
                                .iter()
                                .zip(&comparison)
                                .map(|(&r, &avg)| differential_magnitude(r, avg))
                                .collect()
                        })
                        .collect(),
                ),
            }
        }
    };

    tracing::info!(
        "Computed {} magnitudes ({} frames, {} references)",
        method,
        magnitudes.frame_count(),
        magnitudes.references.reference_count()
    );

    Ok(magnitudes)
}

fn mean_per_frame(series: &[Vec<f64>], frame_count: usize) -> Vec<f64> {
    let count = series.len() as f64;
    (0..frame_count)
        .map(|i| series.iter().map(|values| values[i] / count).sum::<f64>())
        .collect()
}

/// Frame-major scan so the reported error is the earliest frame.
fn check_domain(flux: &FluxSeries) -> Result<()> {
    let references = flux.references();
    for (frame, &value) in flux.target().iter().enumerate() {
        require_positive(frame, Role::Target, value)?;
        for (index, series) in references.iter().enumerate() {
            require_positive(frame, Role::Reference { index }, series[frame])?;
        }
    }
    Ok(())
}

fn require_positive(frame: usize, role: Role, value: f64) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(Error::Domain { frame, role, value })
    }
}
