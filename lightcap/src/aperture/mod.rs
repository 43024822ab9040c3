//! Target and reference aperture configuration.
//!
//! Positions arrive as loose coordinate lists (from callers or YAML) and are
//! validated here into [`ApertureSpec`]s. A configuration holds at most one
//! target and one [`ReferenceSet`]; a rejected call never changes it.


use glam::DVec2;
use serde::Deserialize;

use crate::error::{ConfigurationError, Error, Result};

/// Which aperture a flux or magnitude value belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Target,
    Reference { index: usize },
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Target => write!(f, "target"),
            Role::Reference { index } => write!(f, "reference {}", index),
        }
    }
}

/// Circular aperture: center in pixel coordinates, radius in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct ApertureSpec {
    pub center: DVec2,
    pub radius: f64,
    pub label: Option<String>,
}

impl ApertureSpec {
    /// Validated aperture from a coordinate list of exactly two finite values.
    pub fn new(coordinates: &[f64], radius: f64, label: Option<&str>) -> Result<Self> {
        let center = parse_position(coordinates)?;
        if !(radius.is_finite() && radius > 0.0) {
            return Err(Error::InvalidRadius { radius });
        }
        Ok(Self {
            center,
            radius,
            label: label.map(str::to_string),
        })
    }
}

fn parse_position(coordinates: &[f64]) -> Result<DVec2> {
    match *coordinates {
        [x, y] if x.is_finite() && y.is_finite() => Ok(DVec2::new(x, y)),
        _ => Err(Error::InvalidPosition {
            coordinates: coordinates.to_vec(),
        }),
    }
}

/// Reference positions as supplied by the caller: one position, or a list.
///
/// Deserializes from either `[x, y]` or `[[x, y], ...]`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ReferencePositions {
    Single(Vec<f64>),
    List(Vec<Vec<f64>>),
}

impl From<[f64; 2]> for ReferencePositions {
    fn from(position: [f64; 2]) -> Self {
        ReferencePositions::Single(position.to_vec())
    }
}

impl From<(f64, f64)> for ReferencePositions {
    fn from((x, y): (f64, f64)) -> Self {
        ReferencePositions::Single(vec![x, y])
    }
}

impl From<Vec<[f64; 2]>> for ReferencePositions {
    fn from(positions: Vec<[f64; 2]>) -> Self {
        ReferencePositions::List(positions.iter().map(|p| p.to_vec()).collect())
    }
}

impl From<&[[f64; 2]]> for ReferencePositions {
    fn from(positions: &[[f64; 2]]) -> Self {
        ReferencePositions::List(positions.iter().map(|p| p.to_vec()).collect())
    }
}

impl ReferencePositions {
    fn as_lists(&self) -> Vec<&[f64]> {
        match self {
            ReferencePositions::Single(position) => vec![position.as_slice()],
            ReferencePositions::List(positions) => positions.iter().map(Vec::as_slice).collect(),
        }
    }
}

/// One or more reference apertures. The count is fixed once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceSet {
    specs: Vec<ApertureSpec>,
}

impl ReferenceSet {
    /// Validate every position, radius, and name count.
    ///
    /// `names` is either empty or holds one name per reference.
    pub fn new<S: AsRef<str>>(
        positions: &ReferencePositions,
        radius: f64,
        names: &[S],
    ) -> Result<Self> {
        let positions = positions.as_lists();
        if positions.is_empty() {
            return Err(Error::InvalidPosition {
                coordinates: Vec::new(),
            });
        }
        if !names.is_empty() && names.len() != positions.len() {
            return Err(Error::LabelCountMismatch {
                expected: positions.len(),
                actual: names.len(),
            });
        }

        let specs = positions
            .iter()
            .enumerate()
            .map(|(r, coordinates)| {
                let label = names.get(r).map(|name| name.as_ref());
                ApertureSpec::new(coordinates, radius, label)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { specs })
    }

    pub fn count(&self) -> usize {
        self.specs.len()
    }

    pub fn is_single(&self) -> bool {
        self.specs.len() == 1
    }

    pub fn specs(&self) -> &[ApertureSpec] {
        &self.specs
    }
}

/// The target and reference apertures of one light curve.
#[derive(Debug, Clone, Default)]
pub struct ApertureConfig {
    target: Option<ApertureSpec>,
    references: Option<ReferenceSet>,
}

impl ApertureConfig {
    /// Replace the target aperture. On error the previous target is kept.
    pub fn set_target(&mut self, position: &[f64], radius: f64, name: Option<&str>) -> Result<()> {
        self.target = Some(ApertureSpec::new(position, radius, name)?);
        Ok(())
    }

    /// Replace the reference set. On error the previous set is kept.
    pub fn set_reference<S: AsRef<str>>(
        &mut self,
        positions: &ReferencePositions,
        radius: f64,
        names: &[S],
    ) -> Result<()> {
        self.references = Some(ReferenceSet::new(positions, radius, names)?);
        Ok(())
    }

    pub fn target(&self) -> Option<&ApertureSpec> {
        self.target.as_ref()
    }

    pub fn references(&self) -> Option<&ReferenceSet> {
        self.references.as_ref()
    }

    pub fn is_complete(&self) -> bool {
        self.target.is_some() && self.references.is_some()
    }

    /// Both roles, or the first one that is missing.
    pub fn require(&self) -> Result<(&ApertureSpec, &ReferenceSet)> {
        let target = self.target.as_ref().ok_or(ConfigurationError::MissingTarget)?;
        let references = self
            .references
            .as_ref()
            .ok_or(ConfigurationError::MissingReference)?;
        Ok((target, references))
    }
}
