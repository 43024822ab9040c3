//! YAML run description for the `lightcap` binary.
//!
//! ```yaml
//! frames: /data/2020-07-31/lights/a-wcs-reduced-*.fit
//! time_key: JD
//! method: average
//! target:
//!   position: [1108.81, 1015.97]
//!   radius: 8.0
//!   name: Lx Ser
//! references:
//!   positions: [[1341.0, 938.0], [1230.0, 905.0]]
//!   radius: 8.0
//!   names: [a, b]
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::aperture::ReferencePositions;
use crate::catalog::{DEFAULT_TIME_KEY, FitsReader};
use crate::error::{Error, Result};
use crate::lightcurve::Lightcurve;
use crate::magnitude::Method;
use crate::photometry::{ApertureSum, DEFAULT_SUBPIXELS};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TargetConfig {
    pub position: Vec<f64>,
    pub radius: f64,
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ReferenceConfig {
    /// One `[x, y]` or a list of them.
    #[serde(alias = "position")]
    pub positions: ReferencePositions,
    pub radius: f64,
    #[serde(default)]
    pub names: Vec<String>,
}

/// Everything needed to produce one light curve.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RunConfig {
    /// Frame directory or wildcard pattern.
    pub frames: PathBuf,
    #[serde(default = "default_time_key")]
    pub time_key: String,
    #[serde(default = "default_subpixels")]
    pub subpixels: usize,
    #[serde(default = "default_method")]
    pub method: String,
    pub target: TargetConfig,
    pub references: ReferenceConfig,
}

fn default_time_key() -> String {
    DEFAULT_TIME_KEY.to_string()
}

fn default_subpixels() -> usize {
    DEFAULT_SUBPIXELS
}

fn default_method() -> String {
    Method::default().to_string()
}

impl RunConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| Error::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yml::from_str(&text).map_err(|source| Error::ConfigParse {
            path: path.to_path_buf(),
            source,
        })
    }

    pub fn from_yaml_str(text: &str) -> Result<Self> {
        serde_yml::from_str(text).map_err(|source| Error::ConfigParse {
            path: PathBuf::new(),
            source,
        })
    }

    /// Load the frames, configure both roles, extract, and compute.
    pub fn run(&self) -> Result<Lightcurve> {
        let method = Method::from_name(&self.method)?;
        if self.subpixels == 0 {
            return Err(Error::InvalidSubpixels);
        }

        let mut curve = Lightcurve::with_collaborators(
            &self.frames,
            FitsReader::new(self.time_key.as_str()),
            ApertureSum::new(self.subpixels),
        )?;

        curve.set_target(
            &self.target.position,
            self.target.radius,
            self.target.name.as_deref(),
        )?;
        curve.set_reference(
            &self.references.positions,
            self.references.radius,
            &self.references.names,
        )?;

        curve.extract()?;
        curve.compute_with(method)?;
        Ok(curve)
    }
}
