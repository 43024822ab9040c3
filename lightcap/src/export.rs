//! CSV output of a computed light curve.

use std::io::Write;

use crate::error::{ConfigurationError, Result};
use crate::lightcurve::Lightcurve;

/// Column names: frame index, Julian Date, target, then one per reference.
///
/// Unnamed apertures fall back to `target` and `ref{n}`.
pub fn header<R, P>(curve: &Lightcurve<R, P>) -> Vec<String> {
    let apertures = curve.apertures();
    let mut columns = vec!["frame".to_string(), "jd".to_string()];

    columns.push(
        apertures
            .target()
            .and_then(|t| t.label.clone())
            .unwrap_or_else(|| "target".to_string()),
    );

    if let Some(references) = apertures.references() {
        for (r, spec) in references.specs().iter().enumerate() {
            columns.push(spec.label.clone().unwrap_or_else(|| format!("ref{}", r)));
        }
    }

    columns
}

/// Write one row per frame. Fails if magnitudes have not been computed.
pub fn write_csv<R, P, W: Write>(curve: &Lightcurve<R, P>, out: W) -> Result<()> {
    let rows = curve.rows().ok_or(ConfigurationError::NotComputed)?;

    let mut wtr = csv::Writer::from_writer(out);
    wtr.write_record(header(curve))?;

    for row in &rows {
        let mut record = vec![
            row.frame.to_string(),
            format!("{:.6}", row.julian_date),
            format!("{:.6}", row.target),
        ];
        record.extend(row.references.iter().map(|v| format!("{:.6}", v)));
        wtr.write_record(&record)?;
    }
    wtr.flush().map_err(csv::Error::from)?;

    tracing::info!("Wrote {} light curve rows", rows.len());
    Ok(())
}
