/// Per-frame values for the reference apertures.
///
/// The shape follows the reference count: a single reference gives one flat
/// series, several references give one series per reference (reference-major,
/// frame-minor). Flux and magnitudes share this shape.
#[derive(Debug, Clone, PartialEq)]
pub enum ReferenceSeries {
    Single(Vec<f64>),
    Multiple(Vec<Vec<f64>>),
}

impl ReferenceSeries {
    /// Build from one series per reference; a single series stays flat.
    pub(crate) fn from_per_reference(mut series: Vec<Vec<f64>>) -> Self {
        assert!(!series.is_empty(), "At least one reference series required");
        if series.len() == 1 {
            ReferenceSeries::Single(series.remove(0))
        } else {
            ReferenceSeries::Multiple(series)
        }
    }

    /// Number of references.
    pub fn reference_count(&self) -> usize {
        match self {
            ReferenceSeries::Single(_) => 1,
            ReferenceSeries::Multiple(series) => series.len(),
        }
    }

    /// Series of reference `index`.
    pub fn get(&self, index: usize) -> Option<&[f64]> {
        match self {
            ReferenceSeries::Single(series) if index == 0 => Some(series.as_slice()),
            ReferenceSeries::Single(_) => None,
            ReferenceSeries::Multiple(series) => series.get(index).map(Vec::as_slice),
        }
    }

    /// All reference series in reference order.
    pub fn iter(&self) -> impl Iterator<Item = &[f64]> {
        (0..self.reference_count()).filter_map(|r| self.get(r))
    }

    /// Values of every reference at one frame, in reference order.
    pub fn at_frame(&self, frame: usize) -> Option<Vec<f64>> {
        self.iter().map(|s| s.get(frame).copied()).collect()
    }

    /// Length of each series (all series have the same length).
    pub fn frame_count(&self) -> usize {
        self.iter().next().map_or(0, <[f64]>::len)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_series_stays_flat() {
        let series = ReferenceSeries::from_per_reference(vec![vec![1.0, 2.0, 3.0]]);
        assert_eq!(series, ReferenceSeries::Single(vec![1.0, 2.0, 3.0]));
        assert_eq!(series.reference_count(), 1);
        assert_eq!(series.frame_count(), 3);
        assert_eq!(series.get(0), Some(&[1.0, 2.0, 3.0][..]));
        assert_eq!(series.get(1), None);
    }

    #[test]
    fn test_multiple_series_keeps_reference_order() {
        let series = ReferenceSeries::from_per_reference(vec![
            vec![1.0, 2.0],
            vec![10.0, 20.0],
            vec![5.0, 6.0],
        ]);
        assert_eq!(series.reference_count(), 3);
        assert_eq!(series.frame_count(), 2);
        assert_eq!(series.get(1), Some(&[10.0, 20.0][..]));
        assert_eq!(series.at_frame(1), Some(vec![2.0, 20.0, 6.0]));
        assert_eq!(series.at_frame(2), None);
        assert_eq!(series.iter().count(), 3);
    }
}
