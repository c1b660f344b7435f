//! PSD comparison curve.

/// One row of a PSD comparison.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PsdRow {
    pub frequency: f64,
    pub empirical: f64,
    pub theoretical: f64,
}

impl PsdRow {
    /// Ratio of empirical to theoretical PSD.
    pub fn ratio(&self) -> f64 {
        self.empirical / self.theoretical
    }
}

/// Empirical PSD (averaged over repeats) next to its theoretical estimate,
/// one row per grid frequency.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PsdCurve {
    rows: Vec<PsdRow>,
}

impl PsdCurve {
    /// Zip frequencies with empirical and theoretical values.
    ///
    /// # Panics
    ///
    /// Panics if the three slices differ in length.
    pub fn new(frequencies: &[f64], empirical: &[f64], theoretical: &[f64]) -> Self {
        assert_eq!(frequencies.len(), empirical.len(), "empirical length mismatch");
        assert_eq!(
            frequencies.len(),
            theoretical.len(),
            "theoretical length mismatch"
        );
        let rows = frequencies
            .iter()
            .zip(empirical)
            .zip(theoretical)
            .map(|((&frequency, &empirical), &theoretical)| PsdRow {
                frequency,
                empirical,
                theoretical,
            })
            .collect();
        Self { rows }
    }

    pub fn rows(&self) -> &[PsdRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Mean of `empirical / theoretical` over all rows.
    pub fn mean_ratio(&self) -> f64 {
        if self.rows.is_empty() {
            return f64::NAN;
        }
        self.rows.iter().map(PsdRow::ratio).sum::<f64>() / self.rows.len() as f64
    }
}
