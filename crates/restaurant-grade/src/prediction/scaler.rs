use super::domain::{EncodedRecord, FeatureColumn, ScaledVector};
use serde::{Deserialize, Serialize};

/// Fitted standardization parameters, one pair per feature column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandardScaler {
    mean: Vec<f64>,
    scale: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScalerError {
    #[error("scaler has {means} means but {scales} scales")]
    LengthMismatch { means: usize, scales: usize },
    #[error("scaler column {index} has a non-finite mean or a zero/non-finite scale")]
    Degenerate { index: usize },
}

impl StandardScaler {
    pub fn new(mean: Vec<f64>, scale: Vec<f64>) -> Result<Self, ScalerError> {
        let scaler = Self { mean, scale };
        scaler.validate()?;
        Ok(scaler)
    }

    pub(crate) fn validate(&self) -> Result<(), ScalerError> {
        if self.mean.len() != self.scale.len() {
            return Err(ScalerError::LengthMismatch {
                means: self.mean.len(),
                scales: self.scale.len(),
            });
        }
        let degenerate = self
            .mean
            .iter()
            .zip(&self.scale)
            .position(|(mean, scale)| !mean.is_finite() || !scale.is_finite() || *scale == 0.0);
        match degenerate {
            Some(index) => Err(ScalerError::Degenerate { index }),
            None => Ok(()),
        }
    }

    pub fn len(&self) -> usize {
        self.mean.len()
    }

    pub fn is_empty(&self) -> bool {
        self.mean.is_empty()
    }

    /// `columns` must be the fit order and as long as the scaler.
    pub fn transform(&self, record: &EncodedRecord, columns: &[FeatureColumn]) -> ScaledVector {
        let values = columns
            .iter()
            .zip(self.mean.iter().zip(&self.scale))
            .map(|(column, (mean, scale))| (record.value(*column) - mean) / scale)
            .collect();
        ScaledVector::new(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> EncodedRecord {
        EncodedRecord {
            inspection_type: 1,
            critical_flag: 0,
            violation_code: 2,
            score: 18,
            inspection_year: 2024,
            inspection_month: 7,
            inspection_day_of_week: 4,
        }
    }

    #[test]
    fn standardizes_each_column() {
        let scaler = StandardScaler::new(
            vec![2.0, 1.0, 3.0, 20.0, 2023.0, 6.5, 3.0],
            vec![1.0, 1.0, 2.0, 10.0, 1.0, 3.5, 2.0],
        )
        .expect("valid scaler");
        let scaled = scaler.transform(&record(), &FeatureColumn::ordered());
        let expected = [-1.0, -1.0, -0.5, -0.2, 1.0, 0.5 / 3.5, 0.5];
        assert_eq!(scaled.len(), expected.len());
        for (actual, expected) in scaled.values().iter().zip(expected) {
            assert!((actual - expected).abs() < 1e-12, "{actual} != {expected}");
        }
    }

    #[test]
    fn respects_column_order() {
        let scaler = StandardScaler::new(vec![0.0, 0.0], vec![1.0, 1.0]).expect("valid scaler");
        let scaled = scaler.transform(
            &record(),
            &[FeatureColumn::Score, FeatureColumn::InspectionMonth],
        );
        assert_eq!(scaled.values(), &[18.0, 7.0]);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        assert_eq!(
            StandardScaler::new(vec![0.0, 1.0], vec![1.0]).expect_err("length mismatch"),
            ScalerError::LengthMismatch {
                means: 2,
                scales: 1
            }
        );
        assert_eq!(
            StandardScaler::new(vec![0.0, 1.0], vec![1.0, 0.0]).expect_err("zero scale"),
            ScalerError::Degenerate { index: 1 }
        );
        assert_eq!(
            StandardScaler::new(vec![f64::NAN], vec![1.0]).expect_err("nan mean"),
            ScalerError::Degenerate { index: 0 }
        );
    }
}
