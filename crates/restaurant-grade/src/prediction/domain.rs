use serde::{Deserialize, Serialize};
use std::fmt;

/// Health grade published for an inspection outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GradeSymbol {
    A,
    B,
    C,
    N,
    Z,
    P,
}

impl GradeSymbol {
    pub const fn ordered() -> [Self; 6] {
        [Self::A, Self::B, Self::C, Self::N, Self::Z, Self::P]
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::N => "N",
            Self::Z => "Z",
            Self::P => "P",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::A => "Grade A",
            Self::B => "Grade B",
            Self::C => "Grade C",
            Self::N => "Not Yet Graded",
            Self::Z => "Grade Pending",
            Self::P => "Grade Pending Appeal",
        }
    }

    pub fn from_symbol(value: &str) -> Option<Self> {
        match value.trim() {
            "A" => Some(Self::A),
            "B" => Some(Self::B),
            "C" => Some(Self::C),
            "N" => Some(Self::N),
            "Z" => Some(Self::Z),
            "P" => Some(Self::P),
            _ => None,
        }
    }
}

impl fmt::Display for GradeSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Categorical inputs that go through a label encoder before scaling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CategoricalField {
    InspectionType,
    CriticalFlag,
    ViolationCode,
}

impl CategoricalField {
    pub const fn ordered() -> [Self; 3] {
        [Self::InspectionType, Self::CriticalFlag, Self::ViolationCode]
    }

    /// Column name used in the model artifact and in batch CSV files.
    pub const fn column(self) -> &'static str {
        match self {
            Self::InspectionType => "INSPECTION TYPE",
            Self::CriticalFlag => "CRITICAL FLAG",
            Self::ViolationCode => "VIOLATION CODE",
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::InspectionType => "Inspection Type",
            Self::CriticalFlag => "Critical Flag",
            Self::ViolationCode => "Violation Code",
        }
    }

    pub fn from_column(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|field| field.column() == name)
    }
}

/// One column of the feature vector fed to the scaler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureColumn {
    Categorical(CategoricalField),
    Score,
    InspectionYear,
    InspectionMonth,
    InspectionDayOfWeek,
}

impl FeatureColumn {
    pub const COUNT: usize = 7;

    pub const fn ordered() -> [Self; Self::COUNT] {
        [
            Self::Categorical(CategoricalField::InspectionType),
            Self::Categorical(CategoricalField::CriticalFlag),
            Self::Categorical(CategoricalField::ViolationCode),
            Self::Score,
            Self::InspectionYear,
            Self::InspectionMonth,
            Self::InspectionDayOfWeek,
        ]
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Categorical(field) => field.column(),
            Self::Score => "SCORE",
            Self::InspectionYear => "inspection_year",
            Self::InspectionMonth => "inspection_month",
            Self::InspectionDayOfWeek => "inspection_day_of_week",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ordered()
            .into_iter()
            .find(|column| column.name() == name)
    }
}

/// Raw inspection attributes, validated and fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InspectionRecord {
    inspection_type: String,
    critical_flag: String,
    violation_code: String,
    score: i32,
    inspection_year: i32,
    inspection_month: u32,
    inspection_day_of_week: u32,
}

impl InspectionRecord {
    pub const MIN_SCORE: i32 = 0;
    pub const MAX_SCORE: i32 = 100;

    pub fn new(
        inspection_type: impl Into<String>,
        critical_flag: impl Into<String>,
        violation_code: impl Into<String>,
        score: i32,
        inspection_year: i32,
        inspection_month: u32,
        inspection_day_of_week: u32,
    ) -> Result<Self, PredictionError> {
        if !(Self::MIN_SCORE..=Self::MAX_SCORE).contains(&score) {
            return Err(PredictionError::ScoreOutOfRange { score });
        }
        if !(1..=12).contains(&inspection_month) {
            return Err(PredictionError::MonthOutOfRange {
                month: inspection_month,
            });
        }
        if inspection_day_of_week > 6 {
            return Err(PredictionError::DayOfWeekOutOfRange {
                day: inspection_day_of_week,
            });
        }

        Ok(Self {
            inspection_type: inspection_type.into(),
            critical_flag: critical_flag.into(),
            violation_code: violation_code.into(),
            score,
            inspection_year,
            inspection_month,
            inspection_day_of_week,
        })
    }

    pub fn categorical(&self, field: CategoricalField) -> &str {
        match field {
            CategoricalField::InspectionType => &self.inspection_type,
            CategoricalField::CriticalFlag => &self.critical_flag,
            CategoricalField::ViolationCode => &self.violation_code,
        }
    }

    pub fn inspection_type(&self) -> &str {
        &self.inspection_type
    }

    pub fn critical_flag(&self) -> &str {
        &self.critical_flag
    }

    pub fn violation_code(&self) -> &str {
        &self.violation_code
    }

    pub fn score(&self) -> i32 {
        self.score
    }

    pub fn inspection_year(&self) -> i32 {
        self.inspection_year
    }

    pub fn inspection_month(&self) -> u32 {
        self.inspection_month
    }

    /// Monday is 0, Sunday is 6.
    pub fn inspection_day_of_week(&self) -> u32 {
        self.inspection_day_of_week
    }
}

/// [`InspectionRecord`] with categorical fields replaced by encoder codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EncodedRecord {
    pub inspection_type: usize,
    pub critical_flag: usize,
    pub violation_code: usize,
    pub score: i32,
    pub inspection_year: i32,
    pub inspection_month: u32,
    pub inspection_day_of_week: u32,
}

impl EncodedRecord {
    pub fn value(&self, column: FeatureColumn) -> f64 {
        match column {
            FeatureColumn::Categorical(CategoricalField::InspectionType) => {
                self.inspection_type as f64
            }
            FeatureColumn::Categorical(CategoricalField::CriticalFlag) => {
                self.critical_flag as f64
            }
            FeatureColumn::Categorical(CategoricalField::ViolationCode) => {
                self.violation_code as f64
            }
            FeatureColumn::Score => f64::from(self.score),
            FeatureColumn::InspectionYear => f64::from(self.inspection_year),
            FeatureColumn::InspectionMonth => f64::from(self.inspection_month),
            FeatureColumn::InspectionDayOfWeek => f64::from(self.inspection_day_of_week),
        }
    }
}

/// Feature values after scaling, in the column order the model was fitted on.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledVector(Vec<f64>);

impl ScaledVector {
    pub fn new(values: Vec<f64>) -> Self {
        Self(values)
    }

    pub fn values(&self) -> &[f64] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PredictionError {
    #[error("score {score} is outside the accepted range 0..=100")]
    ScoreOutOfRange { score: i32 },
    #[error("inspection month {month} is outside 1..=12")]
    MonthOutOfRange { month: u32 },
    #[error("inspection day of week {day} is outside 0..=6")]
    DayOfWeekOutOfRange { day: u32 },
    #[error("model produced grade class {class} which the grade encoder does not know")]
    UnknownGradeClass { class: i64 },
}

impl PredictionError {
    /// Input errors are the caller's fault; anything else is an internal fault.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, PredictionError::UnknownGradeClass { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn grade_symbols_parse_their_own_text() {
        for grade in GradeSymbol::ordered() {
            assert_eq!(GradeSymbol::from_symbol(grade.as_str()), Some(grade));
        }
        assert_eq!(GradeSymbol::from_symbol("Q"), None);
        assert_eq!(GradeSymbol::from_symbol(""), None);
    }

    #[test]
    fn feature_columns_resolve_by_artifact_name() {
        assert_eq!(
            FeatureColumn::from_name("VIOLATION CODE"),
            Some(FeatureColumn::Categorical(CategoricalField::ViolationCode))
        );
        assert_eq!(
            FeatureColumn::from_name("inspection_day_of_week"),
            Some(FeatureColumn::InspectionDayOfWeek)
        );
        assert_eq!(FeatureColumn::from_name("BORO"), None);
    }

    #[test]
    fn record_rejects_scores_outside_range() {
        let err = InspectionRecord::new("Cycle", "Critical", "06C", 101, 2024, 7, 4)
            .expect_err("score above 100 rejected");
        assert!(matches!(err, PredictionError::ScoreOutOfRange { score: 101 }));
        assert!(err.is_invalid_input());

        let err = InspectionRecord::new("Cycle", "Critical", "06C", -1, 2024, 7, 4)
            .expect_err("negative score rejected");
        assert!(matches!(err, PredictionError::ScoreOutOfRange { score: -1 }));
    }

    #[test]
    fn record_rejects_bad_date_parts() {
        assert!(matches!(
            InspectionRecord::new("Cycle", "Critical", "06C", 10, 2024, 13, 4),
            Err(PredictionError::MonthOutOfRange { month: 13 })
        ));
        assert!(matches!(
            InspectionRecord::new("Cycle", "Critical", "06C", 10, 2024, 7, 7),
            Err(PredictionError::DayOfWeekOutOfRange { day: 7 })
        ));
    }

    #[test]
    fn encoded_values_follow_columns() {
        let encoded = EncodedRecord {
            inspection_type: 1,
            critical_flag: 0,
            violation_code: 2,
            score: 18,
            inspection_year: 2024,
            inspection_month: 7,
            inspection_day_of_week: 4,
        };
        let values: Vec<f64> = FeatureColumn::ordered()
            .into_iter()
            .map(|column| encoded.value(column))
            .collect();
        assert_eq!(values, vec![1.0, 0.0, 2.0, 18.0, 2024.0, 7.0, 4.0]);
    }
}
