use super::domain::{InspectionRecord, PredictionError};
use chrono::{Datelike, NaiveDate};
use serde::Deserialize;

/// Form input as entered by a user: categorical selections, a score and the
/// inspection date.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InspectionInput {
    pub inspection_type: String,
    pub critical_flag: String,
    pub violation_code: String,
    pub score: i32,
    pub inspection_date: NaiveDate,
}

/// Splits the date into year, month and weekday (Monday = 0) and builds the
/// ordered record. Only the score can be rejected; a calendar date always
/// yields valid parts.
pub fn assemble(input: InspectionInput) -> Result<InspectionRecord, PredictionError> {
    let InspectionInput {
        inspection_type,
        critical_flag,
        violation_code,
        score,
        inspection_date,
    } = input;

    InspectionRecord::new(
        inspection_type,
        critical_flag,
        violation_code,
        score,
        inspection_date.year(),
        inspection_date.month(),
        inspection_date.weekday().num_days_from_monday(),
    )
}
