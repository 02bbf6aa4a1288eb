use super::domain::{GradeSymbol, InspectionRecord, PredictionError};
use super::predictor::GradePredictor;
use crate::messaging::{authority_action, customer_message, owner_recommendation};
use serde::{Deserialize, Serialize};
use std::io::{Read, Write};
use tracing::info;

#[derive(Debug, thiserror::Error)]
pub enum BatchError {
    #[error("invalid inspection CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("row {row}: {source}")]
    Row {
        row: usize,
        #[source]
        source: PredictionError,
    },
    #[error("could not write predictions: {0}")]
    Io(#[from] std::io::Error),
}

impl BatchError {
    /// Whether the failure came from the submitted rows rather than the model.
    pub fn is_invalid_input(&self) -> bool {
        match self {
            BatchError::Csv(_) => true,
            BatchError::Row { source, .. } => source.is_invalid_input(),
            BatchError::Io(_) => false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct InspectionRow {
    #[serde(rename = "INSPECTION TYPE")]
    inspection_type: String,
    #[serde(rename = "CRITICAL FLAG")]
    critical_flag: String,
    #[serde(rename = "VIOLATION CODE")]
    violation_code: String,
    #[serde(rename = "SCORE")]
    score: i32,
    inspection_year: i32,
    inspection_month: u32,
    inspection_day_of_week: u32,
}

impl InspectionRow {
    fn into_record(self) -> Result<InspectionRecord, PredictionError> {
        InspectionRecord::new(
            self.inspection_type,
            self.critical_flag,
            self.violation_code,
            self.score,
            self.inspection_year,
            self.inspection_month,
            self.inspection_day_of_week,
        )
    }
}

/// A scored row with the messages for every role.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BatchPrediction {
    #[serde(rename = "INSPECTION TYPE")]
    pub inspection_type: String,
    #[serde(rename = "CRITICAL FLAG")]
    pub critical_flag: String,
    #[serde(rename = "VIOLATION CODE")]
    pub violation_code: String,
    #[serde(rename = "SCORE")]
    pub score: i32,
    pub inspection_year: i32,
    pub inspection_month: u32,
    pub inspection_day_of_week: u32,
    #[serde(rename = "Predicted Grade")]
    pub predicted_grade: GradeSymbol,
    #[serde(rename = "Customer Msg")]
    pub customer_message: &'static str,
    #[serde(rename = "Owner Rec")]
    pub owner_recommendation: &'static str,
    #[serde(rename = "Authority Act")]
    pub authority_action: &'static str,
}

impl BatchPrediction {
    fn new(record: &InspectionRecord, grade: GradeSymbol) -> Self {
        Self {
            inspection_type: record.inspection_type().to_string(),
            critical_flag: record.critical_flag().to_string(),
            violation_code: record.violation_code().to_string(),
            score: record.score(),
            inspection_year: record.inspection_year(),
            inspection_month: record.inspection_month(),
            inspection_day_of_week: record.inspection_day_of_week(),
            predicted_grade: grade,
            customer_message: customer_message(grade.as_str()),
            owner_recommendation: owner_recommendation(grade.as_str()),
            authority_action: authority_action(grade.as_str()),
        }
    }
}

impl GradePredictor {
    /// Predicts every row of an inspection CSV. Row numbers in errors are
    /// 1-based and exclude the header.
    pub fn predict_batch<R: Read>(&self, reader: R) -> Result<Vec<BatchPrediction>, BatchError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut predictions = Vec::new();

        for (index, row) in csv_reader.deserialize::<InspectionRow>().enumerate() {
            let row_number = index + 1;
            let record = row?
                .into_record()
                .map_err(|source| BatchError::Row {
                    row: row_number,
                    source,
                })?;
            let grade = self.predict(&record).map_err(|source| BatchError::Row {
                row: row_number,
                source,
            })?;
            predictions.push(BatchPrediction::new(&record, grade));
        }

        info!(rows = predictions.len(), "batch scored");
        Ok(predictions)
    }
}

const OUTPUT_HEADERS: [&str; 11] = [
    "INSPECTION TYPE",
    "CRITICAL FLAG",
    "VIOLATION CODE",
    "SCORE",
    "inspection_year",
    "inspection_month",
    "inspection_day_of_week",
    "Predicted Grade",
    "Customer Msg",
    "Owner Rec",
    "Authority Act",
];

/// Writes predictions as CSV. An empty batch still gets its header row.
pub fn write_batch_csv<W: Write>(
    writer: W,
    predictions: &[BatchPrediction],
) -> Result<(), BatchError> {
    let mut csv_writer = csv::Writer::from_writer(writer);
    if predictions.is_empty() {
        csv_writer.write_record(OUTPUT_HEADERS)?;
    }
    for prediction in predictions {
        csv_writer.serialize(prediction)?;
    }
    csv_writer.flush()?;
    Ok(())
}
