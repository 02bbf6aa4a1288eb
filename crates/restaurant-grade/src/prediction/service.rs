use super::domain::{GradeSymbol, InspectionRecord, PredictionError};
use super::features::{assemble, InspectionInput};
use super::predictor::GradePredictor;
use crate::messaging::GradeMessages;
use crate::report::{ResultRecord, RoleContext};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A role-specific form submission.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PredictionRequest {
    #[serde(flatten)]
    pub context: RoleContext,
    pub inspection_type: String,
    pub critical_flag: String,
    pub violation_code: String,
    pub score: i32,
    #[serde(default)]
    pub inspection_date: Option<NaiveDate>,
}

impl PredictionRequest {
    fn into_input(self, today: NaiveDate) -> (RoleContext, InspectionInput) {
        let input = InspectionInput {
            inspection_type: self.inspection_type,
            critical_flag: self.critical_flag,
            violation_code: self.violation_code,
            score: self.score,
            inspection_date: self.inspection_date.unwrap_or(today),
        };
        (self.context, input)
    }
}

/// Everything shown back to the user after a prediction.
#[derive(Debug, Clone)]
pub struct PredictionOutcome {
    pub record: InspectionRecord,
    pub result: ResultRecord,
    pub messages: GradeMessages,
}

impl PredictionOutcome {
    pub fn grade(&self) -> GradeSymbol {
        self.result.grade
    }

    pub fn view(&self) -> PredictionView {
        PredictionView {
            role: self.messages.role.label(),
            predicted_grade: self.messages.grade,
            grade_label: self.messages.grade.label(),
            badge_color: self.messages.badge_color,
            summary: self.messages.summary,
            guidance: self.messages.guidance,
            inspection_year: self.record.inspection_year(),
            inspection_month: self.record.inspection_month(),
            inspection_day_of_week: self.record.inspection_day_of_week(),
            context: self.result.context.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PredictionView {
    pub role: &'static str,
    pub predicted_grade: GradeSymbol,
    pub grade_label: &'static str,
    pub badge_color: &'static str,
    pub summary: &'static str,
    pub guidance: &'static str,
    pub inspection_year: i32,
    pub inspection_month: u32,
    pub inspection_day_of_week: u32,
    pub context: RoleContext,
}

impl GradePredictor {
    /// Runs one submission through the whole pipeline. `today` stands in for
    /// a missing inspection date.
    pub fn evaluate(
        &self,
        request: PredictionRequest,
        today: NaiveDate,
    ) -> Result<PredictionOutcome, PredictionError> {
        let (context, input) = request.into_input(today);
        let record = assemble(input)?;
        let grade = self.predict(&record)?;
        let messages = GradeMessages::new(context.role(), grade);
        let result = ResultRecord::new(context, &record, grade);
        Ok(PredictionOutcome {
            record,
            result,
            messages,
        })
    }
}
