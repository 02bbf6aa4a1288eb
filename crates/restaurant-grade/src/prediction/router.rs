use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::{Local, NaiveDate};
use serde::Serialize;

use super::batch::write_batch_csv;
use super::domain::{CategoricalField, GradeSymbol};
use super::predictor::GradePredictor;
use super::service::{PredictionOutcome, PredictionRequest, PredictionView};
use crate::error::AppError;

/// Router builder exposing prediction, report and batch endpoints.
pub fn prediction_router(predictor: Arc<GradePredictor>) -> Router {
    Router::new()
        .route("/api/v1/vocabulary", get(vocabulary_handler))
        .route("/api/v1/predict", post(predict_handler))
        .route("/api/v1/predict/batch", post(batch_handler))
        .route("/api/v1/report/csv", post(csv_report_handler))
        .route("/api/v1/report/pdf", post(pdf_report_handler))
        .with_state(predictor)
}

#[derive(Debug, Serialize)]
pub struct VocabularyView {
    pub inspection_type: Vec<String>,
    pub critical_flag: Vec<String>,
    pub violation_code: Vec<String>,
    pub grades: Vec<GradeSymbol>,
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn evaluate(
    predictor: &GradePredictor,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<PredictionOutcome, AppError> {
    let Json(request) = payload?;
    Ok(predictor.evaluate(request, today())?)
}

fn attachment(content_type: mime::Mime, file_name: String, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        body,
    )
        .into_response()
}

pub(crate) async fn vocabulary_handler(
    State(predictor): State<Arc<GradePredictor>>,
) -> Json<VocabularyView> {
    let vocabulary = |field| predictor.vocabulary(field).to_vec();
    Json(VocabularyView {
        inspection_type: vocabulary(CategoricalField::InspectionType),
        critical_flag: vocabulary(CategoricalField::CriticalFlag),
        violation_code: vocabulary(CategoricalField::ViolationCode),
        grades: predictor.grade_classes().to_vec(),
    })
}

pub(crate) async fn predict_handler(
    State(predictor): State<Arc<GradePredictor>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Json<PredictionView>, AppError> {
    let outcome = evaluate(&predictor, payload)?;
    Ok(Json(outcome.view()))
}

pub(crate) async fn csv_report_handler(
    State(predictor): State<Arc<GradePredictor>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let outcome = evaluate(&predictor, payload)?;
    let body = outcome.result.to_csv()?;
    Ok(attachment(
        mime::TEXT_CSV_UTF_8,
        format!("{}.csv", outcome.result.file_stem()),
        body,
    ))
}

pub(crate) async fn pdf_report_handler(
    State(predictor): State<Arc<GradePredictor>>,
    payload: Result<Json<PredictionRequest>, JsonRejection>,
) -> Result<Response, AppError> {
    let outcome = evaluate(&predictor, payload)?;
    let body = outcome.result.to_pdf()?;
    Ok(attachment(
        mime::APPLICATION_PDF,
        format!("{}.pdf", outcome.result.file_stem()),
        body,
    ))
}

pub(crate) async fn batch_handler(
    State(predictor): State<Arc<GradePredictor>>,
    body: String,
) -> Result<Response, AppError> {
    let predictions = predictor.predict_batch(body.as_bytes())?;
    let mut output = Vec::new();
    write_batch_csv(&mut output, &predictions)?;
    Ok(attachment(
        mime::TEXT_CSV_UTF_8,
        "predicted_results.csv".to_string(),
        output,
    ))
}
