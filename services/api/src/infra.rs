use crate::cli::ModelArgs;
use chrono::NaiveDate;
use metrics_exporter_prometheus::PrometheusHandle;
use restaurant_grade::config::AppConfig;
use restaurant_grade::error::AppError;
use restaurant_grade::prediction::GradePredictor;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Artifact path from the flag, falling back to configuration.
pub(crate) fn model_path(args: &ModelArgs) -> Result<PathBuf, AppError> {
    match &args.path {
        Some(path) => Ok(path.clone()),
        None => Ok(AppConfig::load()?.model.artifact_path),
    }
}

pub(crate) fn load_predictor(args: &ModelArgs) -> Result<GradePredictor, AppError> {
    let path = model_path(args)?;
    Ok(GradePredictor::load(path)?)
}

pub(crate) fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|err| format!("failed to parse '{raw}' as YYYY-MM-DD ({err})"))
}
