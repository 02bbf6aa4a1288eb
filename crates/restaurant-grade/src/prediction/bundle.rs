use super::domain::{CategoricalField, FeatureColumn, GradeSymbol};
use super::encoder::{EncoderBankError, LabelEncoder};
use super::forest::{ForestArrays, ForestError};
use super::scaler::{ScalerError, StandardScaler};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Serialized model artifact: the fitted forest plus every transform it was
/// trained behind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelBundle {
    pub model: ForestArrays,
    pub scaler: StandardScaler,
    pub label_encoders: HashMap<String, LabelEncoder>,
    pub features: Vec<String>,
    pub grade_encoder: GradeEncoderArtifact,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GradeEncoderArtifact {
    pub classes: Vec<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum ModelLoadError {
    #[error("could not read model artifact {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("model artifact is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("model artifact feature list: {0}")]
    Features(String),
    #[error("model artifact label encoders: {0}")]
    Encoders(#[from] EncoderBankError),
    #[error("model artifact scaler: {0}")]
    Scaler(#[from] ScalerError),
    #[error("model artifact forest: {0}")]
    Forest(#[from] ForestError),
    #[error("model artifact grade encoder: {0}")]
    Grades(String),
}

impl ModelBundle {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ModelLoadError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_reader(std::io::BufReader::new(file))
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Self, ModelLoadError> {
        Ok(serde_json::from_reader(reader)?)
    }

    pub fn from_json(raw: &str) -> Result<Self, ModelLoadError> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Resolves the feature list into columns. Each of the seven known
    /// columns must appear exactly once, and the scaler must match.
    pub(crate) fn feature_columns(&self) -> Result<Vec<FeatureColumn>, ModelLoadError> {
        let mut columns = Vec::with_capacity(self.features.len());
        for name in &self.features {
            let column = FeatureColumn::from_name(name)
                .ok_or_else(|| ModelLoadError::Features(format!("unknown column '{name}'")))?;
            if columns.contains(&column) {
                return Err(ModelLoadError::Features(format!(
                    "column '{name}' listed twice"
                )));
            }
            columns.push(column);
        }
        if let Some(missing) = FeatureColumn::ordered()
            .into_iter()
            .find(|column| !columns.contains(column))
        {
            return Err(ModelLoadError::Features(format!(
                "column '{}' is missing",
                missing.name()
            )));
        }

        self.scaler.validate()?;
        if self.scaler.len() != columns.len() {
            return Err(ModelLoadError::Features(format!(
                "{} columns but the scaler was fitted on {}",
                columns.len(),
                self.scaler.len()
            )));
        }
        Ok(columns)
    }

    pub(crate) fn categorical_encoders(
        &self,
    ) -> Result<HashMap<CategoricalField, LabelEncoder>, ModelLoadError> {
        let mut encoders = HashMap::new();
        for (column, encoder) in &self.label_encoders {
            let field = CategoricalField::from_column(column).ok_or_else(|| {
                ModelLoadError::Features(format!("label encoder for unknown column '{column}'"))
            })?;
            encoders.insert(field, encoder.clone());
        }
        Ok(encoders)
    }

    /// Grade symbols in encoder order; every forest class must index into them.
    pub(crate) fn grade_symbols(&self) -> Result<Vec<GradeSymbol>, ModelLoadError> {
        if self.grade_encoder.classes.is_empty() {
            return Err(ModelLoadError::Grades("no classes".to_string()));
        }
        let mut symbols = Vec::with_capacity(self.grade_encoder.classes.len());
        for raw in &self.grade_encoder.classes {
            let symbol = GradeSymbol::from_symbol(raw)
                .ok_or_else(|| ModelLoadError::Grades(format!("'{raw}' is not a grade symbol")))?;
            if symbols.contains(&symbol) {
                return Err(ModelLoadError::Grades(format!("'{raw}' listed twice")));
            }
            symbols.push(symbol);
        }
        if let Some(class) = self
            .model
            .classes
            .iter()
            .find(|class| usize::try_from(**class).map_or(true, |index| index >= symbols.len()))
        {
            return Err(ModelLoadError::Grades(format!(
                "forest class {class} has no grade among {} classes",
                symbols.len()
            )));
        }
        Ok(symbols)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = include_str!("../../../../models/restaurant_grade_model.json");

    #[test]
    fn sample_artifact_parses() {
        let bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        let columns = bundle.feature_columns().expect("columns resolve");
        assert_eq!(columns, FeatureColumn::ordered().to_vec());
        assert_eq!(bundle.categorical_encoders().expect("encoders").len(), 3);
        assert_eq!(bundle.grade_symbols().expect("grades").len(), 6);
    }

    #[test]
    fn rejects_unknown_and_missing_columns() {
        let mut bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        bundle.features[6] = "BORO".to_string();
        let err = bundle.feature_columns().expect_err("unknown column");
        assert!(err.to_string().contains("BORO"));

        bundle.features.pop();
        let err = bundle.feature_columns().expect_err("missing column");
        assert!(err.to_string().contains("inspection_day_of_week"));
    }

    #[test]
    fn rejects_duplicate_columns() {
        let mut bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        bundle.features[1] = "SCORE".to_string();
        let err = bundle.feature_columns().expect_err("duplicate column");
        assert!(err.to_string().contains("listed twice"));
    }

    #[test]
    fn rejects_scaler_length_mismatch() {
        let mut bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        bundle.scaler = StandardScaler::new(vec![0.0; 6], vec![1.0; 6]).expect("scaler");
        let err = bundle.feature_columns().expect_err("scaler mismatch");
        assert!(err.to_string().contains("scaler was fitted on 6"));
    }

    #[test]
    fn rejects_foreign_grade_symbols() {
        let mut bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        bundle.grade_encoder.classes.push("Q".to_string());
        assert!(matches!(
            bundle.grade_symbols(),
            Err(ModelLoadError::Grades(_))
        ));
    }

    #[test]
    fn rejects_forest_classes_outside_grade_encoder() {
        let mut bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        for class in &mut bundle.model.classes {
            *class += 10;
        }
        let err = crate::prediction::GradePredictor::from_bundle(bundle)
            .expect_err("forest classes cannot be decoded");
        assert!(matches!(err, ModelLoadError::Grades(_)));
        assert!(err.to_string().contains("forest class 10"));
    }

    #[test]
    fn rejects_negative_forest_class() {
        let mut bundle = ModelBundle::from_json(BUNDLE).expect("sample artifact parses");
        bundle.model.classes[0] = -1;
        assert!(matches!(
            bundle.grade_symbols(),
            Err(ModelLoadError::Grades(_))
        ));
    }

    #[test]
    fn malformed_json_is_reported() {
        assert!(matches!(
            ModelBundle::from_json("{\"model\": []}"),
            Err(ModelLoadError::Json(_))
        ));
    }

    #[test]
    fn missing_file_keeps_path() {
        let err = ModelBundle::from_path("does/not/exist.json").expect_err("missing file");
        assert!(err.to_string().contains("does/not/exist.json"));
    }
}
