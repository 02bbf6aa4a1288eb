use super::bundle::{ModelBundle, ModelLoadError};
use super::domain::{
    CategoricalField, EncodedRecord, FeatureColumn, GradeSymbol, InspectionRecord,
    PredictionError, ScaledVector,
};
use super::encoder::EncoderBank;
use super::forest::{DecisionForest, GradeClassifier};
use super::scaler::StandardScaler;
use std::path::Path;
use tracing::{debug, info};

/// Inverse of the grade label encoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GradeDecoder {
    classes: Vec<GradeSymbol>,
}

impl GradeDecoder {
    pub fn new(classes: Vec<GradeSymbol>) -> Self {
        Self { classes }
    }

    pub fn decode(&self, class: i64) -> Result<GradeSymbol, PredictionError> {
        usize::try_from(class)
            .ok()
            .and_then(|index| self.classes.get(index).copied())
            .ok_or(PredictionError::UnknownGradeClass { class })
    }

    pub fn classes(&self) -> &[GradeSymbol] {
        &self.classes
    }
}

/// Immutable inference context built once from the model artifact and shared
/// for the lifetime of the process.
pub struct GradePredictor {
    columns: Vec<FeatureColumn>,
    encoders: EncoderBank,
    scaler: StandardScaler,
    classifier: Box<dyn GradeClassifier>,
    decoder: GradeDecoder,
}

impl std::fmt::Debug for GradePredictor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GradePredictor")
            .field("columns", &self.columns)
            .field("decoder", &self.decoder)
            .finish_non_exhaustive()
    }
}

impl GradePredictor {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ModelLoadError> {
        let path = path.as_ref();
        let predictor = Self::from_bundle(ModelBundle::from_path(path)?)?;
        info!(path = %path.display(), "model artifact loaded");
        Ok(predictor)
    }

    pub fn from_bundle(bundle: ModelBundle) -> Result<Self, ModelLoadError> {
        let columns = bundle.feature_columns()?;
        let encoders = EncoderBank::new(bundle.categorical_encoders()?)?;
        let decoder = GradeDecoder::new(bundle.grade_symbols()?);
        let forest = DecisionForest::from_arrays(&bundle.model, columns.len())?;
        debug!(
            trees = forest.tree_count(),
            classes = forest.classes().len(),
            "decision forest ready"
        );

        Ok(Self {
            columns,
            encoders,
            scaler: bundle.scaler,
            classifier: Box::new(forest),
            decoder,
        })
    }

    /// Replaces the fitted forest, keeping every transform around it.
    pub fn with_classifier<C>(mut self, classifier: C) -> Self
    where
        C: GradeClassifier + 'static,
    {
        self.classifier = Box::new(classifier);
        self
    }

    pub fn columns(&self) -> &[FeatureColumn] {
        &self.columns
    }

    pub fn encoders(&self) -> &EncoderBank {
        &self.encoders
    }

    pub fn vocabulary(&self, field: CategoricalField) -> &[String] {
        self.encoders.vocabulary(field)
    }

    pub fn grade_classes(&self) -> &[GradeSymbol] {
        self.decoder.classes()
    }

    pub fn encode(&self, record: &InspectionRecord) -> EncodedRecord {
        self.encoders.encode_record(record)
    }

    pub fn scale(&self, encoded: &EncodedRecord) -> ScaledVector {
        self.scaler.transform(encoded, &self.columns)
    }

    pub fn classify(&self, scaled: &ScaledVector) -> i64 {
        self.classifier.predict_class(scaled)
    }

    pub fn decode(&self, class: i64) -> Result<GradeSymbol, PredictionError> {
        self.decoder.decode(class)
    }

    /// Encode, scale, classify and decode one record.
    pub fn predict(&self, record: &InspectionRecord) -> Result<GradeSymbol, PredictionError> {
        let encoded = self.encode(record);
        let scaled = self.scale(&encoded);
        let class = self.classify(&scaled);
        let grade = self.decode(class)?;
        debug!(
            score = record.score(),
            class,
            grade = grade.as_str(),
            "grade predicted"
        );
        Ok(grade)
    }
}
