mod batch;
mod bundle;
mod domain;
mod encoder;
mod features;
mod forest;
mod predictor;
pub mod router;
mod scaler;
mod service;

pub use batch::{write_batch_csv, BatchError, BatchPrediction};
pub use bundle::{GradeEncoderArtifact, ModelBundle, ModelLoadError};
pub use domain::{
    CategoricalField, EncodedRecord, FeatureColumn, GradeSymbol, InspectionRecord,
    PredictionError, ScaledVector,
};
pub use encoder::{EncoderBank, EncoderBankError, Encoding, LabelEncoder};
pub use features::{assemble, InspectionInput};
pub use forest::{
    DecisionForest, DecisionTree, ForestArrays, ForestError, GradeClassifier, TreeArrays,
};
pub use predictor::{GradeDecoder, GradePredictor};
pub use router::prediction_router;
pub use scaler::{ScalerError, StandardScaler};
pub use service::{PredictionOutcome, PredictionRequest, PredictionView};
