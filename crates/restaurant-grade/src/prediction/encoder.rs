use super::domain::{CategoricalField, EncodedRecord, InspectionRecord};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::debug;

/// Fitted label encoder: a category's code is its index in `classes`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LabelEncoder {
    classes: Vec<String>,
}

impl LabelEncoder {
    pub fn new(classes: Vec<String>) -> Self {
        Self { classes }
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn code(&self, value: &str) -> Option<usize> {
        self.classes.iter().position(|class| class == value)
    }

    pub fn class(&self, code: usize) -> Option<&str> {
        self.classes.get(code).map(String::as_str)
    }

    /// Substitute used for categories absent at fit time.
    pub fn fallback(&self) -> Option<&str> {
        self.class(0)
    }
}

/// Outcome of encoding one categorical value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Encoding {
    pub code: usize,
    pub substituted: bool,
}

/// One fitted encoder per categorical field. Every field is guaranteed a
/// non-empty vocabulary, so encoding never fails.
#[derive(Debug, Clone)]
pub struct EncoderBank {
    encoders: HashMap<CategoricalField, LabelEncoder>,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncoderBankError {
    #[error("no label encoder for column '{0}'")]
    Missing(&'static str),
    #[error("label encoder for column '{0}' has no classes")]
    Empty(&'static str),
    #[error("label encoder for column '{column}' lists '{class}' more than once")]
    Duplicate { column: &'static str, class: String },
}

impl EncoderBank {
    pub fn new(
        mut encoders: HashMap<CategoricalField, LabelEncoder>,
    ) -> Result<Self, EncoderBankError> {
        let mut checked = HashMap::new();
        for field in CategoricalField::ordered() {
            let encoder = encoders
                .remove(&field)
                .ok_or(EncoderBankError::Missing(field.column()))?;
            if encoder.classes.is_empty() {
                return Err(EncoderBankError::Empty(field.column()));
            }
            if let Some(duplicate) = first_duplicate(&encoder.classes) {
                return Err(EncoderBankError::Duplicate {
                    column: field.column(),
                    class: duplicate.to_string(),
                });
            }
            checked.insert(field, encoder);
        }
        Ok(Self { encoders: checked })
    }

    fn encoder(&self, field: CategoricalField) -> &LabelEncoder {
        // `new` inserts every field.
        &self.encoders[&field]
    }

    pub fn vocabulary(&self, field: CategoricalField) -> &[String] {
        self.encoder(field).classes()
    }

    pub fn is_known(&self, field: CategoricalField, raw_value: &str) -> bool {
        self.encoder(field).code(raw_value).is_some()
    }

    /// Encodes `raw_value`, substituting the field's first class when the
    /// value was never seen at fit time.
    pub fn encode(&self, field: CategoricalField, raw_value: &str) -> Encoding {
        let encoder = self.encoder(field);
        match encoder.code(raw_value) {
            Some(code) => Encoding {
                code,
                substituted: false,
            },
            None => {
                debug!(
                    column = field.column(),
                    value = raw_value,
                    fallback = encoder.fallback().unwrap_or_default(),
                    "unseen category replaced by fallback class"
                );
                Encoding {
                    code: 0,
                    substituted: true,
                }
            }
        }
    }

    pub fn decode(&self, field: CategoricalField, code: usize) -> Option<&str> {
        self.encoder(field).class(code)
    }

    pub fn encode_record(&self, record: &InspectionRecord) -> EncodedRecord {
        EncodedRecord {
            inspection_type: self
                .encode(CategoricalField::InspectionType, record.inspection_type())
                .code,
            critical_flag: self
                .encode(CategoricalField::CriticalFlag, record.critical_flag())
                .code,
            violation_code: self
                .encode(CategoricalField::ViolationCode, record.violation_code())
                .code,
            score: record.score(),
            inspection_year: record.inspection_year(),
            inspection_month: record.inspection_month(),
            inspection_day_of_week: record.inspection_day_of_week(),
        }
    }
}

fn first_duplicate(classes: &[String]) -> Option<&str> {
    classes
        .iter()
        .enumerate()
        .find(|(index, class)| classes[..*index].contains(class))
        .map(|(_, class)| class.as_str())
}
