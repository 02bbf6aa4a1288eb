//! CSV and PDF downloads for a finished prediction.

mod csv;
mod pdf;
mod record;

pub use self::csv::{read_csv_fields, render_csv};
pub use self::pdf::render_pdf;
pub use self::record::{ReportField, ResultRecord, RoleContext};

/// Failure of a single download. The prediction itself is unaffected.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("could not write CSV report: {0}")]
    Csv(#[from] ::csv::Error),
    #[error("could not flush CSV report: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not render PDF report: {0}")]
    Pdf(String),
}

impl ResultRecord {
    pub fn to_csv(&self) -> Result<Vec<u8>, ReportError> {
        render_csv(self)
    }

    pub fn to_pdf(&self) -> Result<Vec<u8>, ReportError> {
        let fields: Vec<(String, String)> = self
            .pdf_fields()
            .into_iter()
            .map(|field| (field.label.to_string(), field.value))
            .collect();
        render_pdf(self.title(), &fields, Some(self.message))
    }
}
