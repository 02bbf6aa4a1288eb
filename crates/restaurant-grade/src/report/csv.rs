use super::{ReportError, ResultRecord};
use std::io::Read;

/// One header row and one data row, UTF-8.
pub fn render_csv(record: &ResultRecord) -> Result<Vec<u8>, ReportError> {
    let fields = record.csv_fields();
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(fields.iter().map(|field| field.label))?;
    writer.write_record(fields.iter().map(|field| field.value.as_str()))?;
    writer
        .into_inner()
        .map_err(|err| ReportError::Io(err.into_error()))
}

/// Reads a single-row report back into `(column, value)` pairs.
pub fn read_csv_fields<R: Read>(reader: R) -> Result<Vec<(String, String)>, ReportError> {
    let mut reader = csv::Reader::from_reader(reader);
    let headers = reader.headers()?.clone();
    let mut fields = Vec::new();
    if let Some(row) = reader.records().next() {
        let row = row?;
        fields.extend(
            headers
                .iter()
                .zip(row.iter())
                .map(|(header, value)| (header.to_string(), value.to_string())),
        );
    }
    Ok(fields)
}
