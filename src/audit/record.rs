//! Audit row shape and CSV encoding.

use std::borrow::Cow;

use chrono::{DateTime, Local};
use uuid::Uuid;

/// Column order of a partition file.
///
/// Downstream analysis tooling reads this layout positionally by column
/// name; any change requires a version marker.
pub const CSV_HEADER: &str = "timestamp,request_id,endpoint,method,input_data,prediction,probability,features_used,status_code,response_time_ms,error_message";

/// One handled request outcome.
///
/// `prediction`, `probability` and `features_used` are populated for
/// scoring calls only; the generic middleware path leaves them empty.
#[derive(Debug, Clone)]
pub struct AuditRecord {
    pub request_id: Uuid,
    pub endpoint: String,
    pub method: String,
    /// Normalized JSON string of the captured input, or empty.
    pub input_data: String,
    pub prediction: Option<i64>,
    pub probability: Option<f64>,
    pub features_used: Option<usize>,
    pub status_code: u16,
    pub response_time_ms: f64,
    pub error_message: Option<String>,
}

impl AuditRecord {
    /// Encode as one CSV row, stamped with the write-time `timestamp`.
    pub fn to_csv_row(&self, timestamp: DateTime<Local>) -> String {
        let fields = [
            timestamp.format("%Y-%m-%dT%H:%M:%S%.3f").to_string(),
            self.request_id.to_string(),
            self.endpoint.clone(),
            self.method.clone(),
            self.input_data.clone(),
            self.prediction.map(|p| p.to_string()).unwrap_or_default(),
            self.probability.map(|p| p.to_string()).unwrap_or_default(),
            self.features_used.map(|n| n.to_string()).unwrap_or_default(),
            self.status_code.to_string(),
            format!("{:.2}", self.response_time_ms),
            self.error_message.clone().unwrap_or_default(),
        ];
        fields
            .iter()
            .map(|field| csv_field(field))
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Quote a field when it contains the delimiter, quotes or line breaks.
fn csv_field(field: &str) -> Cow<'_, str> {
    if field.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", field.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AuditRecord {
        AuditRecord {
            request_id: Uuid::nil(),
            endpoint: "/predict".to_string(),
            method: "POST".to_string(),
            input_data: String::new(),
            prediction: None,
            probability: None,
            features_used: None,
            status_code: 200,
            response_time_ms: 1.5,
            error_message: None,
        }
    }

    #[test]
    fn test_row_has_fixed_column_count() {
        let row = sample().to_csv_row(Local::now());
        assert_eq!(row.split(',').count(), CSV_HEADER.split(',').count());
    }

    #[test]
    fn test_optional_fields_serialize_as_empty_columns() {
        let row = sample().to_csv_row(Local::now());
        // prediction, probability and features_used sit between method and
        // status_code and must stay empty when unset.
        assert!(row.contains(",POST,,,,,200,"));
    }

    #[test]
    fn test_elapsed_is_formatted_with_two_decimals() {
        let row = sample().to_csv_row(Local::now());
        assert!(row.ends_with(",1.50,"));
    }

    #[test]
    fn test_payload_with_delimiters_is_quoted() {
        let mut record = sample();
        record.input_data = r#"{"continent":"EUROPE","deaths":2}"#.to_string();
        record.error_message = Some("bad \"input\"".to_string());
        let row = record.to_csv_row(Local::now());
        assert!(row.contains(r#""{""continent"":""EUROPE"",""deaths"":2}""#));
        assert!(row.ends_with(r#""bad ""input""""#));
    }
}
