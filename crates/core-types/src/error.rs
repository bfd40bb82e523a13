use chrono::NaiveDate;
use thiserror::Error;

/// Input validation failures. Each variant names the form field at fault so the
/// web layer can report it back to the client.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    #[error("invalid {field} value: {value}")]
    InvalidValue { field: &'static str, value: String },

    #[error("invalid {field}: expected YYYY-MM-DD, got {value:?}")]
    InvalidDate { field: &'static str, value: String },

    #[error("{0} is required")]
    MissingField(&'static str),
}

impl CoreError {
    /// The name of the offending form field.
    pub fn field(&self) -> &'static str {
        match *self {
            CoreError::InvalidValue { field, .. } | CoreError::InvalidDate { field, .. } => field,
            CoreError::MissingField(field) => field,
        }
    }
}

/// Parses a `YYYY-MM-DD` date as submitted by an HTML date input.
pub fn parse_form_date(field: &'static str, value: &str) -> Result<NaiveDate, CoreError> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").map_err(|_| CoreError::InvalidDate {
        field,
        value: value.to_string(),
    })
}
