// Validation utilities
// Author: Gabriel Demetrios Lafis

use std::sync::LazyLock;

use regex::Regex;
use thiserror::Error;

const DATE_PATTERN: &str = r"^(202[0-9])-(0[1-9]|1[0-2])-(0[1-9]|[12][0-9]|3[01])$";

/// Rejected query argument
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("date '{value}' is not in YYYY-MM-DD format")]
    DateFormat { value: String },
}

static DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(DATE_PATTERN).expect("Invalid YYYY-MM-DD regex"));

/// Validate a zero-padded `YYYY-MM-DD` date in the 2020s
pub fn validate_date(value: &str) -> Result<(), ValidationError> {
    if DATE_RE.is_match(value) {
        Ok(())
    } else {
        Err(ValidationError::DateFormat {
            value: value.to_string(),
        })
    }
}
