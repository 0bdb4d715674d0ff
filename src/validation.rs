use crate::models::{AmountInput, IdInput};
use chrono::NaiveDate;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Missing required parameter: {0}")]
    MissingParameter(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Trimmed, non-empty text or a missing-parameter error naming the field.
pub fn require_text(field: &str, value: Option<&str>) -> Result<String, ValidationError> {
    match value.map(str::trim) {
        Some(text) if !text.is_empty() => Ok(text.to_string()),
        _ => Err(ValidationError::MissingParameter(field.to_string())),
    }
}

pub fn validate_id(raw: &str) -> Result<i64, ValidationError> {
    match raw.trim().parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(ValidationError::InvalidParameter(format!(
            "id must be a positive integer, got '{}'",
            raw
        ))),
    }
}

pub fn validate_id_input(value: Option<&IdInput>) -> Result<i64, ValidationError> {
    match value {
        None => Err(ValidationError::MissingParameter("id".to_string())),
        Some(IdInput::Number(id)) => validate_id(&id.to_string()),
        Some(IdInput::Text(raw)) if raw.trim().is_empty() => {
            Err(ValidationError::MissingParameter("id".to_string()))
        }
        Some(IdInput::Text(raw)) => validate_id(raw),
    }
}

pub fn validate_amount(value: Option<&AmountInput>) -> Result<f64, ValidationError> {
    let amount = match value {
        None => return Err(ValidationError::MissingParameter("amount".to_string())),
        Some(AmountInput::Number(n)) => *n,
        Some(AmountInput::Text(raw)) => {
            let raw = raw.trim();
            if raw.is_empty() {
                return Err(ValidationError::MissingParameter("amount".to_string()));
            }
            raw.parse::<f64>().map_err(|_| {
                ValidationError::InvalidParameter(format!("amount is not a number: '{}'", raw))
            })?
        }
    };

    if !amount.is_finite() {
        return Err(ValidationError::InvalidParameter(
            "amount must be a finite number".to_string(),
        ));
    }

    Ok(amount)
}

/// Dates are calendar dates in `YYYY-MM-DD`; the string itself is kept as the stored value.
pub fn validate_date(value: Option<&str>) -> Result<String, ValidationError> {
    let date = require_text("date", value)?;
    NaiveDate::parse_from_str(&date, "%Y-%m-%d").map_err(|_| {
        ValidationError::InvalidParameter(format!("date must be YYYY-MM-DD, got '{}'", date))
    })?;
    Ok(date)
}

pub fn validate_tags(tags: Vec<String>) -> Vec<String> {
    tags.into_iter()
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
        .collect()
}
