//! Parsing of raw form input at the update boundary.
//!
//! Every parser returns `CoreError::InvalidInput` for empty, non-numeric or
//! out-of-range text. The facade turns those errors into no-ops.

use crate::errors::CoreError;

/// Parse a strictly positive amount ("12.50", " 3000 ").
pub fn parse_amount(raw: &str) -> Result<f64, CoreError> {
    let value = parse_number(raw)?;
    if value <= 0.0 {
        return Err(CoreError::InvalidInput(format!(
            "amount must be positive, got '{}'",
            raw.trim()
        )));
    }
    Ok(value)
}

/// Parse an amount that may be zero; empty input yields `None`.
pub fn parse_optional_non_negative(raw: &str) -> Result<Option<f64>, CoreError> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    let value = parse_number(raw)?;
    if value < 0.0 {
        return Err(CoreError::InvalidInput(format!(
            "value must not be negative, got '{}'",
            raw.trim()
        )));
    }
    Ok(Some(value))
}

/// Parse a whole number of months; empty input yields `None`.
pub fn parse_optional_months(raw: &str) -> Result<Option<u32>, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    let months: u32 = trimmed.parse().map_err(|_| {
        CoreError::InvalidInput(format!("months must be a whole number, got '{trimmed}'"))
    })?;
    if months == 0 {
        return Err(CoreError::InvalidInput("months must be at least 1".into()));
    }
    Ok(Some(months))
}

/// Require a non-blank name.
pub fn require_name(raw: &str) -> Result<String, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput("name must not be empty".into()));
    }
    Ok(trimmed.to_string())
}

/// Turn blank free text into `None`.
pub fn optional_text(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn parse_number(raw: &str) -> Result<f64, CoreError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(CoreError::InvalidInput("value is empty".into()));
    }
    match trimmed.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoreError::InvalidInput(format!(
            "'{trimmed}' is not a number"
        ))),
    }
}
