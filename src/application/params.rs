//! Validation of raw query-string values shared by the REST areas.
//!
//! Every helper treats an empty string the same as an absent value and
//! reports failures with the message callers see.

use crate::domain::error::DomainError;
use crate::domain::values::numeric::{coerce_number, parse_int};
use serde_json::Value;

pub fn present(raw: Option<&str>) -> Option<&str> {
    raw.filter(|v| !v.is_empty())
}

/// `"<name> is required."` unless the value is present.
pub fn required<'a>(raw: Option<&'a str>, name: &str) -> Result<&'a str, DomainError> {
    present(raw).ok_or_else(|| DomainError::InvalidInput(format!("{name} is required.")))
}

/// A present symbol, upper-cased.
pub fn symbol(raw: Option<&str>) -> Result<String, DomainError> {
    required(raw, "symbol").map(str::to_uppercase)
}

fn integral(raw: &str) -> Option<f64> {
    let n = coerce_number(&Value::String(raw.to_string()));
    (n.is_finite() && n.fract() == 0.0).then_some(n)
}

/// Optional integer greater than zero.
pub fn positive_int(raw: Option<&str>, name: &str) -> Result<Option<u32>, DomainError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    integral(raw)
        .filter(|n| *n > 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| Some(n as u32))
        .ok_or_else(|| DomainError::InvalidInput(format!("{name} must be a positive integer.")))
}

/// Optional integer of zero or more.
pub fn non_negative_int(raw: Option<&str>, name: &str) -> Result<Option<u32>, DomainError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    integral(raw)
        .filter(|n| *n >= 0.0 && *n <= f64::from(u32::MAX))
        .map(|n| Some(n as u32))
        .ok_or_else(|| DomainError::InvalidInput(format!("{name} must be a non-negative integer.")))
}

/// Optional integer bounded to `min..=max`.
pub fn bounded_int(
    raw: Option<&str>,
    name: &str,
    min: u32,
    max: u32,
) -> Result<Option<u32>, DomainError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    integral(raw)
        .filter(|n| *n >= f64::from(min) && *n <= f64::from(max))
        .map(|n| Some(n as u32))
        .ok_or_else(|| {
            DomainError::InvalidInput(format!("{name} must be between {min} and {max}."))
        })
}

/// Optional finite number greater than zero.
pub fn positive_number(raw: Option<&str>, name: &str) -> Result<Option<f64>, DomainError> {
    let Some(raw) = present(raw) else {
        return Ok(None);
    };
    let n = coerce_number(&Value::String(raw.to_string()));
    if n.is_finite() && n > 0.0 {
        Ok(Some(n))
    } else {
        Err(DomainError::InvalidInput(format!("{name} must be a positive number.")))
    }
}

pub fn positive_amount(raw: &str) -> Result<f64, DomainError> {
    positive_number(Some(raw), "amount")?.ok_or_else(|| "amount is required.".into())
}

/// Integer prefix of the value; anything unparsable counts as absent.
pub fn loose_int(raw: Option<&str>) -> Option<i64> {
    present(raw).and_then(|r| parse_int(&Value::String(r.to_string())))
}

/// Comma-separated symbols, trimmed and upper-cased, empties dropped.
pub fn symbol_list(raw: Option<&str>) -> Result<Vec<String>, DomainError> {
    let raw = required(raw, "symbols")?;
    let symbols: Vec<String> = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_uppercase)
        .collect();
    if symbols.is_empty() {
        return Err("symbols must include at least one symbol.".into());
    }
    Ok(symbols)
}
