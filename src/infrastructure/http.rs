//! Helpers shared by every outbound client.

use crate::domain::error::DomainError;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

pub const USER_AGENT: &str = "integration-gateway/0.1";

pub fn build_client(timeout: Duration) -> Result<Client, DomainError> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(timeout)
        .build()
        .map_err(client_build_error)
}

pub fn client_build_error(e: reqwest::Error) -> DomainError {
    tracing::error!(error = %e, "failed to build HTTP client");
    DomainError::Internal(format!("Failed to build HTTP client: {e}"))
}

/// Map a reqwest failure, while sending or while reading the body, to the
/// provider-labelled error callers see.
pub fn transport_error(label: &str, e: reqwest::Error) -> DomainError {
    if e.is_timeout() {
        tracing::error!(provider = label, "provider request timed out");
        DomainError::Unavailable(format!("{label} request timed out."))
    } else {
        tracing::error!(provider = label, error = %e.without_url(), "provider transport failure");
        DomainError::Gateway(format!("{label} request failed."))
    }
}

/// Parse a response body: empty is `null`, JSON is parsed, anything else is
/// kept as a JSON string.
pub fn decode_body(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::Null;
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}

/// Text of a value when it is present and not blank/false/zero.
pub fn truthy_text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

/// Non-empty string field of an object.
pub fn str_field<'a>(value: &'a Value, key: &str) -> Option<&'a str> {
    value
        .get(key)
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
}

/// First error message a provider put in its body, else the raw text.
pub fn payload_message(payload: &Value, raw: &str) -> Option<String> {
    truthy_text(payload.get("message"))
        .or_else(|| truthy_text(payload.get("error")))
        .or_else(|| (!raw.is_empty()).then(|| raw.to_string()))
}
