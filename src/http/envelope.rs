use crate::domain::error::DomainError;
use crate::http::error::ApiError;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};

/// Success answer: `{success: true, message: "Success", data}`.
#[derive(Debug)]
pub struct Envelope<T>(pub T);

/// Wrap `value` unless it already carries `success` and `message`.
pub fn wrap(value: Value) -> Value {
    let already_wrapped = value
        .as_object()
        .is_some_and(|obj| obj.contains_key("success") && obj.contains_key("message"));
    if already_wrapped {
        value
    } else {
        json!({ "success": true, "message": "Success", "data": value })
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        match serde_json::to_value(&self.0) {
            Ok(value) => Json(wrap(value)).into_response(),
            Err(e) => {
                let err = DomainError::Internal(format!("Failed to encode response: {e}"));
                ApiError(err).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap() {
        assert_eq!(
            wrap(json!([1, 2])),
            json!({ "success": true, "message": "Success", "data": [1, 2] })
        );
        let listed = json!({ "success": true, "message": "Success", "data": [] });
        assert_eq!(wrap(listed.clone()), listed);
        assert_eq!(
            wrap(json!({ "success": true }))["data"],
            json!({ "success": true })
        );
        assert_eq!(wrap(Value::Null)["data"], Value::Null);
    }
}
