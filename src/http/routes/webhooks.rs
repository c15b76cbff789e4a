use crate::domain::error::DomainError;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiJson, ApiResult};
use crate::http::AppState;
use axum::body::Bytes;
use axum::extract::{FromRequest, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::HeaderMap;
use axum::response::IntoResponse;
use axum::routing::post;
use axum::{Form, Json, Router};
use serde_json::Value;
use std::collections::HashMap;

pub const LINEAR_SIGNATURE_HEADER: &str = "linear-signature";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/webhooks/linear", post(linear))
        .route("/webhooks/slack", post(slack))
}

async fn linear(
    State(gateway): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> ApiResult<impl IntoResponse> {
    let signature = headers
        .get(LINEAR_SIGNATURE_HEADER)
        .and_then(|v| v.to_str().ok());
    Ok(Envelope(gateway.webhooks().linear(&body, signature).await?))
}

/// Slack posts events as JSON and slash commands as form fields.
async fn slack(State(gateway): State<AppState>, request: Request) -> ApiResult<Json<Value>> {
    let is_form = request
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.starts_with("application/x-www-form-urlencoded"));

    let body = if is_form {
        let Form(fields) = Form::<HashMap<String, String>>::from_request(request, &())
            .await
            .map_err(|e| DomainError::InvalidInput(e.body_text()))?;
        let fields = fields.into_iter().map(|(k, v)| (k, Value::String(v)));
        Value::Object(fields.collect())
    } else {
        let ApiJson(value) = ApiJson::<Value>::from_request(request, &()).await?;
        value
    };
    Ok(Json(gateway.webhooks().slack(&body).await))
}
