use crate::domain::entities::activity::{ActivityEvent, StandupResponse};
use crate::domain::error::DomainError;
use crate::domain::ports::activity_sink::ActivitySink;
use crate::domain::values::dates::timestamp;
use chrono::{DateTime, Utc};
use hmac::{Hmac, Mac};
use serde::Serialize;
use serde_json::{json, Value};
use sha2::Sha256;
use std::sync::Arc;

type HmacSha256 = Hmac<Sha256>;

const COMMENT_PREVIEW_CHARS: usize = 100;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LinearReceipt {
    pub received: bool,
    pub processed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Whether `signature` is the hex HMAC-SHA256 of `body` under `secret`.
pub fn verify_signature(secret: &str, body: &[u8], signature: &str) -> bool {
    let Ok(expected) = hex::decode(signature.trim()) else {
        return false;
    };
    let Ok(mut mac) = HmacSha256::new_from_slice(secret.as_bytes()) else {
        return false;
    };
    mac.update(body);
    mac.verify_slice(&expected).is_ok()
}

/// Truthy text of `obj[key]`, numbers included.
fn text(obj: &Value, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) if n.as_f64() != Some(0.0) => Some(n.to_string()),
        Value::Bool(true) => Some("true".to_string()),
        _ => None,
    }
}

fn text_or_empty(obj: &Value, key: &str) -> String {
    text(obj, key).unwrap_or_default()
}

fn nested_text(obj: &Value, parent: &str, key: &str) -> String {
    obj.get(parent)
        .and_then(|inner| text(inner, key))
        .unwrap_or_default()
}

/// Activity-feed event for a Linear delivery; `None` for types the feed
/// does not track.
pub fn normalize_linear_event(body: &Value, now: DateTime<Utc>) -> Option<ActivityEvent> {
    let action = text_or_empty(body, "action");
    let kind = text_or_empty(body, "type");
    let data = body
        .get("data")
        .filter(|d| d.is_object())
        .cloned()
        .unwrap_or_else(|| json!({}));

    let (event_type, title, summary) = match kind.as_str() {
        "Issue" => issue_event(&action, &data),
        "Comment" => comment_event(&action, &data),
        "Project" => project_event(&action, &data),
        _ => {
            tracing::debug!(event_type = %kind, action = %action, "ignoring Linear webhook");
            return None;
        }
    };

    let occurred_at = text(&data, "updatedAt")
        .or_else(|| text(&data, "createdAt"))
        .unwrap_or_else(|| timestamp(now));
    Some(ActivityEvent {
        source: "linear".to_string(),
        event_type,
        external_id: text_or_empty(&data, "id"),
        title,
        summary,
        payload: data,
        occurred_at,
    })
}

fn issue_event(action: &str, data: &Value) -> (String, String, String) {
    let identifier = text(data, "identifier")
        .or_else(|| text(data, "id"))
        .unwrap_or_default();
    let title = text_or_empty(data, "title");
    let state = nested_text(data, "state", "name");
    let assignee = nested_text(data, "assignee", "name");

    let (event_type, summary) = match action {
        "create" => {
            let assigned = if assignee.is_empty() {
                String::new()
            } else {
                format!(" (assigned to {assignee})")
            };
            let summary = format!("Issue {identifier} created: \"{title}\"{assigned}");
            ("issue_created".to_string(), summary)
        }
        "update" => {
            let moved = if state.is_empty() {
                String::new()
            } else {
                format!(" → {state}")
            };
            let summary = format!("Issue {identifier} updated: \"{title}\"{moved}");
            ("issue_updated".to_string(), summary)
        }
        "remove" => {
            let summary = format!("Issue {identifier} deleted: \"{title}\"");
            ("issue_deleted".to_string(), summary)
        }
        other => {
            let summary = format!("Issue {identifier}: {other}");
            (format!("issue_{other}"), summary)
        }
    };
    (event_type, format!("{identifier} {title}"), summary)
}

fn comment_event(action: &str, data: &Value) -> (String, String, String) {
    let identifier = nested_text(data, "issue", "identifier");
    let user = data
        .get("user")
        .and_then(|u| text(u, "name"))
        .unwrap_or_else(|| "Someone".to_string());
    let preview: String = text_or_empty(data, "body")
        .chars()
        .take(COMMENT_PREVIEW_CHARS)
        .collect();
    let ellipsis = if preview.chars().count() >= COMMENT_PREVIEW_CHARS {
        "..."
    } else {
        ""
    };

    let event_type = match action {
        "create" => "comment_added".to_string(),
        other => format!("comment_{other}"),
    };
    (
        event_type,
        format!("Comment on {identifier}"),
        format!("{user} commented on {identifier}: \"{preview}{ellipsis}\""),
    )
}

fn project_event(action: &str, data: &Value) -> (String, String, String) {
    let name = text_or_empty(data, "name");
    let event_type = match action {
        "create" => "project_created".to_string(),
        other => format!("project_{other}"),
    };
    let summary = format!("Project \"{name}\" {action}d");
    (event_type, name, summary)
}

/// Standup answer carried by a Slack delivery, if any.
pub fn slack_standup(body: &Value) -> Option<StandupResponse> {
    if text(body, "type").as_deref() == Some("event_callback") {
        if let Some(event) = body.get("event").filter(|e| e.is_object()) {
            let is_dm = text(event, "type").as_deref() == Some("message")
                && text(event, "bot_id").is_none()
                && text(event, "channel_type").as_deref() == Some("im");
            if is_dm {
                return Some(StandupResponse {
                    respondent: text_or_empty(event, "user"),
                    respondent_name: None,
                    raw_text: text_or_empty(event, "text"),
                    source: "slack".to_string(),
                    slack_ts: Some(text_or_empty(event, "ts")),
                    slack_channel: Some(text_or_empty(event, "channel")),
                });
            }
        }
    }

    if text(body, "command").as_deref() == Some("/standup") {
        return Some(StandupResponse {
            respondent: text_or_empty(body, "user_id"),
            respondent_name: Some(text_or_empty(body, "user_name")),
            raw_text: text_or_empty(body, "text"),
            source: "slack".to_string(),
            slack_ts: None,
            slack_channel: Some(text_or_empty(body, "channel_id")),
        });
    }
    None
}

pub struct WebhooksUseCase {
    sink: Arc<dyn ActivitySink>,
    linear_secret: Option<String>,
}

impl WebhooksUseCase {
    pub fn new(sink: Arc<dyn ActivitySink>, linear_secret: Option<String>) -> Self {
        Self { sink, linear_secret }
    }

    /// Verify, normalise and forward a Linear delivery. Forwarding failures
    /// are logged only.
    pub async fn linear(
        &self,
        raw_body: &[u8],
        signature: Option<&str>,
    ) -> Result<LinearReceipt, DomainError> {
        match self.linear_secret.as_deref() {
            Some(secret) => {
                if !signature.is_some_and(|sig| verify_signature(secret, raw_body, sig)) {
                    tracing::warn!("rejected Linear webhook with a bad signature");
                    let message = "Invalid Linear webhook signature".to_string();
                    return Err(DomainError::Unauthorized(message));
                }
            }
            None => {
                tracing::warn!(
                    "LINEAR_WEBHOOK_SIGNING_SECRET is not configured, skipping signature verification"
                )
            }
        }

        let body: Value = serde_json::from_slice(raw_body)
            .map_err(|e| DomainError::InvalidInput(format!("Invalid webhook payload: {e}")))?;
        tracing::info!(
            event_type = ?body.get("type"),
            action = ?body.get("action"),
            "received Linear webhook"
        );

        let Some(event) = normalize_linear_event(&body, Utc::now()) else {
            return Ok(LinearReceipt {
                received: true,
                processed: false,
                event_type: None,
                reason: Some("unsupported event type".to_string()),
            });
        };

        if let Err(e) = self.sink.forward_activity(&event).await {
            tracing::error!(
                error = %e,
                event_type = %event.event_type,
                "failed to forward activity event"
            );
        }
        Ok(LinearReceipt {
            received: true,
            processed: true,
            event_type: Some(event.event_type),
            reason: None,
        })
    }

    /// Answer a Slack delivery, forwarding standup answers on the way.
    pub async fn slack(&self, body: &Value) -> Value {
        if text(body, "type").as_deref() == Some("url_verification") {
            let challenge = body.get("challenge").cloned().unwrap_or(Value::Null);
            return json!({ "challenge": challenge });
        }
        tracing::info!(
            event_type = ?body.get("type"),
            command = ?body.get("command"),
            "received Slack webhook"
        );

        if let Some(response) = slack_standup(body) {
            if let Err(e) = self.sink.forward_standup(&response).await {
                tracing::error!(
                    error = %e,
                    respondent = %response.respondent,
                    "failed to forward standup response"
                );
            }
        }
        json!({ "ok": true })
    }
}
