use serde::Serialize;
use serde_json::Value;

/// Provider event normalised for the platform activity feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ActivityEvent {
    pub source: String,
    pub event_type: String,
    pub external_id: String,
    pub title: String,
    pub summary: String,
    pub payload: Value,
    pub occurred_at: String,
}

/// A standup answer captured from chat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StandupResponse {
    pub respondent: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub respondent_name: Option<String>,
    pub raw_text: String,
    pub source: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_ts: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slack_channel: Option<String>,
}
