use crate::config::GmailConfig;
use crate::domain::entities::email::{EmailMessage, EmailThread, OutgoingEmail};
use crate::domain::error::DomainError;
use crate::domain::ports::communication::CommunicationProvider;
use crate::infrastructure::http::{build_client, decode_body, transport_error};
use async_trait::async_trait;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

/// Decode a Gmail `body.data` field (base64url, padding optional).
fn decode_part(data: &str) -> Option<String> {
    URL_SAFE_NO_PAD
        .decode(data.trim_end_matches('='))
        .ok()
        .map(|bytes| String::from_utf8_lossy(&bytes).into_owned())
}

fn part_data(part: &Value) -> Option<&str> {
    part.pointer("/body/data")
        .and_then(Value::as_str)
        .filter(|d| !d.is_empty())
}

/// Message text: the payload body, else the first plain part, else the
/// first HTML part, else whatever a nested multipart yields.
pub fn extract_body(payload: Option<&Value>) -> String {
    let Some(payload) = payload else {
        return String::new();
    };
    if let Some(data) = part_data(payload) {
        return decode_part(data).unwrap_or_default();
    }

    let parts: &[Value] = payload
        .get("parts")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    for mime in ["text/plain", "text/html"] {
        let found = parts.iter().find_map(|p| {
            (p.get("mimeType").and_then(Value::as_str) == Some(mime))
                .then(|| part_data(p))
                .flatten()
        });
        if let Some(data) = found {
            return decode_part(data).unwrap_or_default();
        }
    }
    parts
        .iter()
        .filter(|p| p.get("parts").is_some_and(Value::is_array))
        .map(|p| extract_body(Some(p)))
        .find(|body| !body.is_empty())
        .unwrap_or_default()
}

pub fn parse_message(msg: &Value) -> EmailMessage {
    let headers: &[Value] = msg
        .pointer("/payload/headers")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    let header = |name: &str| {
        headers
            .iter()
            .find(|h| {
                h.get("name")
                    .and_then(Value::as_str)
                    .is_some_and(|n| n.eq_ignore_ascii_case(name))
            })
            .and_then(|h| h.get("value").and_then(Value::as_str))
            .unwrap_or_default()
            .to_string()
    };

    EmailMessage {
        id: msg.get("id").cloned().unwrap_or(Value::Null),
        thread_id: msg.get("threadId").cloned().unwrap_or(Value::Null),
        label_ids: msg
            .get("labelIds")
            .and_then(Value::as_array)
            .map(|ids| {
                ids.iter()
                    .filter_map(|v| v.as_str().map(str::to_string))
                    .collect()
            })
            .unwrap_or_default(),
        snippet: msg
            .get("snippet")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        from: header("From"),
        to: header("To"),
        subject: header("Subject"),
        date: header("Date"),
        body: extract_body(msg.get("payload")),
        internal_date: msg.get("internalDate").cloned().unwrap_or(Value::Null),
    }
}

pub fn parse_thread(thread: &Value) -> EmailThread {
    EmailThread {
        id: thread.get("id").cloned().unwrap_or(Value::Null),
        history_id: thread.get("historyId").cloned().unwrap_or(Value::Null),
        messages: thread
            .get("messages")
            .and_then(Value::as_array)
            .map(|msgs| msgs.iter().map(parse_message).collect())
            .unwrap_or_default(),
    }
}

pub struct GmailClient {
    client: Client,
    access_token: Option<String>,
    api_url: String,
}

impl GmailClient {
    pub fn new(config: &GmailConfig, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            access_token: config.access_token.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
        })
    }

    fn token<'a>(&'a self, token: Option<&'a str>) -> Result<&'a str, DomainError> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.access_token.as_deref())
            .ok_or_else(|| "Gmail access token is not available".into())
    }

    async fn get(
        &self,
        token: Option<&str>,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Value, DomainError> {
        let token = self.token(token)?;
        let resp = self
            .client
            .get(format!("{}/{path}", self.api_url))
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error("Gmail", e))?;
        let status = resp.status();
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), path, "Gmail API request failed");
            return Err(DomainError::InvalidInput(format!(
                "Gmail API request failed ({})",
                status.as_u16()
            )));
        }
        let raw = resp.text().await.map_err(|e| transport_error("Gmail", e))?;
        Ok(decode_body(&raw))
    }

    fn listing_query(query: Option<&str>, max_results: u32) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(q) = query.filter(|q| !q.is_empty()) {
            params.push(("q", q.to_string()));
        }
        params.push(("maxResults", max_results.to_string()));
        params
    }
}

#[async_trait]
impl CommunicationProvider for GmailClient {
    async fn list_threads(
        &self,
        token: Option<&str>,
        query: Option<&str>,
        max_results: u32,
    ) -> Result<Value, DomainError> {
        let params = Self::listing_query(query, max_results);
        self.get(token, "threads", &params).await
    }

    async fn get_thread(&self, token: Option<&str>, id: &str) -> Result<EmailThread, DomainError> {
        let full = [("format", "full".to_string())];
        let thread = self.get(token, &format!("threads/{id}"), &full).await?;
        Ok(parse_thread(&thread))
    }

    async fn search_messages(
        &self,
        token: Option<&str>,
        query: &str,
        max_results: u32,
    ) -> Result<Value, DomainError> {
        let params = Self::listing_query(Some(query), max_results);
        self.get(token, "messages", &params).await
    }

    async fn get_message(
        &self,
        token: Option<&str>,
        id: &str,
    ) -> Result<EmailMessage, DomainError> {
        let full = [("format", "full".to_string())];
        let msg = self.get(token, &format!("messages/{id}"), &full).await?;
        Ok(parse_message(&msg))
    }

    async fn send_message(
        &self,
        token: Option<&str>,
        message: &OutgoingEmail,
    ) -> Result<Value, DomainError> {
        let token = self.token(token)?;
        let raw = URL_SAFE_NO_PAD.encode(message.to_mime().as_bytes());
        let resp = self
            .client
            .post(format!("{}/messages/send", self.api_url))
            .bearer_auth(token)
            .json(&json!({ "raw": raw, "threadId": message.thread_id }))
            .send()
            .await
            .map_err(|e| transport_error("Gmail", e))?;
        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(|e| transport_error("Gmail", e))?;
        let body = decode_body(&raw);
        if !(200..300).contains(&status) {
            let detail = if body.is_object() { body.to_string() } else { "{}".to_string() };
            return Err(DomainError::InvalidInput(format!(
                "Failed to send Gmail message ({status}): {detail}"
            )));
        }
        tracing::info!(thread_id = ?message.thread_id, "Gmail message sent");
        Ok(body)
    }
}
