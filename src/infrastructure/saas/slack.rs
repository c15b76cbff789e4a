use crate::domain::error::DomainError;
use crate::domain::ports::project_manager::WebhookNotifier;
use crate::infrastructure::http::{build_client, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;

/// Posts plain-text messages to Slack incoming webhooks.
pub struct SlackWebhookClient {
    client: Client,
}

impl SlackWebhookClient {
    pub fn new(timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
        })
    }
}

#[async_trait]
impl WebhookNotifier for SlackWebhookClient {
    async fn post_webhook(&self, url: &str, text: &str) -> Result<u16, DomainError> {
        let resp = self
            .client
            .post(url)
            .json(&json!({ "text": text }))
            .send()
            .await
            .map_err(|e| transport_error("Slack webhook", e))?;
        Ok(resp.status().as_u16())
    }
}
