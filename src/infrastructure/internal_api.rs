use crate::config::InternalApiConfig;
use crate::domain::entities::activity::{ActivityEvent, StandupResponse};
use crate::domain::error::DomainError;
use crate::domain::ports::activity_sink::ActivitySink;
use crate::infrastructure::http::{build_client, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

pub const INTERNAL_KEY_HEADER: &str = "x-internal-api-key";

/// Forwards webhook-derived records to the platform API.
pub struct InternalApiClient {
    client: Client,
    activity_url: String,
    standup_url: String,
    api_key: String,
}

impl InternalApiClient {
    pub fn new(config: &InternalApiConfig, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            activity_url: config.activity_url.clone(),
            standup_url: config.standup_url.clone(),
            api_key: config.api_key.clone(),
        })
    }

    async fn post<T: Serialize + Sync>(&self, url: &str, body: &T) -> Result<(), DomainError> {
        let resp = self
            .client
            .post(url)
            .header(INTERNAL_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|e| transport_error("Internal API", e))?;
        let status = resp.status().as_u16();
        if !(200..300).contains(&status) {
            return Err(DomainError::Upstream {
                status,
                message: format!("Internal API rejected the request ({status})"),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl ActivitySink for InternalApiClient {
    async fn forward_activity(&self, event: &ActivityEvent) -> Result<(), DomainError> {
        self.post(&self.activity_url, event).await
    }

    async fn forward_standup(&self, response: &StandupResponse) -> Result<(), DomainError> {
        self.post(&self.standup_url, response).await
    }
}
