use crate::config::KeyedApiConfig;
use crate::domain::error::DomainError;
use crate::domain::values::query_params::QueryParams;
use crate::infrastructure::http::{build_client, decode_body, payload_message, transport_error};
use reqwest::Client;
use serde_json::Value;

/// Status, headers of interest and decoded body of one provider call.
#[derive(Debug, Clone)]
pub struct RawResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub location: Option<String>,
    pub raw: String,
    pub payload: Value,
}

impl RawResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// GET client for data vendors that authenticate with an `apikey` query
/// parameter.
pub struct KeyedApiClient {
    client: Client,
    label: &'static str,
    env_prefix: &'static str,
    api_key: Option<String>,
    base_url: String,
}

impl KeyedApiClient {
    pub fn new(
        label: &'static str,
        env_prefix: &'static str,
        config: &KeyedApiConfig,
    ) -> Result<Self, DomainError> {
        Ok(Self::with_client(label, env_prefix, config, build_client(config.timeout)?))
    }

    /// Same as `new` around a client the caller configured.
    pub fn with_client(
        label: &'static str,
        env_prefix: &'static str,
        config: &KeyedApiConfig,
        client: Client,
    ) -> Self {
        Self {
            client,
            label,
            env_prefix,
            api_key: config.api_key.clone(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn api_key(&self) -> Result<&str, DomainError> {
        self.api_key.as_deref().ok_or_else(|| {
            DomainError::NotConfigured(format!("{}_API_KEY is not configured.", self.env_prefix))
        })
    }

    /// Issue the request and decode the body without judging the status.
    pub async fn send(&self, path: &str, params: &QueryParams) -> Result<RawResponse, DomainError> {
        let api_key = self.api_key()?;
        let url = self.url(path);
        let mut query: Vec<(&str, &str)> = vec![("apikey", api_key)];
        query.extend(params.iter().filter(|(k, _)| *k != "apikey"));

        let resp = self
            .client
            .get(&url)
            .query(&query)
            .send()
            .await
            .map_err(|e| transport_error(self.label, e))?;

        let status = resp.status().as_u16();
        let header = |name: reqwest::header::HeaderName| {
            resp.headers()
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(reqwest::header::CONTENT_TYPE);
        let location = header(reqwest::header::LOCATION);
        let raw = resp
            .text()
            .await
            .map_err(|e| transport_error(self.label, e))?;
        let payload = decode_body(&raw);

        Ok(RawResponse {
            status,
            content_type,
            location,
            raw,
            payload,
        })
    }

    /// `send` plus the shared non-2xx mapping.
    pub async fn get(&self, path: &str, params: &QueryParams) -> Result<Value, DomainError> {
        let url = self.url(path);
        let resp = self.send(path, params).await?;
        if !resp.is_success() {
            let message = payload_message(&resp.payload, &resp.raw)
                .unwrap_or_else(|| self.failed_message(resp.status));
            tracing::error!(
                provider = self.label,
                status = resp.status,
                url = %url,
                message = %message,
                "provider request failed"
            );
            return Err(DomainError::Gateway(message));
        }
        Ok(resp.payload)
    }

    pub fn failed_message(&self, status: u16) -> String {
        format!("{} request failed ({status}).", self.label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn client(base_url: &str, api_key: Option<&str>) -> KeyedApiClient {
        KeyedApiClient::new(
            "FMP",
            "FMP",
            &KeyedApiConfig {
                api_key: api_key.map(str::to_string),
                base_url: base_url.to_string(),
                timeout: Duration::from_secs(1),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_url_joins_without_double_slashes() {
        let c = client("https://example.test/stable///", Some("k"));
        assert_eq!(c.url("/profile"), "https://example.test/stable/profile");
        assert_eq!(
            c.url("income-statement"),
            "https://example.test/stable/income-statement"
        );
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_io() {
        let c = client("http://127.0.0.1:1", None);
        let err = c.get("/profile", &QueryParams::new()).await.unwrap_err();
        assert_eq!(err.status(), 500);
        assert_eq!(err.to_string(), "FMP_API_KEY is not configured.");
    }
}
