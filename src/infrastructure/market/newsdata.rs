use super::keyed::{KeyedApiClient, RawResponse};
use crate::config::KeyedApiConfig;
use crate::domain::error::{DomainError, ProviderRejection};
use crate::domain::ports::news::{NewsEndpoint, NewsSource};
use crate::domain::values::query_params::QueryParams;
use crate::infrastructure::http::{client_build_error, truthy_text};
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{redirect, Client, Url};
use serde_json::Value;

const DEFAULT_BASE_URL: &str = "https://newsdata.io/api/1";

/// NewsData.io client. Redirects are reported as errors, never followed.
pub struct NewsDataClient {
    http: KeyedApiClient,
}

impl NewsDataClient {
    pub fn new(config: &KeyedApiConfig) -> Result<Self, DomainError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        let client = Client::builder()
            .user_agent("fin-agent/1.0")
            .default_headers(headers)
            .redirect(redirect::Policy::none())
            .timeout(config.timeout)
            .build()
            .map_err(client_build_error)?;

        Ok(Self {
            http: KeyedApiClient::with_client("NewsData", "NEWSDATA", config, client)
                .with_base_url(&normalize_base_url(&config.base_url)),
        })
    }

    fn check(&self, url: &str, resp: RawResponse) -> Result<Value, DomainError> {
        if (300..400).contains(&resp.status) {
            let location = resp.location.as_deref().filter(|l| !l.is_empty());
            tracing::error!(status = resp.status, %url, ?location, "NewsData redirect");
            return Err(DomainError::Gateway(format!(
                "NewsData redirected ({}). Location: {}.",
                resp.status,
                location.unwrap_or("unknown")
            )));
        }

        let content_type = resp.content_type.as_deref().unwrap_or("application/json");
        if !content_type.contains("application/json") {
            tracing::error!(
                status = resp.status,
                %url,
                %content_type,
                "NewsData returned unexpected content-type"
            );
            return Err(DomainError::Gateway(
                "NewsData returned a non-JSON response. Check NEWSDATA_API_KEY and endpoint access."
                    .to_string(),
            ));
        }

        let payload = resp.payload;
        if !(200..300).contains(&resp.status) {
            let results = payload.get("results");
            let message = truthy_text(results.and_then(|r| r.get("message")))
                .or_else(|| truthy_text(payload.get("message")))
                .or_else(|| truthy_text(payload.get("error")))
                .or_else(|| (!resp.raw.is_empty()).then(|| resp.raw.clone()))
                .unwrap_or_else(|| self.http.failed_message(resp.status));
            tracing::error!(status = resp.status, %url, %message, "NewsData API error");

            if (400..500).contains(&resp.status) {
                return Err(DomainError::Rejected(ProviderRejection {
                    message,
                    code: truthy_text(results.and_then(|r| r.get("code"))),
                    status: resp.status,
                    invalid_ticker: truthy_text(results.and_then(|r| r.get("invalid_ticker"))),
                }));
            }
            return Err(DomainError::Gateway(message));
        }

        if payload.get("status").and_then(Value::as_str) == Some("error") {
            let message = truthy_text(payload.get("message"))
                .unwrap_or_else(|| "NewsData error response.".to_string());
            return Err(DomainError::InvalidInput(message));
        }
        Ok(payload)
    }
}

/// Keep only the origin of the configured URL and pin the `/api/1` path.
fn normalize_base_url(raw: &str) -> String {
    match Url::parse(raw.trim()) {
        Ok(url) if url.has_host() => format!("{}/api/1", url.origin().ascii_serialization()),
        _ => DEFAULT_BASE_URL.to_string(),
    }
}

#[async_trait]
impl NewsSource for NewsDataClient {
    async fn fetch(
        &self,
        endpoint: NewsEndpoint,
        params: &QueryParams,
    ) -> Result<Value, DomainError> {
        let url = self.http.url(endpoint.path());
        let resp = self.http.send(endpoint.path(), params).await?;
        self.check(&url, resp)
    }
}
