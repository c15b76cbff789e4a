use crate::config::NotionConfig;
use crate::domain::entities::document::{DocumentPayload, DocumentSearchItem, SourceHealth};
use crate::domain::error::DomainError;
use crate::domain::ports::document_source::DocumentSourceProvider;
use crate::domain::values::provider_kind::DocumentSourceKind;
use crate::infrastructure::http::{build_client, decode_body, str_field, transport_error};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::{Client, RequestBuilder};
use serde_json::{json, Value};
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

static PAGE_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[0-9a-fA-F]{32}").expect("valid page id regex"));

/// Canonical 8-4-4-4-12 page id from a raw id or any Notion page URL.
pub fn normalize_page_id(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Notion page id/url is required".into());
    }
    let compact = trimmed.replace('-', "");
    let raw = PAGE_ID
        .find(&compact)
        .map(|m| m.as_str().to_lowercase())
        .ok_or(DomainError::InvalidInput("Invalid Notion page URL or ID".to_string()))?;
    Ok(format!(
        "{}-{}-{}-{}-{}",
        &raw[0..8],
        &raw[8..12],
        &raw[12..16],
        &raw[16..20],
        &raw[20..]
    ))
}

fn plain_text(parts: &Value) -> String {
    parts
        .as_array()
        .map(|items| {
            items
                .iter()
                .map(|t| {
                    t.get("plain_text")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                })
                .collect::<String>()
        })
        .unwrap_or_default()
        .trim()
        .to_string()
}

/// Text of the first `title` property that has any.
fn page_title(page: &Value) -> String {
    page.get("properties")
        .and_then(Value::as_object)
        .into_iter()
        .flat_map(|props| props.values())
        .filter(|prop| prop.get("type").and_then(Value::as_str) == Some("title"))
        .filter_map(|prop| prop.get("title").filter(|t| t.is_array()))
        .map(plain_text)
        .find(|t| !t.is_empty())
        .unwrap_or_default()
}

/// One line of text for a block, if it carries any.
pub fn block_text(block: &Value) -> Option<String> {
    let kind = block.get("type").and_then(Value::as_str)?;
    let body = block.get(kind)?;
    if kind == "child_page" {
        return str_field(body, "title")
            .map(|t| t.trim().to_string())
            .filter(|t| !t.is_empty());
    }
    let parts = body.get("rich_text").or_else(|| body.get("text"))?;
    Some(plain_text(parts)).filter(|t| !t.is_empty())
}

pub struct NotionClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
    version: String,
}

impl NotionClient {
    pub fn new(config: &NotionConfig, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: config.api_key.clone(),
            api_url: config.api_url.trim_end_matches('/').to_string(),
            version: config.version.clone(),
        })
    }

    fn token<'a>(&'a self, token: Option<&'a str>) -> Option<&'a str> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.api_key.as_deref())
    }

    fn require_token<'a>(&'a self, token: Option<&'a str>) -> Result<&'a str, DomainError> {
        self.token(token)
            .ok_or_else(|| "NOTION_API_KEY is not configured".into())
    }

    fn authorized(&self, request: RequestBuilder, key: &str) -> RequestBuilder {
        request
            .bearer_auth(key)
            .header("Notion-Version", &self.version)
    }

    async fn send(&self, request: RequestBuilder) -> Result<(u16, Value), DomainError> {
        let resp = request
            .send()
            .await
            .map_err(|e| transport_error("Notion", e))?;
        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(|e| transport_error("Notion", e))?;
        Ok((status, decode_body(&raw)))
    }

    async fn fetch_title(&self, page_id: &str, key: &str) -> Result<String, DomainError> {
        let request = self.client.get(format!("{}/pages/{page_id}", self.api_url));
        let (status, page) = self.send(self.authorized(request, key)).await?;
        if !(200..300).contains(&status) {
            return Err(DomainError::InvalidInput(format!(
                "Failed to fetch Notion page metadata ({status})"
            )));
        }
        Ok(page_title(&page))
    }

    async fn fetch_text(&self, page_id: &str, key: &str) -> Result<String, DomainError> {
        let lines = self.block_lines(page_id.to_string(), key).await?;
        Ok(lines.join("\n").trim().to_string())
    }

    /// Walk a block's children page by page, descending into nested blocks.
    fn block_lines<'a>(
        &'a self,
        block_id: String,
        key: &'a str,
    ) -> BoxFuture<'a, Result<Vec<String>, DomainError>> {
        Box::pin(async move {
            let mut lines = Vec::new();
            let mut cursor: Option<String> = None;
            loop {
                let mut query = vec![("page_size", "100".to_string())];
                if let Some(c) = &cursor {
                    query.push(("start_cursor", c.clone()));
                }
                let request = self
                    .client
                    .get(format!("{}/blocks/{block_id}/children", self.api_url))
                    .query(&query);
                let (status, payload) = self.send(self.authorized(request, key)).await?;
                if !(200..300).contains(&status) {
                    return Err(DomainError::InvalidInput(format!(
                        "Failed to fetch Notion blocks ({status})"
                    )));
                }

                for block in payload
                    .get("results")
                    .and_then(Value::as_array)
                    .into_iter()
                    .flatten()
                {
                    if let Some(line) = block_text(block) {
                        lines.push(line);
                    }
                    let has_children =
                        block.get("has_children").and_then(Value::as_bool) == Some(true);
                    if let (true, Some(child)) = (has_children, str_field(block, "id")) {
                        lines.extend(self.block_lines(child.to_string(), key).await?);
                    }
                }

                if payload.get("has_more").and_then(Value::as_bool) != Some(true) {
                    break;
                }
                cursor = str_field(&payload, "next_cursor").map(str::to_string);
                if cursor.is_none() {
                    break;
                }
            }
            Ok(lines)
        })
    }
}

#[async_trait]
impl DocumentSourceProvider for NotionClient {
    async fn fetch(
        &self,
        source: &str,
        token: Option<&str>,
    ) -> Result<DocumentPayload, DomainError> {
        let key = self.require_token(token)?;
        let page_id = normalize_page_id(source)?;
        let (title, text) = tokio::try_join!(
            self.fetch_title(&page_id, key),
            self.fetch_text(&page_id, key)
        )?;
        if text.trim().is_empty() {
            return Err("The selected Notion page has no extractable text".into());
        }
        Ok(DocumentPayload {
            source_type: DocumentSourceKind::Notion,
            title: if title.is_empty() { format!("Notion {page_id}") } else { title },
            source_id: page_id,
            text,
        })
    }

    fn health(&self, token: Option<&str>) -> SourceHealth {
        SourceHealth::check(
            "notion",
            self.token(token).is_some(),
            "NOTION_API_KEY is missing",
        )
    }

    async fn search(
        &self,
        query: &str,
        token: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<DocumentSearchItem>, DomainError> {
        let key = self.require_token(token)?;
        let page_size = limit.filter(|l| *l != 0).unwrap_or(20).clamp(1, 100);
        let body = json!({
            "query": query.trim(),
            "filter": { "property": "object", "value": "page" },
            "sort": { "direction": "descending", "timestamp": "last_edited_time" },
            "page_size": page_size,
        });
        let request = self
            .client
            .post(format!("{}/search", self.api_url))
            .json(&body);
        let (status, payload) = self.send(self.authorized(request, key)).await?;
        if !(200..300).contains(&status) {
            let detail = if payload.is_object() { payload.to_string() } else { "{}".to_string() };
            return Err(DomainError::InvalidInput(format!(
                "Failed to search Notion pages ({status}): {detail}"
            )));
        }

        let items = payload
            .get("results")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|page| {
                let id = str_field(page, "id")?.trim().to_string();
                if id.is_empty() {
                    return None;
                }
                let title = page_title(page);
                let trimmed = |key: &str| str_field(page, key).map(|s| s.trim().to_string());
                Some(DocumentSearchItem {
                    name: if title.is_empty() { id.clone() } else { title },
                    web_view_link: trimmed("url"),
                    modified_time: trimmed("last_edited_time"),
                    id,
                })
            })
            .collect();
        Ok(items)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_page_id_from_url() {
        let id = normalize_page_id(
            "https://www.notion.so/acme/Roadmap-0123456789ABCDEF0123456789abcdef?pvs=4",
        )
        .unwrap();
        assert_eq!(id, "01234567-89ab-cdef-0123-456789abcdef");
    }

    #[test]
    fn test_normalize_page_id_rejects_garbage() {
        assert_eq!(
            normalize_page_id("  ").unwrap_err().to_string(),
            "Notion page id/url is required"
        );
        assert_eq!(
            normalize_page_id("https://notion.so/nothing-here")
                .unwrap_err()
                .to_string(),
            "Invalid Notion page URL or ID"
        );
    }

    #[test]
    fn test_block_text_variants() {
        let paragraph = json!({
            "type": "paragraph",
            "paragraph": { "rich_text": [{ "plain_text": "Hello " }, { "plain_text": "world " }] }
        });
        assert_eq!(block_text(&paragraph).as_deref(), Some("Hello world"));

        let child = json!({ "type": "child_page", "child_page": { "title": "Specs" } });
        assert_eq!(block_text(&child).as_deref(), Some("Specs"));

        let divider = json!({ "type": "divider", "divider": {} });
        assert_eq!(block_text(&divider), None);
    }

    #[test]
    fn test_page_title_uses_title_property() {
        let page = json!({ "properties": {
            "Status": { "type": "select", "select": {} },
            "Name": { "type": "title", "title": [{ "plain_text": "Q3 plan" }] }
        } });
        assert_eq!(page_title(&page), "Q3 plan");
        assert_eq!(page_title(&json!({})), "");
    }
}
