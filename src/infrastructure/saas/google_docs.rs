use crate::config::GoogleDocsConfig;
use crate::domain::entities::document::{DocumentPayload, DocumentSearchItem, SourceHealth};
use crate::domain::error::DomainError;
use crate::domain::ports::document_source::DocumentSourceProvider;
use crate::domain::values::provider_kind::DocumentSourceKind;
use crate::infrastructure::http::{build_client, str_field, transport_error};
use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

static DOC_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"/document/d/([a-zA-Z0-9_-]+)").expect("valid doc url regex"));
static DOC_ID: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-zA-Z0-9_-]{20,}$").expect("valid doc id regex"));

const DOCUMENT_MIME: &str = "mimeType='application/vnd.google-apps.document'";
const TOKEN_EXPIRED: &str = concat!(
    "Google access token is invalid or expired. ",
    "Reconnect Google Docs integration and try again."
);
const DOCUMENT_FORBIDDEN: &str = concat!(
    "Google denied access to this document (403). ",
    "Ensure the connected Google account can open the doc ",
    "and reconnect with Google Docs scopes."
);
const SEARCH_FORBIDDEN: &str = concat!(
    "Google Drive search is not allowed for this token (403). ",
    "Reconnect Google Docs with drive.readonly scope to search by file name."
);

pub fn normalize_document_id(input: &str) -> Result<String, DomainError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Google doc id/url is required".into());
    }
    let id = DOC_URL
        .captures(trimmed)
        .and_then(|c| c.get(1))
        .map_or(trimmed, |m| m.as_str());
    if !DOC_ID.is_match(id) {
        return Err("Invalid Google document URL or ID".into());
    }
    Ok(id.to_string())
}

/// Paragraph text of a Docs API document, tables and tables of contents
/// included, one paragraph per block.
pub fn extract_text(document: &Value) -> String {
    fn walk(elements: &[Value], lines: &mut Vec<String>) {
        for element in elements {
            if let Some(parts) = element.pointer("/paragraph/elements").and_then(Value::as_array) {
                let text: String = parts
                    .iter()
                    .filter_map(|p| p.pointer("/textRun/content").and_then(Value::as_str))
                    .collect();
                let text = text.trim();
                if !text.is_empty() {
                    lines.push(text.to_string());
                }
            }
            if let Some(rows) = element.pointer("/table/tableRows").and_then(Value::as_array) {
                for cell in rows
                    .iter()
                    .filter_map(|r| r.get("tableCells").and_then(Value::as_array))
                    .flatten()
                {
                    if let Some(content) = cell.get("content").and_then(Value::as_array) {
                        walk(content, lines);
                    }
                }
            }
            if let Some(content) = element
                .pointer("/tableOfContents/content")
                .and_then(Value::as_array)
            {
                walk(content, lines);
            }
        }
    }

    let mut lines = Vec::new();
    if let Some(content) = document.pointer("/body/content").and_then(Value::as_array) {
        walk(content, &mut lines);
    }
    lines.join("\n\n").trim().to_string()
}

/// Drive `q` expression for documents whose name contains `query`.
pub fn drive_query(query: &str) -> String {
    let mut parts = vec![DOCUMENT_MIME.to_string(), "trashed=false".to_string()];
    let query = query.trim();
    if !query.is_empty() {
        let escaped = query.replace('\\', "\\\\").replace('\'', "\\'");
        parts.push(format!("name contains '{escaped}'"));
    }
    parts.join(" and ")
}

fn with_body(prefix: String, body: &str) -> String {
    if body.is_empty() {
        prefix
    } else {
        format!("{prefix}: {body}")
    }
}

pub struct GoogleDocsClient {
    client: Client,
    access_token: Option<String>,
    docs_url: String,
    drive_url: String,
}

impl GoogleDocsClient {
    pub fn new(config: &GoogleDocsConfig, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            access_token: config.access_token.clone(),
            docs_url: config.docs_url.trim_end_matches('/').to_string(),
            drive_url: config.drive_url.trim_end_matches('/').to_string(),
        })
    }

    fn token<'a>(&'a self, token: Option<&'a str>) -> Option<&'a str> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.access_token.as_deref())
    }

    fn require_token<'a>(&'a self, token: Option<&'a str>) -> Result<&'a str, DomainError> {
        self.token(token)
            .ok_or_else(|| "GOOGLE_DOCS_ACCESS_TOKEN is not configured".into())
    }

    async fn get(
        &self,
        url: String,
        query: &[(&str, String)],
        token: &str,
    ) -> Result<(u16, String), DomainError> {
        let resp = self
            .client
            .get(url)
            .query(query)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| transport_error("Google API", e))?;
        let status = resp.status().as_u16();
        let raw = resp
            .text()
            .await
            .map_err(|e| transport_error("Google API", e))?;
        Ok((status, raw))
    }
}

#[async_trait]
impl DocumentSourceProvider for GoogleDocsClient {
    async fn fetch(
        &self,
        source: &str,
        token: Option<&str>,
    ) -> Result<DocumentPayload, DomainError> {
        let token = self.require_token(token)?;
        let document_id = normalize_document_id(source)?;

        let url = format!("{}/documents/{document_id}", self.docs_url);
        let (status, body) = self.get(url, &[], token).await?;
        match status {
            200..=299 => {}
            401 => return Err(TOKEN_EXPIRED.into()),
            403 => return Err(DOCUMENT_FORBIDDEN.into()),
            _ => {
                return Err(DomainError::InvalidInput(with_body(
                    format!("Failed to fetch Google document ({status})"),
                    &body,
                )))
            }
        }

        let document: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let text = extract_text(&document);
        if text.is_empty() {
            return Err("The selected Google Doc has no extractable text".into());
        }
        let title = str_field(&document, "title")
            .map(str::trim)
            .unwrap_or_default();
        Ok(DocumentPayload {
            source_type: DocumentSourceKind::GoogleDocs,
            title: if title.is_empty() {
                format!("Google Doc {document_id}")
            } else {
                title.to_string()
            },
            source_id: document_id,
            text,
        })
    }

    fn health(&self, token: Option<&str>) -> SourceHealth {
        SourceHealth::check(
            "google-docs",
            self.token(token).is_some(),
            "GOOGLE_DOCS_ACCESS_TOKEN is missing",
        )
    }

    async fn search(
        &self,
        query: &str,
        token: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<DocumentSearchItem>, DomainError> {
        let token = self.require_token(token)?;
        let page_size = limit.filter(|l| *l != 0).unwrap_or(20).clamp(1, 50);
        let params = [
            ("q", drive_query(query)),
            ("orderBy", "modifiedTime desc".to_string()),
            ("pageSize", page_size.to_string()),
            ("includeItemsFromAllDrives", "true".to_string()),
            ("supportsAllDrives", "true".to_string()),
            ("fields", "files(id,name,webViewLink,modifiedTime)".to_string()),
        ];
        let (status, body) = self
            .get(format!("{}/files", self.drive_url), &params, token)
            .await?;
        match status {
            200..=299 => {}
            403 => return Err(SEARCH_FORBIDDEN.into()),
            _ => {
                return Err(DomainError::InvalidInput(with_body(
                    format!("Failed to search Google documents ({status})"),
                    &body,
                )))
            }
        }

        let payload: Value = serde_json::from_str(&body).unwrap_or(Value::Null);
        let text = |file: &Value, key: &str| {
            str_field(file, key)
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        Ok(payload
            .get("files")
            .and_then(Value::as_array)
            .into_iter()
            .flatten()
            .filter_map(|file| {
                Some(DocumentSearchItem {
                    id: text(file, "id")?,
                    name: text(file, "name").unwrap_or_default(),
                    web_view_link: text(file, "webViewLink"),
                    modified_time: text(file, "modifiedTime"),
                })
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_document_id_from_url_or_raw() {
        let id = "1AbCdEfGhIjKlMnOpQrStUvWxYz_0123456789";
        let url = format!("https://docs.google.com/document/d/{id}/edit#heading=h.1");
        assert_eq!(normalize_document_id(&url).unwrap(), id);
        assert_eq!(normalize_document_id(id).unwrap(), id);
        assert_eq!(
            normalize_document_id("short-id").unwrap_err().to_string(),
            "Invalid Google document URL or ID"
        );
    }

    #[test]
    fn test_extract_text_walks_tables() {
        let doc = json!({ "body": { "content": [
            { "paragraph": { "elements": [
                { "textRun": { "content": "Roadmap " } },
                { "textRun": { "content": "2025\n" } }
            ] } },
            { "paragraph": { "elements": [{ "textRun": { "content": "\n" } }] } },
            { "table": { "tableRows": [{ "tableCells": [
                { "content": [{ "paragraph": { "elements": [
                    { "textRun": { "content": "Cell A" } }
                ] } }] }
            ] }] } }
        ] } });
        assert_eq!(extract_text(&doc), "Roadmap 2025\n\nCell A");
    }

    #[test]
    fn test_drive_query_escapes_quotes() {
        let expected = concat!(
            "mimeType='application/vnd.google-apps.document' and trashed=false ",
            "and name contains 'Bob\\'s \\\\ plan'"
        );
        assert_eq!(drive_query(" Bob's \\ plan "), expected);
        assert!(!drive_query("").contains("name contains"));
    }
}
