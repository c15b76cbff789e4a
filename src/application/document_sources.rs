use crate::domain::entities::document::{DocumentPayload, DocumentSearchItem, SourceHealth};
use crate::domain::error::DomainError;
use crate::domain::ports::document_source::DocumentSourceProvider;
use crate::domain::values::provider_kind::DocumentSourceKind;
use serde::Serialize;
use std::sync::Arc;

/// Search hits labelled with the provider segment the caller used.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentSearchResults {
    pub provider: String,
    pub items: Vec<DocumentSearchItem>,
}

pub struct DocumentSourcesUseCase {
    notion: Arc<dyn DocumentSourceProvider>,
    google_docs: Arc<dyn DocumentSourceProvider>,
}

impl DocumentSourcesUseCase {
    pub fn new(
        notion: Arc<dyn DocumentSourceProvider>,
        google_docs: Arc<dyn DocumentSourceProvider>,
    ) -> Self {
        Self { notion, google_docs }
    }

    pub fn resolve(&self, provider: &str) -> Result<&dyn DocumentSourceProvider, DomainError> {
        Ok(match provider.parse::<DocumentSourceKind>()? {
            DocumentSourceKind::Notion => self.notion.as_ref(),
            DocumentSourceKind::GoogleDocs => self.google_docs.as_ref(),
        })
    }

    pub fn health(&self, provider: &str, token: Option<&str>) -> Result<SourceHealth, DomainError> {
        tracing::info!(provider, "document-source health");
        Ok(self.resolve(provider)?.health(token))
    }

    pub async fn fetch(
        &self,
        provider: &str,
        source: &str,
        token: Option<&str>,
    ) -> Result<DocumentPayload, DomainError> {
        tracing::info!(provider, source, "document-source fetch");
        let document = self.resolve(provider)?.fetch(source, token).await?;
        tracing::debug!(provider, chars = document.text.len(), "document text extracted");
        Ok(document)
    }

    pub async fn search(
        &self,
        provider: &str,
        query: &str,
        token: Option<&str>,
        limit: Option<i64>,
    ) -> Result<DocumentSearchResults, DomainError> {
        tracing::info!(provider, query, limit = ?limit, "document-source search");
        let items = self.resolve(provider)?.search(query, token, limit).await?;
        Ok(DocumentSearchResults {
            provider: provider.to_string(),
            items,
        })
    }
}
