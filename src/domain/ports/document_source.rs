use crate::domain::entities::document::{DocumentPayload, DocumentSearchItem, SourceHealth};
use crate::domain::error::DomainError;

#[async_trait::async_trait]
pub trait DocumentSourceProvider: Send + Sync {
    /// Fetch a document by id or URL and extract its text.
    async fn fetch(
        &self,
        source: &str,
        token: Option<&str>,
    ) -> Result<DocumentPayload, DomainError>;
    fn health(&self, token: Option<&str>) -> SourceHealth;
    async fn search(
        &self,
        query: &str,
        token: Option<&str>,
        limit: Option<i64>,
    ) -> Result<Vec<DocumentSearchItem>, DomainError>;
}
