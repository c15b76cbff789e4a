use crate::domain::entities::project::{IssueFilter, ProjectFilter};
use crate::domain::error::DomainError;
use serde_json::{Map, Value};

/// Issue tracker operations. `token` overrides the configured credential for
/// one call.
///
/// Results are the provider's GraphQL `data` objects.
#[async_trait::async_trait]
pub trait ProjectManagerProvider: Send + Sync {
    /// Connectivity check; answers with the authenticated viewer.
    async fn health(&self, token: Option<&str>) -> Result<Value, DomainError> {
        self.viewer(token).await
    }
    async fn viewer(&self, token: Option<&str>) -> Result<Value, DomainError>;
    async fn list_teams(
        &self,
        token: Option<&str>,
        first: Option<u32>,
    ) -> Result<Value, DomainError>;
    async fn list_users(
        &self,
        token: Option<&str>,
        first: Option<u32>,
        after: Option<&str>,
        query: Option<&str>,
    ) -> Result<Value, DomainError>;
    async fn list_projects(
        &self,
        token: Option<&str>,
        filter: &ProjectFilter,
    ) -> Result<Value, DomainError>;
    async fn get_project(&self, token: Option<&str>, id: &str) -> Result<Value, DomainError>;
    async fn create_project(
        &self,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError>;
    async fn update_project(
        &self,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError>;
    async fn list_issues(
        &self,
        token: Option<&str>,
        filter: &IssueFilter,
    ) -> Result<Value, DomainError>;
    async fn get_issue(&self, token: Option<&str>, id: &str) -> Result<Value, DomainError>;
    async fn create_issue(
        &self,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError>;
    async fn update_issue(
        &self,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError>;
    async fn create_comment(
        &self,
        token: Option<&str>,
        issue_id: &str,
        body: &str,
    ) -> Result<Value, DomainError>;
    async fn list_cycles(
        &self,
        token: Option<&str>,
        team_id: &str,
        first: Option<u32>,
    ) -> Result<Value, DomainError>;
    async fn raw_query(
        &self,
        token: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, DomainError>;
}

/// Incoming-webhook poster used for digests.
#[async_trait::async_trait]
pub trait WebhookNotifier: Send + Sync {
    /// Post `{text}` to `url` and return the HTTP status.
    async fn post_webhook(&self, url: &str, text: &str) -> Result<u16, DomainError>;
}
