use crate::domain::entities::project::{IssueFilter, ProjectFilter, SyncSummary};
use crate::domain::error::DomainError;
use crate::domain::ports::project_manager::{ProjectManagerProvider, WebhookNotifier};
use crate::domain::values::dates::parse_loose;
use crate::domain::values::provider_kind::ProjectManagerKind;
use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use std::sync::Arc;

pub const DEFAULT_STALE_HOURS: f64 = 72.0;
pub const DEFAULT_DIGEST_TITLE: &str = "AgentPM Sprint Digest";

/// Sprint digest posted to a Slack incoming webhook.
#[derive(Debug, Clone, Default)]
pub struct DigestRequest {
    pub filter: IssueFilter,
    pub stale_hours: Option<f64>,
    pub webhook_url: Option<String>,
    pub title: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DigestReceipt {
    pub sent: bool,
    pub summary: SyncSummary,
}

pub struct ProjectManagerUseCase {
    linear: Arc<dyn ProjectManagerProvider>,
    notifier: Arc<dyn WebhookNotifier>,
}

impl ProjectManagerUseCase {
    pub fn new(
        linear: Arc<dyn ProjectManagerProvider>,
        notifier: Arc<dyn WebhookNotifier>,
    ) -> Self {
        Self { linear, notifier }
    }

    /// Provider client for a `{provider}` path segment.
    pub fn resolve(&self, provider: &str) -> Result<&dyn ProjectManagerProvider, DomainError> {
        match provider.parse::<ProjectManagerKind>()? {
            ProjectManagerKind::Linear => Ok(self.linear.as_ref()),
        }
    }

    pub async fn health(&self, provider: &str, token: Option<&str>) -> Result<Value, DomainError> {
        tracing::info!(provider, "project-manager health");
        self.resolve(provider)?.health(token).await
    }

    pub async fn viewer(&self, provider: &str, token: Option<&str>) -> Result<Value, DomainError> {
        tracing::info!(provider, "project-manager viewer");
        self.resolve(provider)?.viewer(token).await
    }

    pub async fn list_teams(
        &self,
        provider: &str,
        token: Option<&str>,
        first: Option<u32>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, first = ?first, "project-manager list teams");
        self.resolve(provider)?.list_teams(token, first).await
    }

    pub async fn list_users(
        &self,
        provider: &str,
        token: Option<&str>,
        first: Option<u32>,
        after: Option<&str>,
        query: Option<&str>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, first = ?first, query = ?query, "project-manager list users");
        self.resolve(provider)?
            .list_users(token, first, after, query)
            .await
    }

    pub async fn list_projects(
        &self,
        provider: &str,
        token: Option<&str>,
        filter: &ProjectFilter,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, ?filter, "project-manager list projects");
        self.resolve(provider)?.list_projects(token, filter).await
    }

    pub async fn get_project(
        &self,
        provider: &str,
        token: Option<&str>,
        id: &str,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, id, "project-manager get project");
        self.resolve(provider)?.get_project(token, id).await
    }

    pub async fn create_project(
        &self,
        provider: &str,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, "project-manager create project");
        self.resolve(provider)?.create_project(token, input).await
    }

    pub async fn update_project(
        &self,
        provider: &str,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, id, "project-manager update project");
        self.resolve(provider)?
            .update_project(token, id, input)
            .await
    }

    pub async fn list_issues(
        &self,
        provider: &str,
        token: Option<&str>,
        filter: &IssueFilter,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, ?filter, "project-manager list issues");
        self.resolve(provider)?.list_issues(token, filter).await
    }

    pub async fn get_issue(
        &self,
        provider: &str,
        token: Option<&str>,
        id: &str,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, id, "project-manager get issue");
        self.resolve(provider)?.get_issue(token, id).await
    }

    pub async fn create_issue(
        &self,
        provider: &str,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, "project-manager create issue");
        self.resolve(provider)?.create_issue(token, input).await
    }

    pub async fn update_issue(
        &self,
        provider: &str,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, id, "project-manager update issue");
        self.resolve(provider)?.update_issue(token, id, input).await
    }

    pub async fn create_comment(
        &self,
        provider: &str,
        token: Option<&str>,
        issue_id: &str,
        body: &str,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, issue_id, "project-manager create comment");
        self.resolve(provider)?
            .create_comment(token, issue_id, body)
            .await
    }

    pub async fn list_cycles(
        &self,
        provider: &str,
        token: Option<&str>,
        team_id: &str,
        first: Option<u32>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, team_id, first = ?first, "project-manager list cycles");
        self.resolve(provider)?
            .list_cycles(token, team_id, first)
            .await
    }

    pub async fn raw_query(
        &self,
        provider: &str,
        token: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, DomainError> {
        tracing::info!(provider, "project-manager raw query");
        self.resolve(provider)?
            .raw_query(token, query, variables)
            .await
    }

    pub async fn sync_summary(
        &self,
        provider: &str,
        token: Option<&str>,
        filter: &IssueFilter,
        stale_hours: Option<f64>,
    ) -> Result<SyncSummary, DomainError> {
        tracing::info!(provider, ?filter, ?stale_hours, "project-manager sync summary");
        let payload = self.resolve(provider)?.list_issues(token, filter).await?;
        let nodes = payload
            .pointer("/issues/nodes")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default();
        let stale_hours = stale_hours.unwrap_or(DEFAULT_STALE_HOURS);
        Ok(summarize(nodes, Utc::now(), stale_hours))
    }

    pub async fn notify_slack(
        &self,
        provider: &str,
        token: Option<&str>,
        request: &DigestRequest,
    ) -> Result<DigestReceipt, DomainError> {
        let webhook_url = request
            .webhook_url
            .as_deref()
            .filter(|u| !u.is_empty())
            .ok_or_else(|| DomainError::InvalidInput("webhookUrl is required".to_string()))?;

        let summary = self
            .sync_summary(provider, token, &request.filter, request.stale_hours)
            .await?;
        let title = request
            .title
            .as_deref()
            .filter(|t| !t.is_empty())
            .unwrap_or(DEFAULT_DIGEST_TITLE);
        let status = self
            .notifier
            .post_webhook(webhook_url, &digest_text(title, &summary))
            .await?;
        if !(200..300).contains(&status) {
            tracing::warn!(status, "Slack digest webhook rejected");
            return Err(DomainError::InvalidInput(format!(
                "Slack webhook failed with status {status}"
            )));
        }
        tracing::info!(provider, total = summary.total, "Slack digest sent");
        Ok(DigestReceipt { sent: true, summary })
    }
}

fn node_date(node: &Value, key: &str) -> Option<DateTime<Utc>> {
    node.get(key).and_then(Value::as_str).and_then(parse_loose)
}

/// Health counters of an issue list at `now`.
pub fn summarize(nodes: &[Value], now: DateTime<Utc>, stale_hours: f64) -> SyncSummary {
    // a window reaching past the earliest representable date marks nothing stale
    let stale_cutoff = Duration::try_milliseconds((stale_hours * 3_600_000.0) as i64)
        .and_then(|window| now.checked_sub_signed(window))
        .unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut summary = SyncSummary {
        total: nodes.len(),
        ..Default::default()
    };
    let mut completed = 0usize;

    for node in nodes {
        let state_text = |key: &str| {
            node.pointer(&format!("/state/{key}"))
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_lowercase()
        };
        let state_name = state_text("name");
        let state_type = state_text("type");

        if state_name.contains("block") {
            summary.blocked += 1;
        }
        if node_date(node, "dueDate").is_some_and(|due| due < now) {
            summary.overdue += 1;
        }
        if node_date(node, "updatedAt").is_some_and(|updated| updated < stale_cutoff) {
            summary.stale += 1;
        }
        if state_type == "completed" || state_type == "done" || state_name == "done" {
            completed += 1;
        }
    }

    if summary.total > 0 {
        summary.completion_pct = (completed as f64 / summary.total as f64 * 100.0).round() as u32;
    }
    summary
}

pub fn digest_text(title: &str, summary: &SyncSummary) -> String {
    let lines = [
        format!("*{title}*"),
        format!("• Total issues: {}", summary.total),
        format!("• Blocked: {}", summary.blocked),
        format!("• Overdue: {}", summary.overdue),
        format!("• Stale: {}", summary.stale),
        format!("• Completion: {}%", summary.completion_pct),
    ];
    lines.join("\n")
}
