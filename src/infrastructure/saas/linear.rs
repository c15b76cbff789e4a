use crate::config::LinearConfig;
use crate::domain::entities::project::{IssueFilter, ProjectFilter};
use crate::domain::error::DomainError;
use crate::domain::ports::project_manager::ProjectManagerProvider;
use crate::infrastructure::http::{build_client, transport_error};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Map, Value};
use std::time::Duration;

const DEFAULT_PAGE: u32 = 50;
const DEFAULT_CYCLE_PAGE: u32 = 20;

const VIEWER_QUERY: &str = r#"
query Viewer {
  viewer { id name email displayName active admin }
}"#;

const TEAMS_QUERY: &str = r#"
query Teams($first: Int!) {
  teams(first: $first) {
    nodes { id key name description }
    pageInfo { hasNextPage endCursor }
  }
}"#;

const USERS_QUERY: &str = r#"
query Users($first: Int!, $after: String, $filter: UserFilter) {
  users(first: $first, after: $after, filter: $filter) {
    nodes { id name email displayName active }
    pageInfo { hasNextPage endCursor }
  }
}"#;

const PROJECTS_QUERY: &str = r#"
query Projects($first: Int!, $after: String, $filter: ProjectFilter) {
  projects(first: $first, after: $after, filter: $filter) {
    nodes {
      id name slugId icon progress startDate targetDate state
      teams { nodes { id key name } }
      lead { id name email }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#;

const PROJECT_QUERY: &str = r#"
query Project($id: String!) {
  project(id: $id) {
    id name slugId description state progress startDate targetDate
    lead { id name email }
    teams { nodes { id key name } }
  }
}"#;

const CREATE_PROJECT_MUTATION: &str = r#"
mutation CreateProject($input: ProjectCreateInput!) {
  projectCreate(input: $input) {
    success
    project { id name slugId state progress startDate targetDate }
  }
}"#;

const UPDATE_PROJECT_MUTATION: &str = r#"
mutation UpdateProject($id: String!, $input: ProjectUpdateInput!) {
  projectUpdate(id: $id, input: $input) {
    success
    project { id name slugId state progress startDate targetDate }
  }
}"#;

const ISSUES_QUERY: &str = r#"
query Issues($first: Int!, $after: String, $filter: IssueFilter) {
  issues(first: $first, after: $after, filter: $filter) {
    nodes {
      id identifier title description priority estimate dueDate createdAt updatedAt url
      state { id name type }
      project { id name }
      team { id key name }
      assignee { id name email }
      labels { nodes { id name color } }
    }
    pageInfo { hasNextPage endCursor }
  }
}"#;

const ISSUE_QUERY: &str = r#"
query Issue($id: String!) {
  issue(id: $id) {
    id identifier title description priority estimate dueDate createdAt updatedAt url
    state { id name type }
    project { id name slugId }
    team { id key name }
    assignee { id name email }
    creator { id name email }
    labels { nodes { id name color } }
  }
}"#;

const CREATE_ISSUE_MUTATION: &str = r#"
mutation CreateIssue($input: IssueCreateInput!) {
  issueCreate(input: $input) {
    success
    issue {
      id identifier title url
      state { id name type }
      project { id name }
      team { id key name }
    }
  }
}"#;

const UPDATE_ISSUE_MUTATION: &str = r#"
mutation UpdateIssue($id: String!, $input: IssueUpdateInput!) {
  issueUpdate(id: $id, input: $input) {
    success
    issue {
      id identifier title url
      state { id name type }
      assignee { id name email }
    }
  }
}"#;

const CREATE_COMMENT_MUTATION: &str = r#"
mutation CreateComment($input: CommentCreateInput!) {
  commentCreate(input: $input) {
    success
    comment {
      id body createdAt url
      user { id name email }
    }
  }
}"#;

const TEAM_CYCLES_QUERY: &str = r#"
query TeamCycles($teamId: String!, $first: Int!) {
  team(id: $teamId) {
    id name
    cycles(first: $first) {
      nodes { id number name startsAt endsAt progress completedIssueCountHistory }
      pageInfo { hasNextPage endCursor }
    }
  }
}"#;

/// Linear GraphQL client. Personal API keys go in `Authorization` as-is.
pub struct LinearClient {
    client: Client,
    api_key: Option<String>,
    api_url: String,
}

impl LinearClient {
    pub fn new(config: &LinearConfig, timeout: Duration) -> Result<Self, DomainError> {
        Ok(Self {
            client: build_client(timeout)?,
            api_key: config.api_key.clone(),
            api_url: config.api_url.clone(),
        })
    }

    fn api_key<'a>(&'a self, token: Option<&'a str>) -> Result<&'a str, DomainError> {
        token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .or(self.api_key.as_deref())
            .ok_or_else(|| {
                DomainError::NotConfigured(
                    "LINEAR_API_KEY is missing. Add it to the gateway environment.".to_string(),
                )
            })
    }

    /// POST a GraphQL document and return its `data`.
    pub async fn graphql(
        &self,
        token: Option<&str>,
        query: &str,
        variables: Value,
    ) -> Result<Value, DomainError> {
        let api_key = self.api_key(token)?;
        let resp = self
            .client
            .post(&self.api_url)
            .header(reqwest::header::AUTHORIZATION, api_key)
            .json(&json!({ "query": query, "variables": variables }))
            .send()
            .await
            .map_err(|e| transport_error("Linear", e))?;

        let status = resp.status().as_u16();
        let raw = resp.text().await.map_err(|e| transport_error("Linear", e))?;
        let payload: Value = serde_json::from_str(&raw)
            .map_err(|_| DomainError::Gateway("Invalid response from Linear API".to_string()))?;
        let errors = graphql_errors(&payload);

        if !(200..300).contains(&status) {
            tracing::error!(status, errors = ?errors, "Linear API error");
            let message = if errors.is_empty() {
                "Linear API request failed".to_string()
            } else {
                errors.join("; ")
            };
            return Err(DomainError::Upstream { status, message });
        }
        if !errors.is_empty() {
            tracing::error!(errors = ?errors, "Linear GraphQL errors");
            return Err(DomainError::InvalidInput(errors.join("; ")));
        }

        match payload.get("data") {
            Some(data) if !data.is_null() => Ok(data.clone()),
            _ => Err(DomainError::Gateway("Linear API returned empty data".to_string())),
        }
    }
}

fn graphql_errors(payload: &Value) -> Vec<String> {
    payload
        .get("errors")
        .and_then(Value::as_array)
        .map(|errors| {
            errors
                .iter()
                .map(|e| {
                    e.get("message")
                        .and_then(Value::as_str)
                        .unwrap_or_default()
                        .to_string()
                })
                .collect()
        })
        .unwrap_or_default()
}

/// Build a GraphQL filter object from the present clauses.
fn filter_of(clauses: Vec<(&str, Option<Value>)>) -> Value {
    let map: Map<String, Value> = clauses
        .into_iter()
        .filter_map(|(key, clause)| clause.map(|c| (key.to_string(), c)))
        .collect();
    Value::Object(map)
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Keep projects whose `teams.nodes[].id` contains `team_id`.
fn retain_team_projects(mut data: Value, team_id: &str) -> Value {
    if let Some(nodes) = data
        .pointer_mut("/projects/nodes")
        .and_then(Value::as_array_mut)
    {
        nodes.retain(|project| {
            project
                .pointer("/teams/nodes")
                .and_then(Value::as_array)
                .is_some_and(|teams| {
                    teams
                        .iter()
                        .any(|t| t.get("id").and_then(Value::as_str) == Some(team_id))
                })
        });
    }
    data
}

#[async_trait]
impl ProjectManagerProvider for LinearClient {
    async fn viewer(&self, token: Option<&str>) -> Result<Value, DomainError> {
        self.graphql(token, VIEWER_QUERY, Value::Null).await
    }

    async fn list_teams(
        &self,
        token: Option<&str>,
        first: Option<u32>,
    ) -> Result<Value, DomainError> {
        let variables = json!({ "first": first.unwrap_or(DEFAULT_PAGE) });
        self.graphql(token, TEAMS_QUERY, variables).await
    }

    async fn list_users(
        &self,
        token: Option<&str>,
        first: Option<u32>,
        after: Option<&str>,
        query: Option<&str>,
    ) -> Result<Value, DomainError> {
        let filter = non_empty(query).map(|q| {
            json!({ "or": [
                { "name": { "containsIgnoreCase": q } },
                { "email": { "containsIgnoreCase": q } },
            ] })
        });
        let variables = json!({
            "first": first.unwrap_or(DEFAULT_PAGE),
            "after": non_empty(after),
            "filter": filter,
        });
        self.graphql(token, USERS_QUERY, variables).await
    }

    async fn list_projects(
        &self,
        token: Option<&str>,
        filter: &ProjectFilter,
    ) -> Result<Value, DomainError> {
        let variables = json!({
            "first": filter.first.unwrap_or(DEFAULT_PAGE),
            "after": non_empty(filter.after.as_deref()),
            "filter": filter_of(vec![(
                "name",
                non_empty(filter.query.as_deref()).map(|q| json!({ "containsIgnoreCase": q })),
            )]),
        });
        let data = self.graphql(token, PROJECTS_QUERY, variables).await?;
        // ProjectFilter has no team clause upstream.
        Ok(match non_empty(filter.team_id.as_deref()) {
            Some(team_id) => retain_team_projects(data, team_id),
            None => data,
        })
    }

    async fn get_project(&self, token: Option<&str>, id: &str) -> Result<Value, DomainError> {
        self.graphql(token, PROJECT_QUERY, json!({ "id": id }))
            .await
    }

    async fn create_project(
        &self,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        self.graphql(token, CREATE_PROJECT_MUTATION, json!({ "input": input }))
            .await
    }

    async fn update_project(
        &self,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        let variables = json!({ "id": id, "input": input });
        self.graphql(token, UPDATE_PROJECT_MUTATION, variables)
            .await
    }

    async fn list_issues(
        &self,
        token: Option<&str>,
        filter: &IssueFilter,
    ) -> Result<Value, DomainError> {
        let eq = |v: Option<&String>| non_empty(v.map(String::as_str)).map(|v| json!({ "eq": v }));
        let title = non_empty(filter.query.as_deref()).map(|q| json!({ "containsIgnoreCase": q }));
        let variables = json!({
            "first": filter.first.unwrap_or(DEFAULT_PAGE),
            "after": non_empty(filter.after.as_deref()),
            "filter": filter_of(vec![
                ("team", eq(filter.team_id.as_ref()).map(|c| json!({ "id": c }))),
                ("project", eq(filter.project_id.as_ref()).map(|c| json!({ "id": c }))),
                ("state", eq(filter.state_name.as_ref()).map(|c| json!({ "name": c }))),
                ("title", title),
            ]),
        });
        self.graphql(token, ISSUES_QUERY, variables).await
    }

    async fn get_issue(&self, token: Option<&str>, id: &str) -> Result<Value, DomainError> {
        self.graphql(token, ISSUE_QUERY, json!({ "id": id })).await
    }

    async fn create_issue(
        &self,
        token: Option<&str>,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        self.graphql(token, CREATE_ISSUE_MUTATION, json!({ "input": input }))
            .await
    }

    async fn update_issue(
        &self,
        token: Option<&str>,
        id: &str,
        input: &Map<String, Value>,
    ) -> Result<Value, DomainError> {
        let variables = json!({ "id": id, "input": input });
        self.graphql(token, UPDATE_ISSUE_MUTATION, variables).await
    }

    async fn create_comment(
        &self,
        token: Option<&str>,
        issue_id: &str,
        body: &str,
    ) -> Result<Value, DomainError> {
        let variables = json!({ "input": { "issueId": issue_id, "body": body } });
        self.graphql(token, CREATE_COMMENT_MUTATION, variables)
            .await
    }

    async fn list_cycles(
        &self,
        token: Option<&str>,
        team_id: &str,
        first: Option<u32>,
    ) -> Result<Value, DomainError> {
        let variables = json!({ "teamId": team_id, "first": first.unwrap_or(DEFAULT_CYCLE_PAGE) });
        self.graphql(token, TEAM_CYCLES_QUERY, variables).await
    }

    async fn raw_query(
        &self,
        token: Option<&str>,
        query: &str,
        variables: Option<Value>,
    ) -> Result<Value, DomainError> {
        self.graphql(token, query, variables.unwrap_or(Value::Null))
            .await
    }
}
