use crate::application::params;
use crate::application::project_manager::DigestRequest;
use crate::domain::entities::project::{IssueFilter, ProjectFilter};
use crate::domain::error::DomainError;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiJson, ApiQuery, ApiResult, ProviderToken};
use crate::http::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;
use serde_json::{Map, Value};

const MAX_PAGE_SIZE: u32 = 250;

/// Listing parameters shared by every collection route.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    pub first: Option<String>,
    pub after: Option<String>,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub state_name: Option<String>,
    pub query: Option<String>,
    pub stale_hours: Option<String>,
}

impl ListQuery {
    fn first(&self) -> Result<Option<u32>, DomainError> {
        params::bounded_int(self.first.as_deref(), "first", 1, MAX_PAGE_SIZE)
    }

    fn issue_filter(&self) -> Result<IssueFilter, DomainError> {
        Ok(IssueFilter {
            first: self.first()?,
            after: self.after.clone(),
            team_id: self.team_id.clone(),
            project_id: self.project_id.clone(),
            state_name: self.state_name.clone(),
            query: self.query.clone(),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct InputBody {
    #[serde(default)]
    pub input: Value,
}

impl InputBody {
    fn object(&self) -> Result<&Map<String, Value>, DomainError> {
        self.input
            .as_object()
            .ok_or_else(|| DomainError::InvalidInput("input must be an object.".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct CommentBody {
    #[serde(default)]
    pub body: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RawQueryBody {
    #[serde(default)]
    pub query: Option<String>,
    #[serde(default)]
    pub variables: Option<Value>,
}

/// Issue filters plus digest settings, sent as JSON.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DigestBody {
    pub first: Option<f64>,
    pub after: Option<String>,
    pub team_id: Option<String>,
    pub project_id: Option<String>,
    pub state_name: Option<String>,
    pub query: Option<String>,
    pub stale_hours: Option<f64>,
    pub webhook_url: Option<String>,
    pub title: Option<String>,
}

impl DigestBody {
    fn into_request(self) -> Result<DigestRequest, DomainError> {
        let first = match self.first {
            Some(n) => params::bounded_int(Some(&n.to_string()), "first", 1, MAX_PAGE_SIZE)?,
            None => None,
        };
        let stale_hours = match self.stale_hours {
            Some(n) => params::positive_number(Some(&n.to_string()), "staleHours")?,
            None => None,
        };
        Ok(DigestRequest {
            filter: IssueFilter {
                first,
                after: self.after,
                team_id: self.team_id,
                project_id: self.project_id,
                state_name: self.state_name,
                query: self.query,
            },
            stale_hours,
            webhook_url: self.webhook_url,
            title: self.title,
        })
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/project-manager/{provider}/health", get(health))
        .route("/project-manager/{provider}/viewer", get(viewer))
        .route("/project-manager/{provider}/teams", get(list_teams))
        .route("/project-manager/{provider}/users", get(list_users))
        .route(
            "/project-manager/{provider}/projects",
            get(list_projects).post(create_project),
        )
        .route(
            "/project-manager/{provider}/projects/{id}",
            get(get_project).patch(update_project),
        )
        .route(
            "/project-manager/{provider}/issues",
            get(list_issues).post(create_issue),
        )
        .route(
            "/project-manager/{provider}/issues/{id}",
            get(get_issue).patch(update_issue),
        )
        .route(
            "/project-manager/{provider}/issues/{id}/comments",
            post(create_comment),
        )
        .route(
            "/project-manager/{provider}/teams/{team_id}/cycles",
            get(list_cycles),
        )
        .route("/project-manager/{provider}/query", post(raw_query))
        .route(
            "/project-manager/{provider}/sync-summary",
            get(sync_summary),
        )
        .route(
            "/project-manager/{provider}/notify/slack",
            post(notify_slack),
        )
}

async fn health(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let health = gateway
        .project_manager()
        .health(&provider, token.as_deref())
        .await?;
    Ok(Envelope(health))
}

async fn viewer(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let viewer = gateway
        .project_manager()
        .viewer(&provider, token.as_deref())
        .await?;
    Ok(Envelope(viewer))
}

async fn list_teams(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let teams = gateway
        .project_manager()
        .list_teams(&provider, token.as_deref(), q.first()?)
        .await?;
    Ok(Envelope(teams))
}

async fn list_users(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let users = gateway
        .project_manager()
        .list_users(
            &provider,
            token.as_deref(),
            q.first()?,
            q.after.as_deref(),
            q.query.as_deref(),
        )
        .await?;
    Ok(Envelope(users))
}

async fn list_projects(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = ProjectFilter {
        first: q.first()?,
        after: q.after,
        team_id: q.team_id,
        query: q.query,
    };
    let projects = gateway
        .project_manager()
        .list_projects(&provider, token.as_deref(), &filter)
        .await?;
    Ok(Envelope(projects))
}

async fn get_project(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let project = gateway
        .project_manager()
        .get_project(&provider, token.as_deref(), &id)
        .await?;
    Ok(Envelope(project))
}

async fn create_project(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiJson(body): ApiJson<InputBody>,
) -> ApiResult<impl IntoResponse> {
    let project = gateway
        .project_manager()
        .create_project(&provider, token.as_deref(), body.object()?)
        .await?;
    Ok(Envelope(project))
}

async fn update_project(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
    ApiJson(body): ApiJson<InputBody>,
) -> ApiResult<impl IntoResponse> {
    let project = gateway
        .project_manager()
        .update_project(&provider, token.as_deref(), &id, body.object()?)
        .await?;
    Ok(Envelope(project))
}

async fn list_issues(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let issues = gateway
        .project_manager()
        .list_issues(&provider, token.as_deref(), &q.issue_filter()?)
        .await?;
    Ok(Envelope(issues))
}

async fn get_issue(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let issue = gateway
        .project_manager()
        .get_issue(&provider, token.as_deref(), &id)
        .await?;
    Ok(Envelope(issue))
}

async fn create_issue(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiJson(body): ApiJson<InputBody>,
) -> ApiResult<impl IntoResponse> {
    let issue = gateway
        .project_manager()
        .create_issue(&provider, token.as_deref(), body.object()?)
        .await?;
    Ok(Envelope(issue))
}

async fn update_issue(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
    ApiJson(body): ApiJson<InputBody>,
) -> ApiResult<impl IntoResponse> {
    let issue = gateway
        .project_manager()
        .update_issue(&provider, token.as_deref(), &id, body.object()?)
        .await?;
    Ok(Envelope(issue))
}

async fn create_comment(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
    ApiJson(body): ApiJson<CommentBody>,
) -> ApiResult<impl IntoResponse> {
    let text = params::required(body.body.as_deref(), "body")?;
    let comment = gateway
        .project_manager()
        .create_comment(&provider, token.as_deref(), &id, text)
        .await?;
    Ok(Envelope(comment))
}

async fn list_cycles(
    State(gateway): State<AppState>,
    Path((provider, team_id)): Path<(String, String)>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let cycles = gateway
        .project_manager()
        .list_cycles(&provider, token.as_deref(), &team_id, q.first()?)
        .await?;
    Ok(Envelope(cycles))
}

async fn raw_query(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiJson(body): ApiJson<RawQueryBody>,
) -> ApiResult<impl IntoResponse> {
    let query = params::required(body.query.as_deref(), "query")?;
    let variables = body.variables.filter(|v| !v.is_null());
    if variables.as_ref().is_some_and(|v| !v.is_object()) {
        let message = "variables must be an object.".to_string();
        return Err(DomainError::InvalidInput(message).into());
    }
    let data = gateway
        .project_manager()
        .raw_query(&provider, token.as_deref(), query, variables)
        .await?;
    Ok(Envelope(data))
}

async fn sync_summary(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<ListQuery>,
) -> ApiResult<impl IntoResponse> {
    let filter = q.issue_filter()?;
    let stale_hours = params::positive_number(q.stale_hours.as_deref(), "staleHours")?;
    let summary = gateway
        .project_manager()
        .sync_summary(&provider, token.as_deref(), &filter, stale_hours)
        .await?;
    Ok(Envelope(summary))
}

async fn notify_slack(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiJson(body): ApiJson<DigestBody>,
) -> ApiResult<impl IntoResponse> {
    let request = body.into_request()?;
    let receipt = gateway
        .project_manager()
        .notify_slack(&provider, token.as_deref(), &request)
        .await?;
    Ok(Envelope(receipt))
}
