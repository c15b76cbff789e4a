use crate::application::params;
use crate::domain::entities::email::OutgoingEmail;
use crate::domain::error::DomainError;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiJson, ApiQuery, ApiResult, ProviderToken};
use crate::http::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MailboxQuery {
    pub query: Option<String>,
    pub max_results: Option<String>,
}

impl MailboxQuery {
    fn max_results(&self) -> Result<Option<u32>, DomainError> {
        params::bounded_int(self.max_results.as_deref(), "maxResults", 1, 100)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBody {
    pub to: Option<String>,
    pub subject: Option<String>,
    pub body: Option<String>,
    pub thread_id: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/communication/{provider}/threads", get(list_threads))
        .route("/communication/{provider}/threads/{id}", get(get_thread))
        .route("/communication/{provider}/search", get(search_messages))
        .route("/communication/{provider}/messages", post(send_message))
        .route("/communication/{provider}/messages/{id}", get(get_message))
}

async fn list_threads(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<MailboxQuery>,
) -> ApiResult<impl IntoResponse> {
    let threads = gateway
        .communication()
        .list_threads(
            &provider,
            token.as_deref(),
            q.query.as_deref(),
            q.max_results()?,
        )
        .await?;
    Ok(Envelope(threads))
}

async fn get_thread(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let thread = gateway
        .communication()
        .get_thread(&provider, token.as_deref(), &id)
        .await?;
    Ok(Envelope(thread))
}

async fn search_messages(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<MailboxQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = params::required(q.query.as_deref(), "query")?;
    let messages = gateway
        .communication()
        .search_messages(&provider, token.as_deref(), query, q.max_results()?)
        .await?;
    Ok(Envelope(messages))
}

async fn get_message(
    State(gateway): State<AppState>,
    Path((provider, id)): Path<(String, String)>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let message = gateway
        .communication()
        .get_message(&provider, token.as_deref(), &id)
        .await?;
    Ok(Envelope(message))
}

async fn send_message(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiJson(body): ApiJson<SendBody>,
) -> ApiResult<impl IntoResponse> {
    let message = OutgoingEmail {
        to: body.to.unwrap_or_default(),
        subject: body.subject.unwrap_or_default(),
        body: body.body.unwrap_or_default(),
        thread_id: body.thread_id.filter(|t| !t.is_empty()),
    };
    let sent = gateway
        .communication()
        .send_message(&provider, token.as_deref(), &message)
        .await?;
    Ok(Envelope(sent))
}
