use crate::application::params;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiJson, ApiQuery, ApiResult, ProviderToken};
use crate::http::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct FetchBody {
    #[serde(default)]
    pub source: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
    pub limit: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/document-sources/{provider}/health", get(health))
        .route("/document-sources/{provider}/fetch", post(fetch))
        .route("/document-sources/{provider}/search", get(search))
}

async fn health(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
) -> ApiResult<impl IntoResponse> {
    let health = gateway
        .document_sources()
        .health(&provider, token.as_deref())?;
    Ok(Envelope(health))
}

async fn fetch(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiJson(body): ApiJson<FetchBody>,
) -> ApiResult<impl IntoResponse> {
    let source = params::required(body.source.as_deref(), "source")?;
    let document = gateway
        .document_sources()
        .fetch(&provider, source, token.as_deref())
        .await?;
    Ok(Envelope(document))
}

async fn search(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    token: ProviderToken,
    ApiQuery(q): ApiQuery<SearchQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = q.q.as_deref().unwrap_or_default();
    let limit = params::loose_int(q.limit.as_deref());
    let results = gateway
        .document_sources()
        .search(&provider, query, token.as_deref(), limit)
        .await?;
    Ok(Envelope(results))
}
