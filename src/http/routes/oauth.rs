use crate::application::params;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiJson, ApiQuery, ApiResult};
use crate::http::AppState;
use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorizeQuery {
    pub redirect_uri: Option<String>,
    pub state: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenBody {
    pub code: Option<String>,
    pub redirect_uri: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshBody {
    pub refresh_token: Option<String>,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/oauth/{provider}/authorize", get(authorize))
        .route("/oauth/{provider}/token", post(exchange_code))
        .route("/oauth/{provider}/refresh", post(refresh))
}

async fn authorize(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    ApiQuery(q): ApiQuery<AuthorizeQuery>,
) -> ApiResult<impl IntoResponse> {
    let url = gateway.oauth().authorization_url(
        &provider,
        q.redirect_uri.as_deref().unwrap_or_default(),
        q.state.as_deref().unwrap_or_default(),
    )?;
    Ok(Envelope(url))
}

async fn exchange_code(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    ApiJson(body): ApiJson<TokenBody>,
) -> ApiResult<impl IntoResponse> {
    let code = params::required(body.code.as_deref(), "code")?;
    let redirect_uri = params::required(body.redirect_uri.as_deref(), "redirectUri")?;
    let grant = gateway
        .oauth()
        .exchange_code(&provider, code, redirect_uri)
        .await?;
    Ok(Envelope(grant))
}

async fn refresh(
    State(gateway): State<AppState>,
    Path(provider): Path<String>,
    ApiJson(body): ApiJson<RefreshBody>,
) -> ApiResult<impl IntoResponse> {
    let refresh_token = body.refresh_token.as_deref().unwrap_or_default();
    Ok(Envelope(gateway.oauth().refresh(&provider, refresh_token).await?))
}
