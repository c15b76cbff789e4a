use crate::application::news::NewsQuery;
use crate::domain::ports::news::NewsEndpoint;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiQuery, ApiResult};
use crate::http::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools/news/latest", get(latest))
        .route("/tools/news/archive", get(archive))
        .route("/tools/news/market", get(market))
        .route("/tools/news/crypto", get(crypto))
        .route("/tools/news/sources", get(sources))
}

async fn fetch(
    gateway: AppState,
    endpoint: NewsEndpoint,
    query: NewsQuery,
) -> ApiResult<impl IntoResponse> {
    Ok(Envelope(gateway.news().fetch(endpoint, &query).await?))
}

async fn latest(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<NewsQuery>,
) -> ApiResult<impl IntoResponse> {
    fetch(gateway, NewsEndpoint::Latest, q).await
}

async fn archive(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<NewsQuery>,
) -> ApiResult<impl IntoResponse> {
    fetch(gateway, NewsEndpoint::Archive, q).await
}

async fn market(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<NewsQuery>,
) -> ApiResult<impl IntoResponse> {
    fetch(gateway, NewsEndpoint::Market, q).await
}

async fn crypto(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<NewsQuery>,
) -> ApiResult<impl IntoResponse> {
    fetch(gateway, NewsEndpoint::Crypto, q).await
}

async fn sources(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<NewsQuery>,
) -> ApiResult<impl IntoResponse> {
    fetch(gateway, NewsEndpoint::Sources, q).await
}
