//! REST surface: every area lives under `/integration`, liveness at `/health`.

pub mod envelope;
pub mod error;
pub mod routes;

use crate::IntegrationGateway;
use axum::extract::Request;
use axum::http::{HeaderValue, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Instrument;

pub type AppState = Arc<IntegrationGateway>;

pub const API_PREFIX: &str = "/integration";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Method and path of every route, for the `routes` command.
pub const ROUTE_TABLE: &[(&str, &str)] = &[
    ("GET", "/health"),
    ("GET", "/integration/instruments/search"),
    ("GET", "/integration/instruments/resolve"),
    ("GET", "/integration/tools/market-data/search-name"),
    ("GET", "/integration/tools/market-data/profile"),
    ("GET", "/integration/tools/market-data/earnings"),
    ("GET", "/integration/tools/market-data/fundamentals"),
    ("GET", "/integration/tools/market-data/earnings-calendar"),
    ("GET", "/integration/tools/market-data/analyst-estimates"),
    ("GET", "/integration/tools/market-data/revenue-series"),
    ("GET", "/integration/tools/market-prices/search-symbols"),
    ("GET", "/integration/tools/market-prices/list-stocks"),
    ("GET", "/integration/tools/market-prices/list-crypto-pairs"),
    ("GET", "/integration/tools/market-prices/list-commodity-pairs"),
    ("GET", "/integration/tools/market-prices/live-price"),
    ("GET", "/integration/tools/market-prices/quote"),
    ("GET", "/integration/tools/market-prices/time-series"),
    ("GET", "/integration/tools/market-prices/earliest-timestamp"),
    ("GET", "/integration/tools/market-prices/batch-price"),
    ("GET", "/integration/tools/market-prices/batch-quote"),
    ("GET", "/integration/tools/market-prices/exchange-rate"),
    ("GET", "/integration/tools/market-prices/convert-currency"),
    ("GET", "/integration/tools/news/latest"),
    ("GET", "/integration/tools/news/archive"),
    ("GET", "/integration/tools/news/market"),
    ("GET", "/integration/tools/news/crypto"),
    ("GET", "/integration/tools/news/sources"),
    ("GET", "/integration/project-manager/{provider}/health"),
    ("GET", "/integration/project-manager/{provider}/viewer"),
    ("GET", "/integration/project-manager/{provider}/teams"),
    ("GET", "/integration/project-manager/{provider}/users"),
    ("GET", "/integration/project-manager/{provider}/projects"),
    ("POST", "/integration/project-manager/{provider}/projects"),
    ("GET", "/integration/project-manager/{provider}/projects/{id}"),
    ("PATCH", "/integration/project-manager/{provider}/projects/{id}"),
    ("GET", "/integration/project-manager/{provider}/issues"),
    ("POST", "/integration/project-manager/{provider}/issues"),
    ("GET", "/integration/project-manager/{provider}/issues/{id}"),
    ("PATCH", "/integration/project-manager/{provider}/issues/{id}"),
    ("POST", "/integration/project-manager/{provider}/issues/{id}/comments"),
    ("GET", "/integration/project-manager/{provider}/teams/{team_id}/cycles"),
    ("POST", "/integration/project-manager/{provider}/query"),
    ("GET", "/integration/project-manager/{provider}/sync-summary"),
    ("POST", "/integration/project-manager/{provider}/notify/slack"),
    ("GET", "/integration/document-sources/{provider}/health"),
    ("POST", "/integration/document-sources/{provider}/fetch"),
    ("GET", "/integration/document-sources/{provider}/search"),
    ("GET", "/integration/communication/{provider}/threads"),
    ("GET", "/integration/communication/{provider}/threads/{id}"),
    ("GET", "/integration/communication/{provider}/search"),
    ("GET", "/integration/communication/{provider}/messages/{id}"),
    ("POST", "/integration/communication/{provider}/messages"),
    ("GET", "/integration/oauth/{provider}/authorize"),
    ("POST", "/integration/oauth/{provider}/token"),
    ("POST", "/integration/oauth/{provider}/refresh"),
    ("POST", "/integration/webhooks/linear"),
    ("POST", "/integration/webhooks/slack"),
];

pub fn router(gateway: Arc<IntegrationGateway>) -> Router {
    let api = Router::new()
        .merge(routes::instruments::routes())
        .merge(routes::market_data::routes())
        .merge(routes::market_prices::routes())
        .merge(routes::news::routes())
        .merge(routes::project_manager::routes())
        .merge(routes::document_sources::routes())
        .merge(routes::communication::routes())
        .merge(routes::oauth::routes())
        .merge(routes::webhooks::routes());

    Router::new()
        .route("/health", get(health))
        .nest(API_PREFIX, api)
        .layer(middleware::from_fn(request_id))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(gateway)
}

async fn health() -> (StatusCode, &'static str) {
    (StatusCode::OK, "OK")
}

/// Tag the request span and the response with a fresh request id.
async fn request_id(request: Request, next: Next) -> Response {
    let id = uuid::Uuid::new_v4().to_string();
    let span = tracing::info_span!(
        "request",
        request_id = %id,
        method = %request.method(),
        path = %request.uri().path()
    );
    let mut response = next.run(request).instrument(span).await;
    if let Ok(value) = HeaderValue::from_str(&id) {
        response.headers_mut().insert(REQUEST_ID_HEADER, value);
    }
    response
}

pub async fn serve(gateway: Arc<IntegrationGateway>, addr: &str) -> Result<(), std::io::Error> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, prefix = API_PREFIX, "integration gateway listening");
    axum::serve(listener, router(gateway))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
