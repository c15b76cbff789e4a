use crate::domain::error::DomainError;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiQuery, ApiResult};
use crate::http::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstrumentQuery {
    pub query: Option<String>,
    pub symbol: Option<String>,
    pub asset_type: Option<String>,
}

fn required<'a>(raw: &'a Option<String>, name: &str) -> Result<&'a str, DomainError> {
    raw.as_deref()
        .filter(|v| !v.is_empty())
        .ok_or_else(|| DomainError::InvalidInput(format!("Query parameter \"{name}\" is required")))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/instruments/search", get(search))
        .route("/instruments/resolve", get(resolve))
}

async fn search(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<InstrumentQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = required(&q.query, "query")?;
    let items = gateway
        .instruments()
        .search(query, q.asset_type.as_deref())
        .await?;
    Ok(Envelope(items))
}

async fn resolve(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<InstrumentQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = required(&q.symbol, "symbol")?;
    Ok(Envelope(gateway.instruments().resolve(symbol).await?))
}
