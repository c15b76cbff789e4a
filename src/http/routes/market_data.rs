use crate::application::market_data::DateBounds;
use crate::application::params;
use crate::domain::error::DomainError;
use crate::domain::values::statement_period::StatementPeriod;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiQuery, ApiResult};
use crate::http::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

const DEFAULT_ESTIMATES_LIMIT: u32 = 10;

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarketDataQuery {
    pub symbol: Option<String>,
    pub query: Option<String>,
    pub asset_type: Option<String>,
    pub period: Option<String>,
    pub page: Option<String>,
    pub limit: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl MarketDataQuery {
    fn period(&self) -> Result<StatementPeriod, DomainError> {
        match self.period.as_deref().filter(|p| !p.is_empty()) {
            Some(raw) => Ok(raw.parse::<StatementPeriod>()?),
            None => Ok(StatementPeriod::default()),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools/market-data/search-name", get(search_name))
        .route("/tools/market-data/profile", get(profile))
        .route("/tools/market-data/earnings", get(earnings))
        .route("/tools/market-data/fundamentals", get(fundamentals))
        .route(
            "/tools/market-data/earnings-calendar",
            get(earnings_calendar),
        )
        .route(
            "/tools/market-data/analyst-estimates",
            get(analyst_estimates),
        )
        .route("/tools/market-data/revenue-series", get(revenue_series))
}

async fn search_name(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = params::required(q.query.as_deref(), "query")?;
    let matches = gateway
        .market_data()
        .search_name(query, q.asset_type.as_deref())
        .await?;
    Ok(Envelope(matches))
}

async fn profile(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    Ok(Envelope(gateway.market_data().profile(&symbol).await?))
}

async fn earnings(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    Ok(Envelope(gateway.market_data().earnings(&symbol).await?))
}

async fn fundamentals(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    Ok(Envelope(gateway.market_data().fundamentals(&symbol).await?))
}

async fn earnings_calendar(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let bounds = DateBounds::parse(q.from.as_deref(), q.to.as_deref())?;
    Ok(Envelope(gateway.market_data().earnings_calendar(bounds).await?))
}

async fn analyst_estimates(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    let period = q.period()?;
    let page = params::non_negative_int(q.page.as_deref(), "page")?;
    // an empty limit is rejected rather than falling back to the default
    let limit = match q.limit.as_deref() {
        Some("") => {
            let message = "limit must be a positive integer.".to_string();
            return Err(DomainError::InvalidInput(message).into());
        }
        raw => params::positive_int(raw, "limit")?,
    };
    let (page, limit) = (page.unwrap_or(0), limit.unwrap_or(DEFAULT_ESTIMATES_LIMIT));
    let estimates = gateway
        .market_data()
        .analyst_estimates(&symbol, period, page, limit)
        .await?;
    Ok(Envelope(estimates))
}

async fn revenue_series(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<MarketDataQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    let period = q.period()?;
    let limit = params::positive_int(q.limit.as_deref(), "limit")?;
    let series = gateway
        .market_data()
        .revenue_series(&symbol, period, limit.map(|n| n as usize))
        .await?;
    Ok(Envelope(series))
}
