use crate::application::market_prices::{BatchQuery, TimeSeriesQuery};
use crate::application::params;
use crate::http::envelope::Envelope;
use crate::http::error::{ApiQuery, ApiResult};
use crate::http::AppState;
use axum::extract::State;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use serde::Deserialize;

#[derive(Debug, Default, Deserialize)]
pub struct PricesQuery {
    pub query: Option<String>,
    pub exchange: Option<String>,
    pub country: Option<String>,
    pub symbol: Option<String>,
    pub symbols: Option<String>,
    pub interval: Option<String>,
    pub range: Option<String>,
    pub outputsize: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub pair: Option<String>,
    pub amount: Option<String>,
    pub from: Option<String>,
    pub to: Option<String>,
}

impl PricesQuery {
    fn batch(&self) -> BatchQuery<'_> {
        BatchQuery {
            symbols: self.symbols.as_deref(),
            interval: self.interval.as_deref(),
            outputsize: self.outputsize.as_deref(),
            start_date: self.start_date.as_deref(),
            end_date: self.end_date.as_deref(),
        }
    }
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/tools/market-prices/search-symbols", get(search_symbols))
        .route("/tools/market-prices/list-stocks", get(list_stocks))
        .route(
            "/tools/market-prices/list-crypto-pairs",
            get(list_crypto_pairs),
        )
        .route(
            "/tools/market-prices/list-commodity-pairs",
            get(list_commodity_pairs),
        )
        .route("/tools/market-prices/live-price", get(live_price))
        .route("/tools/market-prices/quote", get(quote))
        .route("/tools/market-prices/time-series", get(time_series))
        .route(
            "/tools/market-prices/earliest-timestamp",
            get(earliest_timestamp),
        )
        .route("/tools/market-prices/batch-price", get(batch_price))
        .route("/tools/market-prices/batch-quote", get(batch_quote))
        .route("/tools/market-prices/exchange-rate", get(exchange_rate))
        .route(
            "/tools/market-prices/convert-currency",
            get(convert_currency),
        )
}

async fn search_symbols(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let query = params::required(q.query.as_deref(), "query")?;
    let listing = gateway
        .market_prices()
        .search_symbols(query, q.exchange.as_deref(), q.country.as_deref())
        .await?;
    Ok(Envelope(listing))
}

async fn list_stocks(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let stocks = gateway
        .market_prices()
        .list_stocks(q.exchange.as_deref())
        .await?;
    Ok(Envelope(stocks))
}

async fn list_crypto_pairs(State(gateway): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Envelope(gateway.market_prices().list_crypto_pairs().await?))
}

async fn list_commodity_pairs(State(gateway): State<AppState>) -> ApiResult<impl IntoResponse> {
    Ok(Envelope(gateway.market_prices().list_commodity_pairs().await?))
}

async fn live_price(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    Ok(Envelope(gateway.market_prices().live_price(&symbol).await?))
}

async fn quote(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    Ok(Envelope(gateway.market_prices().quote(&symbol).await?))
}

async fn time_series(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let request = TimeSeriesQuery {
        symbol: q.symbol.as_deref(),
        interval: q.interval.as_deref(),
        range: q.range.as_deref(),
        outputsize: q.outputsize.as_deref(),
        start_date: q.start_date.as_deref(),
        end_date: q.end_date.as_deref(),
    }
    .resolve()?;
    Ok(Envelope(gateway.market_prices().time_series(&request).await?))
}

async fn earliest_timestamp(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let symbol = params::symbol(q.symbol.as_deref())?;
    let interval = params::required(q.interval.as_deref(), "interval")?;
    let earliest = gateway
        .market_prices()
        .earliest_timestamp(&symbol, interval)
        .await?;
    Ok(Envelope(earliest))
}

async fn batch_price(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let (symbols, extra) = q.batch().resolve()?;
    let prices = gateway
        .market_prices()
        .batch_price(&symbols, &extra)
        .await?;
    Ok(Envelope(prices))
}

async fn batch_quote(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let (symbols, extra) = q.batch().resolve()?;
    let quotes = gateway
        .market_prices()
        .batch_quote(&symbols, &extra)
        .await?;
    Ok(Envelope(quotes))
}

async fn exchange_rate(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let pair = params::required(q.pair.as_deref(), "pair")?.to_uppercase();
    Ok(Envelope(gateway.market_prices().exchange_rate(&pair).await?))
}

async fn convert_currency(
    State(gateway): State<AppState>,
    ApiQuery(q): ApiQuery<PricesQuery>,
) -> ApiResult<impl IntoResponse> {
    let amount = params::required(q.amount.as_deref(), "amount")?;
    let from = params::required(q.from.as_deref(), "from")?.to_uppercase();
    let to = params::required(q.to.as_deref(), "to")?.to_uppercase();
    let amount = params::positive_amount(amount)?;
    let converted = gateway
        .market_prices()
        .convert_currency(amount, &from, &to)
        .await?;
    Ok(Envelope(converted))
}
