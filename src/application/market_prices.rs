use crate::application::params;
use crate::domain::entities::market::TimeSeriesRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataSource;
use crate::domain::values::query_params::QueryParams;
use crate::domain::values::time_range::TimeRange;
use serde_json::{json, Value};
use std::sync::Arc;

/// Raw time-series query values as they arrive on the wire.
#[derive(Debug, Clone, Default)]
pub struct TimeSeriesQuery<'a> {
    pub symbol: Option<&'a str>,
    pub interval: Option<&'a str>,
    pub range: Option<&'a str>,
    pub outputsize: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

impl TimeSeriesQuery<'_> {
    /// Expand the range shortcut; an explicit interval or output size wins.
    pub fn resolve(&self) -> Result<TimeSeriesRequest, DomainError> {
        let range = self
            .range
            .filter(|r| !r.is_empty())
            .map(str::parse::<TimeRange>)
            .transpose()?;
        let symbol = params::symbol(self.symbol)?;
        let window = range.map(|r| r.window());

        let interval = self
            .interval
            .filter(|i| !i.is_empty())
            .map(str::to_string)
            .or_else(|| window.map(|(interval, _)| interval.to_string()))
            .ok_or_else(|| {
                DomainError::InvalidInput("interval or range is required.".to_string())
            })?;
        let outputsize = params::positive_int(self.outputsize, "outputsize")?
            .or(window.map(|(_, size)| size));

        Ok(TimeSeriesRequest {
            symbol,
            interval,
            outputsize,
            start_date: params::present(self.start_date).map(str::to_string),
            end_date: params::present(self.end_date).map(str::to_string),
        })
    }
}

/// Optional parameters forwarded with batch price/quote requests.
#[derive(Debug, Clone, Default)]
pub struct BatchQuery<'a> {
    pub symbols: Option<&'a str>,
    pub interval: Option<&'a str>,
    pub outputsize: Option<&'a str>,
    pub start_date: Option<&'a str>,
    pub end_date: Option<&'a str>,
}

impl BatchQuery<'_> {
    pub fn resolve(&self) -> Result<(Vec<String>, QueryParams), DomainError> {
        let symbols = params::symbol_list(self.symbols)?;
        let outputsize = params::positive_int(self.outputsize, "outputsize")?;
        let extra = QueryParams::new()
            .with_opt("interval", self.interval)
            .with_opt("outputsize", outputsize)
            .with_opt("start_date", self.start_date)
            .with_opt("end_date", self.end_date);
        Ok((symbols, extra))
    }
}

/// `{success, message, data}` list answer; `data` is `[]` unless the
/// provider returned an array.
pub fn list_envelope(payload: &Value) -> Value {
    let data = payload
        .get("data")
        .filter(|d| d.is_array())
        .cloned()
        .unwrap_or_else(|| json!([]));
    json!({ "success": true, "message": "Success", "data": data })
}

pub struct MarketPricesUseCase {
    market: Arc<dyn MarketDataSource>,
}

impl MarketPricesUseCase {
    pub fn new(market: Arc<dyn MarketDataSource>) -> Self {
        Self { market }
    }

    pub async fn search_symbols(
        &self,
        query: &str,
        exchange: Option<&str>,
        country: Option<&str>,
    ) -> Result<Value, DomainError> {
        tracing::info!(query, ?exchange, ?country, "market-prices search symbols");
        let payload = self.market.search_symbols(query, exchange, country).await?;
        Ok(list_envelope(&payload))
    }

    pub async fn list_stocks(&self, exchange: Option<&str>) -> Result<Value, DomainError> {
        tracing::info!(exchange = ?exchange, "market-prices list stocks");
        Ok(list_envelope(&self.market.list_stocks(exchange).await?))
    }

    pub async fn list_crypto_pairs(&self) -> Result<Value, DomainError> {
        tracing::info!("market-prices list crypto pairs");
        Ok(list_envelope(&self.market.list_crypto_pairs().await?))
    }

    pub async fn list_commodity_pairs(&self) -> Result<Value, DomainError> {
        tracing::info!("market-prices list commodity pairs");
        Ok(list_envelope(&self.market.list_commodity_pairs().await?))
    }

    pub async fn live_price(&self, symbol: &str) -> Result<Value, DomainError> {
        tracing::info!(symbol, "market-prices live price");
        self.market.live_price(symbol).await
    }

    pub async fn quote(&self, symbol: &str) -> Result<Value, DomainError> {
        tracing::info!(symbol, "market-prices quote");
        self.market.quote(symbol).await
    }

    pub async fn time_series(&self, request: &TimeSeriesRequest) -> Result<Value, DomainError> {
        tracing::info!(
            symbol = %request.symbol,
            interval = %request.interval,
            outputsize = ?request.outputsize,
            "market-prices time series"
        );
        self.market.time_series(request).await
    }

    pub async fn earliest_timestamp(
        &self,
        symbol: &str,
        interval: &str,
    ) -> Result<Value, DomainError> {
        tracing::info!(symbol, interval, "market-prices earliest timestamp");
        self.market.earliest_timestamp(symbol, interval).await
    }

    pub async fn batch_price(
        &self,
        symbols: &[String],
        extra: &QueryParams,
    ) -> Result<Value, DomainError> {
        tracing::info!(symbols = %symbols.join(","), "market-prices batch price");
        self.market.batch_price(symbols, extra).await
    }

    pub async fn batch_quote(
        &self,
        symbols: &[String],
        extra: &QueryParams,
    ) -> Result<Value, DomainError> {
        tracing::info!(symbols = %symbols.join(","), "market-prices batch quote");
        self.market.batch_quote(symbols, extra).await
    }

    pub async fn exchange_rate(&self, pair: &str) -> Result<Value, DomainError> {
        tracing::info!(pair, "market-prices exchange rate");
        self.market.exchange_rate(pair).await
    }

    pub async fn convert_currency(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<Value, DomainError> {
        tracing::info!(amount, from, to, "market-prices convert currency");
        self.market.convert_currency(amount, from, to).await
    }
}
