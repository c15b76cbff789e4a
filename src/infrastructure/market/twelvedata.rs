use super::keyed::KeyedApiClient;
use crate::config::KeyedApiConfig;
use crate::domain::entities::market::TimeSeriesRequest;
use crate::domain::error::DomainError;
use crate::domain::ports::market_data::MarketDataSource;
use crate::domain::values::query_params::QueryParams;
use crate::infrastructure::http::truthy_text;
use async_trait::async_trait;
use serde_json::Value;

/// Twelve Data REST client.
pub struct TwelveDataClient {
    http: KeyedApiClient,
}

impl TwelveDataClient {
    pub fn new(config: &KeyedApiConfig) -> Result<Self, DomainError> {
        Ok(Self {
            http: KeyedApiClient::new("Twelve Data", "TWELVEDATA", config)?,
        })
    }

    /// Twelve Data reports some failures as 200 with `status: "error"`.
    async fn request(&self, path: &str, params: QueryParams) -> Result<Value, DomainError> {
        let payload = self.http.get(path, &params).await?;
        if payload.get("status").and_then(Value::as_str) == Some("error") {
            let message = truthy_text(payload.get("message"))
                .unwrap_or_else(|| "Twelve Data error response.".to_string());
            return Err(DomainError::InvalidInput(message));
        }
        Ok(payload)
    }

    fn batch_params(symbols: &[String], extra: &QueryParams) -> QueryParams {
        let mut params = QueryParams::new().with("symbol", symbols.join(","));
        params.extend(extra);
        params.set("format", "json");
        params
    }
}

#[async_trait]
impl MarketDataSource for TwelveDataClient {
    async fn search_symbols(
        &self,
        query: &str,
        exchange: Option<&str>,
        country: Option<&str>,
    ) -> Result<Value, DomainError> {
        let params = QueryParams::new()
            .with("symbol", query)
            .with_opt("exchange", exchange)
            .with_opt("country", country);
        self.request("/symbol_search", params).await
    }

    async fn list_stocks(&self, exchange: Option<&str>) -> Result<Value, DomainError> {
        self.request("/stocks", QueryParams::new().with_opt("exchange", exchange))
            .await
    }

    async fn list_crypto_pairs(&self) -> Result<Value, DomainError> {
        self.request("/cryptocurrencies", QueryParams::new()).await
    }

    async fn list_commodity_pairs(&self) -> Result<Value, DomainError> {
        self.request("/commodities", QueryParams::new()).await
    }

    async fn live_price(&self, symbol: &str) -> Result<Value, DomainError> {
        self.request("/price", QueryParams::new().with("symbol", symbol))
            .await
    }

    async fn quote(&self, symbol: &str) -> Result<Value, DomainError> {
        self.request("/quote", QueryParams::new().with("symbol", symbol))
            .await
    }

    async fn time_series(&self, request: &TimeSeriesRequest) -> Result<Value, DomainError> {
        self.request("/time_series", request.to_params()).await
    }

    async fn earliest_timestamp(&self, symbol: &str, interval: &str) -> Result<Value, DomainError> {
        let params = QueryParams::new()
            .with("symbol", symbol)
            .with("interval", interval);
        self.request("/earliest_timestamp", params).await
    }

    async fn batch_price(
        &self,
        symbols: &[String],
        extra: &QueryParams,
    ) -> Result<Value, DomainError> {
        self.request("/price", Self::batch_params(symbols, extra))
            .await
    }

    async fn batch_quote(
        &self,
        symbols: &[String],
        extra: &QueryParams,
    ) -> Result<Value, DomainError> {
        self.request("/quote", Self::batch_params(symbols, extra))
            .await
    }

    async fn exchange_rate(&self, pair: &str) -> Result<Value, DomainError> {
        self.request("/exchange_rate", QueryParams::new().with("symbol", pair))
            .await
    }

    async fn convert_currency(
        &self,
        amount: f64,
        from: &str,
        to: &str,
    ) -> Result<Value, DomainError> {
        let params = QueryParams::new()
            .with("amount", amount)
            .with("from", from)
            .with("to", to);
        self.request("/currency_conversion", params).await
    }
}
